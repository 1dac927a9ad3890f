//! Algorithm limits and runtime configuration defaults

// Bus flags are u32 and every flag of a substation is enumerated
/// Largest element count a substation may have
pub const MAX_SUBSTATION_ELEMENTS: usize = 24;

// 2^20 bits is 128 KiB per substation
/// Largest `slots + line slots` for which the validity table is precomputed
pub const DENSE_TABLE_MAX_BITS: usize = 20;

/// Default number of simultaneous outages screened
pub const DEFAULT_MAX_OUTAGES: usize = 2;

// Scenario count grows as C(lines, k)
/// Largest number of simultaneous outages the screen accepts
pub const MAX_SCREEN_OUTAGES: usize = 4;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Scenarios screened between progress bar refreshes
pub const PROGRESS_REFRESH_INTERVAL: usize = 64;

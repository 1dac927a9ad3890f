/// Network graph with per-bus vertices
pub mod adjacency;
/// Arbitrary-width line state masks
pub mod bitset;
/// Validity lookups, precomputed or memoised
pub mod cache;
/// Connected component analysis
pub mod connectivity;
/// N-k outage screening
pub mod contingency;
/// Minimal infeasible outage sets
pub mod exclusion;
/// Substations plus the shared graph
pub mod network;
/// Per-substation state and bus reassignment
pub mod substation;
/// Bus splitting rules
pub mod validity;

pub mod io;

use busflag::GridDescription;

/// Three substations in a ring, one generator and load at each of the two larger ones
///
/// Substation 1 has lines at slots 0 and 2, a generator at 1 and a load at 3.
pub const RING_GRID: &str = r#"{
    "substation_sizes": [3, 4, 3],
    "lines": [
        {"origin": {"substation": 0, "position": 0}, "extremity": {"substation": 1, "position": 0}},
        {"origin": {"substation": 1, "position": 2}, "extremity": {"substation": 2, "position": 0}},
        {"origin": {"substation": 2, "position": 1}, "extremity": {"substation": 0, "position": 1}}
    ],
    "generators": [
        {"substation": 0, "position": 2},
        {"substation": 1, "position": 1}
    ],
    "loads": [
        {"substation": 1, "position": 3},
        {"substation": 2, "position": 2}
    ]
}"#;

/// Two doubly-connected pairs of substations joined by a single bridge line 4
pub const BRIDGE_GRID: &str = r#"{
    "substation_sizes": [3, 3, 3, 3],
    "lines": [
        {"origin": {"substation": 0, "position": 0}, "extremity": {"substation": 1, "position": 0}},
        {"origin": {"substation": 0, "position": 1}, "extremity": {"substation": 1, "position": 1}},
        {"origin": {"substation": 2, "position": 1}, "extremity": {"substation": 3, "position": 0}},
        {"origin": {"substation": 2, "position": 2}, "extremity": {"substation": 3, "position": 1}},
        {"origin": {"substation": 1, "position": 2}, "extremity": {"substation": 2, "position": 0}}
    ],
    "generators": [{"substation": 0, "position": 2}],
    "loads": [{"substation": 3, "position": 2}]
}"#;

pub fn ring_grid() -> GridDescription {
    GridDescription::from_json_str(RING_GRID).expect("ring grid should parse")
}

pub fn bridge_grid() -> GridDescription {
    GridDescription::from_json_str(BRIDGE_GRID).expect("bridge grid should parse")
}

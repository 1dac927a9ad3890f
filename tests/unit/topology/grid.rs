//! Tests for grid description parsing and slot layout construction

#[cfg(test)]
mod tests {
    use crate::unit::{RING_GRID, ring_grid};
    use busflag::GridError;
    use busflag::GridDescription;
    use busflag::topology::{Element, ElementKind};
    use std::io::Write;

    // Tests counts of a parsed description
    // Verified by dropping the loads list during parsing
    #[test]
    fn test_parse_counts() {
        let grid = ring_grid();
        assert_eq!(grid.substation_count(), 3);
        assert_eq!(grid.line_count(), 3);
        assert_eq!(grid.generator_count(), 2);
        assert_eq!(grid.load_count(), 2);
        assert!(grid.lines_off.is_empty());
    }

    // Tests optional lists default to empty
    // Verified by removing the serde default attribute
    #[test]
    fn test_optional_lists_default() {
        let grid = GridDescription::from_json_str(r#"{"substation_sizes": []}"#)
            .expect("minimal grid parses");
        assert_eq!(grid, GridDescription::default());
    }

    // Tests invalid JSON is reported as a parse error
    // Verified by mapping parse failures to file system errors
    #[test]
    fn test_parse_error() {
        let result = GridDescription::from_json_str(r#"{"lines": []}"#);
        assert!(matches!(result, Err(GridError::Parse { .. })));
    }

    // Tests slot layout puts each element at its declared position with its far end
    // Verified by attaching the near end instead of the far end
    #[test]
    fn test_element_layout() {
        let layout = ring_grid().element_layout().expect("ring layout is complete");
        assert_eq!(layout.len(), 3);

        let substation_one = layout.get(1).expect("substation 1 exists");
        assert_eq!(
            substation_one.iter().map(|element| element.kind).collect::<Vec<_>>(),
            vec![
                ElementKind::LineExtremity,
                ElementKind::Generator,
                ElementKind::LineOrigin,
                ElementKind::Load
            ]
        );
        assert_eq!(
            substation_one.first().copied(),
            Some(Element::line_extremity(0).with_far_end(0, 0))
        );
        assert_eq!(
            substation_one.get(2).copied(),
            Some(Element::line_origin(1).with_far_end(2, 0))
        );
        assert_eq!(substation_one.get(1).copied(), Some(Element::generator(1)));
    }

    // Tests two elements in one slot are rejected
    // Verified by letting later placements overwrite earlier ones
    #[test]
    fn test_malformed_topology() {
        let grid = GridDescription::from_json_str(
            r#"{
                "substation_sizes": [2, 2],
                "lines": [{"origin": {"substation": 0, "position": 0},
                           "extremity": {"substation": 1, "position": 0}}],
                "generators": [{"substation": 0, "position": 0}],
                "loads": [{"substation": 1, "position": 1}]
            }"#,
        )
        .expect("grid parses");

        let error = grid
            .element_layout()
            .expect_err("slot collision is rejected");
        assert!(matches!(
            error,
            GridError::MalformedTopology {
                substation: 0,
                position: 0,
                existing,
                incoming,
            } if existing.kind == ElementKind::LineOrigin && incoming == Element::generator(0)
        ));
    }

    // Tests an empty slot is reported
    // Verified by skipping empty slots silently
    #[test]
    fn test_missing_element() {
        let grid = GridDescription::from_json_str(
            r#"{
                "substation_sizes": [2],
                "generators": [{"substation": 0, "position": 1}]
            }"#,
        )
        .expect("grid parses");

        assert!(matches!(
            grid.element_layout(),
            Err(GridError::MissingElement {
                substation: 0,
                position: 0
            })
        ));
    }

    // Tests placements outside the grid are rejected
    // Verified by clamping positions to the substation size
    #[test]
    fn test_out_of_range_placements() {
        let unknown = GridDescription::from_json_str(
            r#"{"substation_sizes": [1], "loads": [{"substation": 3, "position": 0}]}"#,
        )
        .expect("grid parses");
        assert!(matches!(
            unknown.element_layout(),
            Err(GridError::UnknownSubstation {
                substation: 3,
                substations: 1
            })
        ));

        let overflow = GridDescription::from_json_str(
            r#"{"substation_sizes": [1], "loads": [{"substation": 0, "position": 1}]}"#,
        )
        .expect("grid parses");
        assert!(matches!(
            overflow.element_layout(),
            Err(GridError::InvalidParameter {
                parameter: "position",
                ..
            })
        ));
    }

    // Tests the initial line mask honours lines_off and rejects unknown lines
    // Verified by ignoring lines_off
    #[test]
    fn test_initial_line_mask() {
        let mut grid = ring_grid();
        grid.lines_off = vec![2];
        let mask = grid.initial_line_mask().expect("line 2 exists");
        assert_eq!(mask.off_lines().collect::<Vec<_>>(), vec![2]);

        grid.lines_off = vec![3];
        assert!(matches!(
            grid.initial_line_mask(),
            Err(GridError::InvalidParameter {
                parameter: "lines_off",
                ..
            })
        ));
    }

    // Tests loading from a file and the errors for missing or broken files
    // Verified by reporting read failures as parse errors
    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(RING_GRID.as_bytes()).expect("write grid");
        let grid = GridDescription::load(file.path()).expect("grid loads");
        assert_eq!(grid, ring_grid());

        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            GridDescription::load(&missing),
            Err(GridError::FileSystem {
                operation: "read",
                ..
            })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").expect("write broken grid");
        let error = GridDescription::load(&broken).expect_err("broken grid is rejected");
        assert!(matches!(error, GridError::Parse { ref path, .. } if *path == broken));
    }
}

//! Tests for connected component analysis and islanding detection

#[cfg(test)]
mod tests {
    use crate::unit::{bridge_grid, ring_grid};
    use busflag::GridDescription;
    use busflag::algorithm::adjacency::{AdjacencyModel, Vertex};
    use busflag::topology::{Bus, Element};

    const fn bus(substation: usize, bus: Bus) -> Vertex {
        Vertex::Bus { substation, bus }
    }

    // Tests an intact network forms one component with idle buses set aside
    // Verified by counting isolated buses as components
    #[test]
    fn test_nominal_single_component() {
        let model = AdjacencyModel::new(&ring_grid()).expect("ring graph builds");
        let report = model.find_disjoint_components();

        assert_eq!(report.component_count(), 1);
        assert!(!report.is_islanded());
        assert!(model.is_connected());
        assert_eq!(report.isolated_buses.len(), 3);
        assert!(report.dropped_substations.is_empty());

        let component = report.components.first().expect("one component");
        assert_eq!(component.representative, bus(0, Bus::One));
        assert_eq!(component.members.len(), 7);
    }

    // Tests cutting every line of a substation separates its bus and externals
    // Verified by seeding the search from generator vertices only
    #[test]
    fn test_all_lines_off_at_substation() {
        let mut model = AdjacencyModel::new(&ring_grid()).expect("ring graph builds");
        model.switch_line(0, false).expect("line 0 exists");
        model.switch_line(2, false).expect("line 2 exists");

        let report = model.find_disjoint_components();
        assert_eq!(report.component_count(), 2);
        assert!(report.is_islanded());
        assert!(!model.is_connected());

        let island = report
            .component_of(Vertex::Generator { index: 0 })
            .expect("generator 0 is in a component");
        assert_eq!(
            island.members,
            vec![bus(0, Bus::One), Vertex::Generator { index: 0 }]
        );
        assert_eq!(island.representative, bus(0, Bus::One));
    }

    // Tests a bridge outage splits the network in two
    // Verified by visiting neighbours of already visited vertices only
    #[test]
    fn test_bridge_outage() {
        let mut model = AdjacencyModel::new(&bridge_grid()).expect("bridge graph builds");
        assert!(model.is_connected());

        model.switch_line(4, false).expect("line 4 exists");
        let report = model.find_disjoint_components();
        assert_eq!(report.component_count(), 2);
        assert_eq!(
            report
                .component_of(Vertex::Load { index: 0 })
                .map(|component| component.representative),
            Some(bus(2, Bus::One))
        );
    }

    // Tests a split substation stays connected when both buses keep a line
    // Verified by treating bus 0 as part of bus 1
    #[test]
    fn test_split_substation_stays_connected() {
        let mut model = AdjacencyModel::new(&ring_grid()).expect("ring graph builds");
        model
            .assign_elements_to_bus(
                1,
                Bus::Zero,
                &[Element::line_extremity(0), Element::generator(1)],
            )
            .expect("elements belong to substation 1");

        let report = model.find_disjoint_components();
        assert_eq!(report.component_count(), 1);
        assert_eq!(report.isolated_buses.len(), 2);
        assert!(
            report
                .component_of(bus(1, Bus::Zero))
                .is_some_and(|component| component.members.contains(&bus(1, Bus::One)))
        );
    }

    // Tests a substation with no live connection at all is reported as dropped
    // Verified by skipping the dropped substation check
    #[test]
    fn test_dropped_substation() {
        let grid = GridDescription::from_json_str(
            r#"{
                "substation_sizes": [2, 2, 0],
                "lines": [
                    {"origin": {"substation": 0, "position": 0}, "extremity": {"substation": 1, "position": 0}},
                    {"origin": {"substation": 0, "position": 1}, "extremity": {"substation": 1, "position": 1}}
                ]
            }"#,
        )
        .expect("grid parses");
        let model = AdjacencyModel::new(&grid).expect("graph builds");
        let report = model.find_disjoint_components();

        assert_eq!(report.component_count(), 1);
        assert_eq!(report.dropped_substations, vec![2]);
        assert!(report.is_islanded());
    }
}

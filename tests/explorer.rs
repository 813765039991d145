use std::sync::Arc;

use sweepview::{load_results, Axis, Session, SolutionLauncher};

/// A small sweep: two scalar parameters, one vector parameter, two
/// objectives (one of them vector-valued).
const RESULTS: &str = "\
speed m/s;mass kg;target m|time s;drift m
0.5;1;0.4,0.0,0.8|1.93;0.012,0.003
0.5;2;0.4,0.0,0.8|1.95;0.014,0.004
1.0;1;0.4,0.0,0.8|0.98;0.006,0.002
1.0;2;0.2,0.3,1.1|1.21;0.007,0.002
2.0;1;0.2,0.3,1.1|0.61;0.004,0.001
2.0;2;0.2,0.3,1.1|0.64;0.005,0.001
";

fn load_fixture() -> Arc<sweepview::ResultsTable> {
    let path = std::env::temp_dir().join("sweepview_explorer_fixture.txt");
    std::fs::write(&path, RESULTS).unwrap();
    Arc::new(load_results(&path).unwrap())
}

#[test]
fn load_filter_and_address_a_run() {
    let table = load_fixture();

    // Vector fields on both sides of the header expanded in place.
    let dims = table.dimensions();
    assert_eq!((dims.rows, dims.parameters, dims.objectives), (6, 5, 3));
    assert_eq!(
        table.parameter_names(),
        ["speed m/s", "mass kg", "target1 m", "target2 m", "target3 m"]
    );
    assert_eq!(table.objective_names(), ["time s", "drift1 m", "drift2 m"]);
    let labels: Vec<&str> = table
        .array_fields()
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(labels, ["target m", "drift m"]);

    let mut session = Session::new(table);
    assert_eq!(session.selected_rows().len(), 6);

    // Narrow two axes; the selection is their conjunction.
    session.set_range("speed m/s", 0.5, 1.0).unwrap();
    session.set_range("mass kg", 2.0, 2.0).unwrap();
    let selected: Vec<usize> = session.selected_rows().iter().copied().collect();
    assert_eq!(selected, [1, 3]);

    // Free-text entry snaps onto the discrete domain before filtering.
    let snapped = session.snap_to_domain("speed m/s", 1.8).unwrap();
    assert_eq!(snapped, 2.0);
    session.set_range("speed m/s", snapped, snapped).unwrap();
    let selected: Vec<usize> = session.selected_rows().iter().copied().collect();
    assert_eq!(selected, [5]);

    // Pick a run and hand its opaque index to the launcher.
    struct Recorder(std::cell::Cell<Option<usize>>);
    impl SolutionLauncher for Recorder {
        fn launch(&self, solution: usize) -> anyhow::Result<()> {
            self.0.set(Some(solution));
            Ok(())
        }
    }

    session.pick_solution(3).unwrap();
    session.set_axis(Axis::Color, "time s").unwrap();
    let launcher = Recorder(std::cell::Cell::new(None));
    session.launch_current(&launcher).unwrap();
    assert_eq!(launcher.0.get(), Some(3));
}

#[test]
fn row_identity_survives_filtering() {
    let table = load_fixture();
    let mut session = Session::new(Arc::clone(&table));

    session.set_range("mass kg", 1.0, 1.0).unwrap();
    assert_eq!(session.selected_rows().len(), 3);
    for &row in session.selected_rows() {
        // Indices still address the original table rows.
        assert_eq!(table.row(row).unwrap()[1], 1.0);
    }
}

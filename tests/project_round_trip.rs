//! End-to-end: a project compiles to a G-code file on disk and the
//! simulator reads the program back into sensible positions.

use millkit::{parse_gcode, Diagnostics, Project};
use std::fs;

const PROJECT: &str = r#"{
    "name": "Round trip",
    "units": "metric",
    "job": {
        "safe_z": 5.0,
        "tool": {"diameter": 3.0, "feed_rate": 600.0, "plunge_feed": 200.0, "spindle_speed": 10000.0}
    },
    "operations": [
        {
            "name": "Engrave frame",
            "strategy": "engrave",
            "paths": [{"points": [[0.0,0.0],[20.0,0.0],[20.0,20.0],[0.0,20.0]]}],
            "params": {"bottom_z": -0.5, "pass_depth": 0.5}
        }
    ]
}"#;

#[test]
fn compiled_program_survives_the_filesystem_and_parses_back() {
    let project = Project::from_json(PROJECT).unwrap();
    let mut diag = Diagnostics::new();
    let gcode = project.compile(&mut diag).unwrap();
    assert!(diag.is_empty(), "unexpected warnings: {:?}", diag.warnings());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("round_trip.gcode");
    fs::write(&out, &gcode).unwrap();
    let read_back = fs::read_to_string(&out).unwrap();
    assert_eq!(read_back, gcode);

    let points = parse_gcode(&read_back).unwrap();
    assert!(!points.is_empty());
    // every commanded position stays on or inside the drawn frame,
    // between the cut floor and the safe height
    for p in &points {
        assert!((0.0..=20.0).contains(&p.x), "x out of range: {}", p.x);
        assert!((0.0..=20.0).contains(&p.y), "y out of range: {}", p.y);
        assert!((-0.5..=5.0).contains(&p.z), "z out of range: {}", p.z);
    }
    // the cutter reaches the floor and comes back up
    assert!(points.iter().any(|p| p.z == -0.5 && !p.rapid));
    assert_eq!(points.last().unwrap().z, 5.0);
}

#[test]
fn project_json_round_trips_without_loss() {
    let project = Project::from_json(PROJECT).unwrap();
    let json = project.to_json().unwrap();
    let back = Project::from_json(&json).unwrap();
    assert_eq!(back.name, project.name);
    assert_eq!(back.units, project.units);
    assert_eq!(back.operations.len(), 1);
    assert_eq!(back.operations[0].name, "Engrave frame");
    assert_eq!(back.job.tool.feed_rate, 600.0);

    let mut diag = Diagnostics::new();
    assert_eq!(
        back.compile(&mut diag).unwrap(),
        project.compile(&mut Diagnostics::new()).unwrap()
    );
}

use millkit_sim::{parse_gcode, SimPoint};
use proptest::prelude::*;

#[test]
fn full_program_reduces_to_commanded_positions() {
    let program = "\
; Cut out
; Tool diameter: 3.000 mm
G21 ; Set units to millimeters
G90 ; Absolute positioning
M3 S12000 ; Start spindle
G0 Z5.000 ; Move to safe height
G0 X10.000 Y10.000
G0 Z0.000
G1 Z-1.000 F200.0
G1 X40.000 Y10.000 F600.0
G1 X40.000 Y40.000
G0 Z5.000
M5 ; Stop spindle
M2 ; End program
";
    let points = parse_gcode(program).unwrap();
    assert_eq!(points.len(), 6);
    assert_eq!(
        points[0],
        SimPoint {
            x: 10.0,
            y: 10.0,
            z: 5.0,
            f: 0.0,
            rapid: true
        }
    );
    assert_eq!(points[2].z, 0.0);
    assert_eq!(
        points[3],
        SimPoint {
            x: 10.0,
            y: 10.0,
            z: -1.0,
            f: 200.0,
            rapid: false
        }
    );
    assert_eq!(points[4].f, 600.0);
    assert!(!points[4].rapid);
    assert!(points[5].rapid);
    assert_eq!(points[5].z, 5.0);
}

proptest! {
    #[test]
    fn formatted_moves_parse_back_exactly(
        coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..40)
    ) {
        let mut program = String::from("G1 F100\n");
        for (x, y) in &coords {
            program.push_str(&format!("G1 X{x:.3} Y{y:.3}\n"));
        }
        let points = parse_gcode(&program).unwrap();
        prop_assert_eq!(points.len(), coords.len());
        for (p, (x, y)) in points.iter().zip(&coords) {
            let rx = (x * 1000.0).round() / 1000.0;
            let ry = (y * 1000.0).round() / 1000.0;
            prop_assert!((p.x - rx).abs() < 1e-9);
            prop_assert!((p.y - ry).abs() < 1e-9);
            prop_assert!(!p.rapid);
        }
    }

    #[test]
    fn point_count_never_exceeds_line_count(text in "[GXYZF0-9 .\n-]{0,200}") {
        if let Ok(points) = parse_gcode(&text) {
            prop_assert!(points.len() <= text.lines().count());
        }
    }
}

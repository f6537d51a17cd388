use gcodetexture_core::Position;
use gcodetexture_gcode::{BlockKind, LineParser, MachineModel, MotionMode, Plane};

fn feed(machine: &mut MachineModel, program: &str) {
    let parser = LineParser::new();
    for (i, text) in program.lines().enumerate() {
        let line = parser.parse(i as u32 + 1, text).unwrap();
        machine.advance(&line).unwrap();
    }
}

#[test]
fn test_vase_mode_spiral_tracking() {
    let mut machine = MachineModel::new();
    feed(
        &mut machine,
        "G28\nG90\nM82\nG92 E0\nG1 Z0.2 F1200\nG1 X10 Y0 E0.1\nG1 X0 Y10 Z0.25 E0.2\nX-10 Y0 Z0.3 E0.3",
    );
    assert_eq!(machine.position(), Position::new(-10.0, 0.0, 0.3));
    assert_eq!(machine.motion_mode(), MotionMode::Linear);
}

#[test]
fn test_modal_motion_reused_for_axis_only_lines() {
    let mut machine = MachineModel::new();
    feed(&mut machine, "G0 X5 Y5\nX6");
    assert_eq!(machine.motion_mode(), MotionMode::Rapid);
    assert_eq!(machine.position().x, 6.0);
}

#[test]
fn test_plane_selection_tracked() {
    let mut machine = MachineModel::new();
    feed(&mut machine, "G18");
    assert_eq!(machine.plane(), Plane::XZ);
}

#[test]
fn test_transition_is_pure() {
    let machine = MachineModel::new();
    let line = LineParser::new().parse(1, "G1 X3 Y4 Z5").unwrap();
    let t = machine.transition(&line).unwrap();
    assert_eq!(t.kind, BlockKind::Motion(MotionMode::Linear));
    assert_eq!(t.next.position(), Position::new(3.0, 4.0, 5.0));
    assert_eq!(machine.position(), Position::origin());
}

#[test]
fn test_non_motion_blocks_are_other() {
    let machine = MachineModel::new();
    let parser = LineParser::new();
    for text in ["M104 S210", ";comment", "", "G4 P100", "START_PRINT"] {
        let line = parser.parse(1, text).unwrap();
        assert_eq!(machine.transition(&line).unwrap().kind, BlockKind::Other);
    }
}

#[test]
fn test_g10_axis_words_do_not_move() {
    let machine = MachineModel::new();
    let line = LineParser::new().parse(1, "G10 L20 P1 X0 Y0").unwrap();
    let t = machine.transition(&line).unwrap();
    assert_eq!(t.kind, BlockKind::Other);
    assert_eq!(t.next.position(), Position::origin());
}

#[test]
fn test_invalid_state_carries_line_number() {
    let machine = MachineModel::new();
    let line = LineParser::new().parse(88, "G90 G91").unwrap();
    let err = machine.transition(&line).unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(err.line_number(), 88);
}

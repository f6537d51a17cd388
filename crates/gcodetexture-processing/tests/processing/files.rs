use std::fs;

use gcodetexture_processing::{process_file, Modifier, ModifierPipeline, TextureEngine};
use tempfile::TempDir;

#[test]
fn test_process_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cup.gcode");
    let output = dir.path().join("cup-textured.gcode");
    fs::write(
        &input,
        "G90\nM82\nG1 X10 Y0 Z7 E1.0\nG1 X9.239 Y3.827 Z7 E2.0\nG1 X10 Y0 Z7.1 E3.0\n",
    )
    .unwrap();

    let mut pipeline = ModifierPipeline::new();
    pipeline.register(Modifier::radial_ripple(5.0, 0.05, 4.0).unwrap());
    let stats = process_file(&input, &output, TextureEngine::new(pipeline)).unwrap();

    assert_eq!(stats.lines_read, 5);
    assert_eq!(stats.lines_written, 5);
    assert_eq!(stats.z_changes, 1);

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "G90");
    assert!(lines[3].contains("Z7.100"));
    assert_eq!(lines[4], "G1 X10 Y0 Z7.1 E3.0");
}

#[test]
fn test_process_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = process_file(
        &dir.path().join("missing.gcode"),
        &dir.path().join("out.gcode"),
        TextureEngine::new(ModifierPipeline::new()),
    )
    .unwrap_err();
    assert!(matches!(err, gcodetexture_core::Error::Io(_)));
}

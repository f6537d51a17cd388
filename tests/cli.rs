use std::ffi::OsStr;
use std::fs;

use clap::Parser;
use gcodetexture::cli::{run, Cli};
use tempfile::TempDir;

fn parse(args: &[&OsStr]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).unwrap()
}

const PROGRAM: &str = "G90\nM82\nG92 E0\nG1 X10 Y0 Z7 E1.0\nG1 X9.239 Y3.827 Z7 E2.0\n";

#[test]
fn test_run_writes_default_output_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cup.gcode");
    let config = dir.path().join("texture.toml");
    fs::write(&input, PROGRAM).unwrap();
    fs::write(
        &config,
        "[[modifiers]]\ntype = \"radial_ripple\"\nmin_height = 5.0\nincrease_per_unit_height = 0.05\ncycles_per_revolution = 4.0\n",
    )
    .unwrap();

    let cli = parse(&[
        OsStr::new("gcodetexture"),
        OsStr::new("--config"),
        config.as_os_str(),
        input.as_os_str(),
    ]);
    let stats = run(&cli).unwrap().unwrap();
    assert_eq!(stats.lines_read, 5);
    assert_eq!(stats.lines_modified, 1);

    let written = fs::read_to_string(dir.path().join("cup-textured.gcode")).unwrap();
    assert!(written.contains("Z7.100"));
}

#[test]
fn test_run_with_explicit_output_and_empty_pipeline() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cup.gcode");
    let output = dir.path().join("out.gcode");
    let config = dir.path().join("texture.json");
    fs::write(&input, PROGRAM).unwrap();
    fs::write(&config, r#"{"modifiers": []}"#).unwrap();

    let cli = parse(&[
        OsStr::new("gcodetexture"),
        OsStr::new("-c"),
        config.as_os_str(),
        OsStr::new("-o"),
        output.as_os_str(),
        input.as_os_str(),
    ]);
    run(&cli).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), PROGRAM);
}

#[test]
fn test_run_reports_bad_config() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cup.gcode");
    let config = dir.path().join("texture.toml");
    fs::write(&input, PROGRAM).unwrap();
    fs::write(&config, "[[modifiers]]\ntype = \"knurl\"\nmin_height = 1.0\n").unwrap();

    let cli = parse(&[
        OsStr::new("gcodetexture"),
        OsStr::new("-c"),
        config.as_os_str(),
        input.as_os_str(),
    ]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{:#}", err).contains("Unknown modifier type: knurl"));
}

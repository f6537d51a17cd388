use gcodetexture_processing::{
    LineOutput, Modifier, ModifierPipeline, TextureEngine, TextureStream,
};

fn default_pipeline() -> ModifierPipeline {
    let mut pipeline = ModifierPipeline::new();
    pipeline
        .register(Modifier::radial_ripple(5.0, 0.05, 4.0).unwrap())
        .register(Modifier::flow_wave(5.0, 1.0, 0.02).unwrap());
    pipeline
}

fn texture(input: &str, pipeline: ModifierPipeline) -> String {
    let mut out = Vec::new();
    TextureStream::new(TextureEngine::new(pipeline))
        .process(input.as_bytes(), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

/// A short spiral around the origin climbing from Z4 to Z8
fn spiral() -> String {
    let mut program = String::from("; spiral\nG21\nG90\nM82\nG92 E0\nG1 Z4.000 F1200\n");
    let mut e = 0.0;
    for i in 0..=160 {
        let angle = f64::from(i) * std::f64::consts::TAU / 40.0;
        let z = 4.0 + f64::from(i) * 0.025;
        e += 0.05;
        program.push_str(&format!(
            "G1 X{:.3} Y{:.3} Z{:.3} E{:.4}\n",
            20.0 * angle.cos(),
            20.0 * angle.sin(),
            z,
            e
        ));
    }
    program.push_str("M107\n");
    program
}

#[test]
fn test_identity_when_start_height_above_print() {
    let mut pipeline = ModifierPipeline::new();
    pipeline
        .register(Modifier::radial_ripple(100.0, 0.05, 4.0).unwrap())
        .register(Modifier::flow_wave(100.0, 1.0, 0.02).unwrap());
    let input = spiral();
    assert_eq!(texture(&input, pipeline), input);
}

#[test]
fn test_spiral_is_textured_above_start_height() {
    let input = spiral();
    let output = texture(&input, default_pipeline());
    assert_eq!(output.lines().count(), input.lines().count());

    for (before, after) in input.lines().zip(output.lines()) {
        let z: Option<f64> = before
            .split_whitespace()
            .find_map(|w| w.strip_prefix('Z'))
            .and_then(|v| v.parse().ok());
        match z {
            Some(z) if z < 5.0 => assert_eq!(before, after),
            _ => {}
        }
    }
    assert!(output.contains("; Z "));
}

#[test]
fn test_rewritten_extrusion_never_decreases() {
    let output = texture(&spiral(), default_pipeline());
    let mut previous = 0.0;
    for line in output.lines().filter(|l| l.starts_with("G1 X")) {
        let e: f64 = line
            .split_whitespace()
            .find_map(|w| w.strip_prefix('E'))
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!(e >= previous, "E went backwards at '{}'", line);
        previous = e;
    }
}

#[test]
fn test_g92_mid_stream_resets_reference() {
    let mut engine = TextureEngine::new(default_pipeline());
    let lines = [
        "G1 X10 Y0 Z6 E40.0",
        "G1 X9.239 Y3.827 Z6 E41.0",
        "G92 E0",
        "G1 X7.071 Y7.071 Z6 E0.8",
    ];
    for (i, text) in lines.iter().enumerate() {
        engine.process_line(i as u32 + 1, text).unwrap();
        if i == 2 {
            assert_eq!(engine.tracker().extrusion_reference(), 0.0);
        }
    }
    // the reset keeps the clamp from pinning E to the pre-reset value
    assert!(engine.tracker().extrusion_reference() < 1.0);
}

#[test]
fn test_zero_displacement_at_quarter_turn() {
    let mut pipeline = ModifierPipeline::new();
    pipeline.register(Modifier::radial_ripple(5.0, 0.02, 6.0).unwrap());
    let mut engine = TextureEngine::new(pipeline);
    engine.process_line(1, "G1 X0 Y9 Z5 E1.4").unwrap();
    let out = engine.process_line(2, "G1 X0.000 Y10.000 Z6.000 E1.5000").unwrap();
    assert_eq!(out, LineOutput::Unchanged);
}

#[test]
fn test_relative_extrusion_keeps_retractions() {
    let mut engine = TextureEngine::new(default_pipeline());
    let lines = ["M83", "G1 X10 Y0 Z6 E0.5", "G1 X9.239 Y3.827 Z6 E-0.8"];
    let outputs: Vec<LineOutput> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| engine.process_line(i as u32 + 1, text).unwrap())
        .collect();
    let text = match &outputs[2] {
        LineOutput::Rewritten(text) => text.clone(),
        other => panic!("expected rewrite, got {:?}", other),
    };
    assert!(text.contains("E-0.8"), "{}", text);
}

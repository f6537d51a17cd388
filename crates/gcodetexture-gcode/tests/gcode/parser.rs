use gcodetexture_gcode::{CommentStyle, LineParser};
use proptest::prelude::*;

#[test]
fn test_slicer_header_lines() {
    let parser = LineParser::new();
    let lines = [
        ";FLAVOR:Marlin",
        "M140 S60",
        "M190 S60 ; wait for bed",
        "G28 ; home all axes",
        "M83",
        "G92 E0",
        "",
    ];
    for (i, text) in lines.iter().enumerate() {
        let line = parser.parse(i as u32 + 1, text).unwrap();
        assert_eq!(line.raw(), *text);
    }
}

#[test]
fn test_word_spans_cover_original_text() {
    let parser = LineParser::new();
    let text = "G1 X-12.5 Y+3 Z0.2 E0.04512 F1200";
    let line = parser.parse(1, text).unwrap();
    let rebuilt: Vec<&str> = line.words().iter().map(|w| &text[w.span.clone()]).collect();
    assert_eq!(rebuilt, vec!["G1", "X-12.5", "Y+3", "Z0.2", "E0.04512", "F1200"]);
    assert_eq!(line.fields().y, Some(3.0));
}

#[test]
fn test_parenthesis_comment_style() {
    let line = LineParser::new().parse(1, "(outer wall) G1 X1 Y1").unwrap();
    assert_eq!(line.comments()[0].style, CommentStyle::Parenthesis);
    assert_eq!(line.comment(), Some("outer wall"));
    assert!(line.fields().has_xy());
}

#[test]
fn test_gcode_with_subcode() {
    let line = LineParser::new().parse(1, "G38.2 Z-5 F100").unwrap();
    let code = line.fields().g_codes[0];
    assert_eq!(code.number, 38);
    assert_eq!(code.subcode, Some(2));
    assert!(!line.fields().has_g(38));
}

#[test]
fn test_malformed_reports_line_number() {
    let err = LineParser::new().parse(1234, "G1 X10 #5").unwrap_err();
    assert_eq!(err.line_number(), 1234);
    assert!(!err.is_invalid_state());
}

proptest! {
    #[test]
    fn prop_formatted_motion_lines_parse(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        z in 0.0f64..300.0,
        e in 0.0f64..10000.0,
    ) {
        let text = format!("G1 X{:.3} Y{:.3} Z{:.3} E{:.4}", x, y, z, e);
        let line = LineParser::new().parse(1, &text).unwrap();
        let fields = line.fields();
        prop_assert!((fields.x.unwrap() - x).abs() < 1e-3);
        prop_assert!((fields.y.unwrap() - y).abs() < 1e-3);
        prop_assert!((fields.z.unwrap() - z).abs() < 1e-3);
        prop_assert!((fields.e.unwrap() - e).abs() < 1e-4);
    }

    #[test]
    fn prop_comment_text_never_produces_words(comment in "[ -~]{0,40}") {
        let text = format!(";{}", comment);
        let line = LineParser::new().parse(1, &text).unwrap();
        prop_assert!(!line.has_words());
        prop_assert_eq!(line.comment(), Some(comment.as_str()));
    }
}

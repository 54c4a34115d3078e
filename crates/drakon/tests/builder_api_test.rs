//! Integration tests for the DiagramBuilder API

use drakon::{
    DiagramBuilder, DrakonError,
    config::{AppConfig, LayoutConfig, TextConfig},
};

fn fixed_builder() -> DiagramBuilder {
    DiagramBuilder::new(AppConfig::new(
        LayoutConfig::default(),
        TextConfig::default().with_fixed_width(8.0),
    ))
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_simple_diagram() {
    let source = r#"drakon "d" { action "a" "Do it" {} }"#;

    let builder = DiagramBuilder::default();
    let result = builder.parse(source);
    assert!(result.is_ok(), "Should parse valid diagram: {:?}", result.err());
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let builder = DiagramBuilder::default();
    let result = builder.parse(r#"drakon "d" { action "a" { text = } }"#);

    match result {
        Err(DrakonError::Parse { err, src }) => {
            assert!(!err.diagnostics().is_empty());
            assert!(src.contains("action"));
        }
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_parse_lenient_keeps_degraded_diagram() {
    let source = r#"drakon "d" { action "a" {} action "a" {} action "b" {} }"#;

    let builder = fixed_builder();
    assert!(builder.parse(source).is_err());

    let (diagram, diagnostics) = builder.parse_lenient(source).expect("Failed to parse");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagram.node("b").is_some());
}

#[test]
fn test_parse_lenient_without_root_fails() {
    let result = fixed_builder().parse_lenient("title = \"orphan\"");
    assert!(matches!(result, Err(DrakonError::Parse { .. })));
}

#[test]
fn test_layout_and_report() {
    let source = r#"
        drakon "order" {
            parameters = "order_id"
            question "paid" {
                text = "Paid?"
                no = { action "remind" { text = "Send reminder" } }
            }
            action "ship" { text = "Ship order" }
        }
    "#;

    let builder = fixed_builder();
    let mut diagram = builder.parse(source).expect("Failed to parse");
    let layout = builder.layout(&mut diagram).expect("Failed to lay out");

    assert!(diagram.nodes().iter().all(|node| node.geometry().is_some()));
    assert_eq!(layout.positions().len(), diagram.nodes().len());

    let report = builder
        .render_report(&diagram, &layout)
        .expect("Failed to render");
    assert!(report.contains("title = \"order\""));
    assert!(report.contains("[[nodes]]"));
    assert!(report.contains("[[edges]]"));
}

#[test]
fn test_invalid_text_config_is_reported() {
    let config = AppConfig::new(LayoutConfig::default(), TextConfig::default().with_fixed_width(-2.0));
    let builder = DiagramBuilder::new(config);
    let mut diagram = builder
        .parse(r#"drakon "d" { action "a" {} }"#)
        .expect("Failed to parse");

    assert!(matches!(builder.layout(&mut diagram), Err(DrakonError::Config(_))));
}

#[test]
fn test_placeholder_reports() {
    let builder = DiagramBuilder::default();
    let with_errors = builder.render_placeholder(true).expect("Failed to render");
    assert!(with_errors.contains("Fix syntax errors in the HCL diagram to see a preview."));

    let empty = builder.render_placeholder(false).expect("Failed to render");
    assert!(empty.contains("Define blocks using the HCL-based DRAKON DSL."));
}

#[test]
fn test_builder_reusability() {
    let builder = fixed_builder();

    let mut first = builder
        .parse(r#"drakon "one" { action "a" {} }"#)
        .expect("Failed to parse first diagram");
    let mut second = builder
        .parse(r#"drakon "two" { action "b" {} action "c" {} }"#)
        .expect("Failed to parse second diagram");

    let first_layout = builder.layout(&mut first).expect("Failed to lay out first");
    let second_layout = builder.layout(&mut second).expect("Failed to lay out second");

    assert_eq!(first_layout.positions().len(), 3);
    assert_eq!(second_layout.positions().len(), 4);
}

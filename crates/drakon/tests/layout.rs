use drakon::{
    DiagramBuilder,
    config::{AppConfig, LayoutConfig, TextConfig},
    layout::LayoutResult,
    semantic::Diagram,
};
use float_cmp::assert_approx_eq;

fn lay_out(source: &str) -> (Diagram, LayoutResult) {
    let builder = DiagramBuilder::new(AppConfig::new(
        LayoutConfig::default(),
        TextConfig::default().with_fixed_width(8.0),
    ));
    let mut diagram = builder.parse(source).expect("Failed to parse");
    let layout = builder.layout(&mut diagram).expect("Failed to lay out");
    (diagram, layout)
}

#[test]
fn test_branch_head_stays_level_with_question() {
    let (_, layout) = lay_out(
        r#"
        drakon "q" {
            question "check" {
                next = "after"
                yes = { action "fix" {} }
            }
            action "after" {}
        }
        "#,
    );

    assert_eq!(layout.depth("q@start"), Some(0));
    assert_eq!(layout.depth("check"), Some(1));
    assert_eq!(layout.depth("fix"), Some(1));
    assert_eq!(layout.depth("after"), Some(2));
    assert_eq!(layout.depth("q@end"), Some(3));

    let check = layout.position("check").expect("check");
    let fix = layout.position("fix").expect("fix");
    assert_approx_eq!(f32, check.y(), fix.y());
    assert!(fix.x() > check.x());
    assert_eq!(layout.columns().len(), 2);
}

#[test]
fn test_rejoin_waits_for_longest_branch() {
    let (_, layout) = lay_out(
        r#"
        drakon "q" {
            question "check" {
                next = "after"
                no = {
                    action "one" {}
                    action "two" {}
                    action "three" {}
                }
            }
            action "after" {}
        }
        "#,
    );

    // check(1) -> one(1) -> two(2) -> three(3) -> after(4)
    assert_eq!(layout.depth("three"), Some(3));
    assert_eq!(layout.depth("after"), Some(4));
    let three = layout.position("three").expect("three");
    let after = layout.position("after").expect("after");
    assert!(after.y() > three.y());
}

#[test]
fn test_parameters_sit_beside_start() {
    let (diagram, layout) = lay_out(
        r#"
        drakon "p" {
            parameters = { order = "Order" amount = 12 }
            action "a" {}
        }
        "#,
    );

    let parameters = diagram.node("parameters").expect("parameters");
    assert_eq!(parameters.label(), "order = Order\namount = 12");

    let start = layout.position("p@start").expect("start");
    let params = layout.position("parameters").expect("parameters");
    assert_approx_eq!(f32, start.y(), params.y());
    assert!(params.x() > start.x());
}

#[test]
fn test_canvas_grows_with_content() {
    let (_, small) = lay_out(r#"drakon "s" { action "a" {} }"#);
    let (_, large) = lay_out(
        r#"
        drakon "l" {
            action "a" {} action "b" {} action "c" {} action "d" {} action "e" {}
            lane "side" { action "f" {} }
            lane "more" { action "g" {} }
        }
        "#,
    );

    assert!(large.size().height() > small.size().height());
    assert!(large.size().width() > small.size().width());
    assert!(small.size().width() >= 640.0);
    assert!(small.size().height() >= 600.0);
}

#[test]
fn test_long_labels_wrap() {
    let (diagram, _) = lay_out(
        r#"
        drakon "w" {
            action "a" {
                text = "Collect the payment details from the customer and validate every field"
            }
        }
        "#,
    );

    let geometry = diagram.node("a").and_then(|n| n.geometry()).expect("geometry");
    assert!(geometry.lines().len() > 1);
    // 184px of text width at 8px per character.
    assert!(geometry.lines().iter().all(|line| line.chars().count() <= 23));
}

#[test]
fn test_layout_is_deterministic() {
    let source = r#"
        drakon "c" {
            parameters = "input"
            choice "size" {
                case "small" { action "box" {} }
                case "large" { action "crate" {} }
                else { action "refuse" {} }
            }
            for_each "items" { action "pack" {} }
        }
    "#;

    let (first_diagram, first) = lay_out(source);
    let (second_diagram, second) = lay_out(source);
    assert_eq!(first_diagram, second_diagram);
    assert_eq!(first, second);
}

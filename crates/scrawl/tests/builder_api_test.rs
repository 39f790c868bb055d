//! Integration tests for the DiagramBuilder API

use scrawl::{DiagramBuilder, ScrawlError, config::AppConfig, shape::ShapeKind};

const BOXES: &str = "\
+-------+      +-------+
| cBLU  |      |       |
| start +----> |  end  |
+-------+      +-------+";

fn config(toml_source: &str) -> AppConfig {
    toml::from_str(toml_source).expect("valid test configuration")
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_boxes_and_arrow() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(BOXES).expect("Failed to parse diagram");

    assert_eq!(diagram.closed_shapes().count(), 2);
    assert_eq!(
        diagram
            .shapes()
            .iter()
            .filter(|shape| shape.kind() == ShapeKind::Arrowhead)
            .count(),
        1
    );
    let texts: Vec<&str> = diagram.labels().iter().map(|label| label.text()).collect();
    assert!(texts.contains(&"start"));
    assert!(texts.contains(&"end"));
}

#[test]
fn test_render_diagram() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(BOXES).expect("Failed to parse diagram");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("start"));
    assert!(svg.contains("feGaussianBlur"), "Shadows are on by default");
}

#[test]
fn test_style_configuration_reaches_renderer() {
    let builder = DiagramBuilder::new(config(
        r#"
        [style]
        shadows = false
        stroke_width = 3.0
        "#,
    ));
    let diagram = builder.parse(BOXES).expect("Failed to parse diagram");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(!svg.contains("feGaussianBlur"));
    assert!(svg.contains("stroke-width=\"3\""));
}

#[test]
fn test_processing_configuration_reaches_parser() {
    let source = "+---+---+\n|   |   |\n+---+---+";

    let separated = DiagramBuilder::default().parse(source).unwrap();
    let joined = DiagramBuilder::new(config("[processing]\nseparate_common_edges = false"))
        .parse(source)
        .unwrap();

    assert_eq!(separated.shapes()[0].points()[1].x(), 63.0);
    assert_eq!(joined.shapes()[0].points()[1].x(), 65.0);
}

#[test]
fn test_strict_mode_accepts_well_formed_input() {
    let builder = DiagramBuilder::new(config("[processing]\nstrict = true"));
    assert!(builder.parse(BOXES).is_ok());
    assert!(builder.reconstruct(BOXES).malformed().is_empty());
}

#[test]
fn test_invalid_background_is_a_config_error() {
    let builder = DiagramBuilder::new(config("[style]\nbackground_color = \"not-a-color\""));
    let diagram = builder.parse(BOXES).expect("Failed to parse diagram");

    match builder.render_svg(&diagram) {
        Err(ScrawlError::Config(message)) => assert!(message.contains("background")),
        other => panic!("Expected config error, got {other:?}"),
    }
}

#[test]
fn test_empty_input_renders() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse("").expect("Empty input parses");
    assert!(diagram.shapes().is_empty());

    let svg = builder.render_svg(&diagram).expect("Failed to render");
    assert!(svg.contains("</svg>"));
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let first = builder.parse("+--+\n|  |\n+--+").unwrap();
    let second = builder.parse("---->").unwrap();

    assert_eq!(first.closed_shapes().count(), 1);
    assert_eq!(second.open_shapes().count(), 1);
    assert!(builder.render_svg(&first).is_ok());
    assert!(builder.render_svg(&second).is_ok());
}

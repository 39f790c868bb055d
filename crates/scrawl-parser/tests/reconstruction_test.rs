//! End-to-end reconstruction scenarios.
//!
//! Coordinates assume the default 10x14 pixel cells and the two-cell blank
//! border added at load time, so the glyph in text column 0, line 0 has its
//! centre at (25, 35).

use scrawl_core::{
    color::Color,
    diagram::TextAlign,
    geometry::Bounds,
    shape::{PointKind, Shape, ShapeKind},
};
use scrawl_parser::{ParseConfig, parse, reconstruct_source};

fn positions(shape: &Shape) -> Vec<(f32, f32)> {
    shape.points().iter().map(|p| (p.x(), p.y())).collect()
}

fn parse_default(source: &str) -> scrawl_core::diagram::Diagram {
    parse(source, &ParseConfig::default()).expect("lenient parsing never fails")
}

#[test]
fn test_single_box() {
    let diagram = parse_default("+---+\n|   |\n+---+");

    assert_eq!(diagram.shapes().len(), 1);
    let shape = &diagram.shapes()[0];
    assert!(shape.is_closed());
    assert!(!shape.is_dashed());
    assert_eq!(shape.kind(), ShapeKind::Simple);
    assert_eq!(
        positions(shape),
        vec![(25.0, 35.0), (65.0, 35.0), (65.0, 63.0), (25.0, 63.0)]
    );
    assert!(diagram.labels().is_empty());
}

#[test]
fn test_boxes_sharing_a_wall_are_separated() {
    let diagram = parse_default("+---+---+\n|   |   |\n+---+---+");

    let closed: Vec<&Shape> = diagram.closed_shapes().collect();
    assert_eq!(closed.len(), 2);
    assert_eq!(
        positions(closed[0]),
        vec![(25.0, 35.0), (63.0, 35.0), (63.0, 63.0), (25.0, 63.0)]
    );
    assert_eq!(
        positions(closed[1]),
        vec![(67.0, 35.0), (105.0, 35.0), (105.0, 63.0), (67.0, 63.0)]
    );
}

#[test]
fn test_box_crossed_by_line_keeps_its_walls() {
    let diagram = parse_default(
        "+-----+\n|  A  |C                 B\n+  ---+-------------------\n|     |\n+-----+",
    );

    let closed: Vec<&Shape> = diagram.closed_shapes().collect();
    assert_eq!(closed.len(), 1);
    let bounds = closed[0].bounds().expect("box has points");
    assert_eq!(
        (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y()),
        (25.0, 35.0, 85.0, 91.0)
    );
}

#[test]
fn test_wall_shared_with_two_boxes() {
    let diagram = parse_default("+---+---+\n|   |   |\n|   +---+\n|   |   |\n+---+---+");

    let closed: Vec<&Shape> = diagram.closed_shapes().collect();
    assert_eq!(closed.len(), 3);
    let tall = closed
        .iter()
        .find(|shape| shape.bounds().is_some_and(|b| b.min_x() == 25.0))
        .expect("tall box on the left");
    let bounds = tall.bounds().expect("box has points");
    assert_eq!((bounds.max_x(), bounds.min_y(), bounds.max_y()), (63.0, 35.0, 91.0));
}

#[test]
fn test_separation_can_be_disabled() {
    let config = ParseConfig::default().with_separate_common_edges(false);
    let diagram = parse("+---+---+\n|   |   |\n+---+---+", &config).unwrap();

    let closed: Vec<&Shape> = diagram.closed_shapes().collect();
    assert_eq!(closed.len(), 2);
    assert_eq!(closed[0].points()[1].x(), 65.0);
    assert_eq!(closed[1].points()[0].x(), 65.0);
}

#[test]
fn test_arrow_between_words() {
    let diagram = parse_default("A---->B");

    let open: Vec<&Shape> = diagram.open_shapes().collect();
    assert_eq!(open.len(), 1);
    assert_eq!(positions(open[0]), vec![(30.0, 35.0), (75.0, 35.0)]);
    assert!(!open[0].points()[0].is_locked());
    assert!(open[0].points()[1].is_locked());

    let arrowheads: Vec<&Shape> = diagram
        .shapes()
        .iter()
        .filter(|shape| shape.kind() == ShapeKind::Arrowhead)
        .collect();
    assert_eq!(arrowheads.len(), 1);
    assert_eq!(
        positions(arrowheads[0]),
        vec![(70.0, 28.0), (80.0, 35.0), (70.0, 42.0)]
    );

    let texts: Vec<&str> = diagram.labels().iter().map(|label| label.text()).collect();
    assert_eq!(texts, vec!["A", "B"]);
    assert_eq!(diagram.labels()[0].bounds(), Bounds::new(20.0, 28.0, 30.0, 42.0));
    assert_eq!(diagram.labels()[0].align(), TextAlign::Middle);
}

#[test]
fn test_dashed_box() {
    let diagram = parse_default("+-=-+\n:   |\n+---+");

    assert_eq!(diagram.shapes().len(), 1);
    assert!(diagram.shapes()[0].is_closed());
    assert!(diagram.shapes()[0].is_dashed());
}

#[test]
fn test_line_leaving_a_box() {
    let diagram = parse_default("+---+\n|   +----\n+---+");

    let closed: Vec<&Shape> = diagram.closed_shapes().collect();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].points().len(), 4);

    let open: Vec<&Shape> = diagram.open_shapes().collect();
    assert_eq!(open.len(), 1);
    assert_eq!(positions(open[0]), vec![(65.0, 49.0), (110.0, 49.0)]);
    assert!(open[0].points()[0].is_locked());
}

#[test]
fn test_empty_input() {
    let diagram = parse_default("");
    assert!(diagram.shapes().is_empty());
    assert!(diagram.labels().is_empty());

    let blank = parse_default("   \n\t\n");
    assert!(blank.shapes().is_empty());
}

#[test]
fn test_label_inside_box() {
    let diagram = parse_default("+-------+\n| hello |\n+-------+");

    assert_eq!(diagram.labels().len(), 1);
    let label = &diagram.labels()[0];
    assert_eq!(label.text(), "hello");
    assert_eq!(label.bounds(), Bounds::new(40.0, 42.0, 90.0, 56.0));
    assert_eq!(label.color(), Color::default());
}

#[test]
fn test_color_code_fills_box() {
    let diagram = parse_default("+------+\n| cBLU |\n+------+");

    assert_eq!(diagram.shapes().len(), 1);
    assert_eq!(
        diagram.shapes()[0].fill_color(),
        Color::from_hex_digits("5555BB")
    );
    assert!(diagram.labels().is_empty());
}

#[test]
fn test_text_on_dark_box_is_white() {
    let diagram = parse_default("+---------+\n| cBLK Hi |\n+---------+");

    assert_eq!(diagram.shapes()[0].fill_color(), Some(Color::black()));
    assert_eq!(diagram.labels().len(), 1);
    assert_eq!(diagram.labels()[0].text(), "Hi");
    assert_eq!(diagram.labels()[0].color(), Color::white());
}

#[test]
fn test_markup_tag_sets_kind() {
    let diagram = parse_default("+-----+\n| {d} |\n+-----+");

    assert_eq!(diagram.shapes().len(), 1);
    assert_eq!(diagram.shapes()[0].kind(), ShapeKind::Document);
    assert!(diagram.labels().is_empty());
}

#[test]
fn test_unknown_markup_tag_is_text() {
    let diagram = parse_default("+-------+\n| {zz}  |\n+-------+");

    assert_eq!(diagram.shapes()[0].kind(), ShapeKind::Simple);
    assert_eq!(diagram.labels()[0].text(), "{zz}");
}

#[test]
fn test_all_corners_round() {
    let config = ParseConfig::default().with_all_corners_round(true);
    let diagram = parse("+---+\n|   |\n+---+", &config).unwrap();

    assert!(
        diagram.shapes()[0]
            .points()
            .iter()
            .all(|point| point.kind() == PointKind::Round)
    );
}

#[test]
fn test_point_marker_on_line() {
    let diagram = parse_default("--*--");

    let open: Vec<&Shape> = diagram
        .open_shapes()
        .filter(|shape| shape.kind() == ShapeKind::Simple)
        .collect();
    assert_eq!(open.len(), 1);
    assert_eq!(positions(open[0]), vec![(20.0, 35.0), (70.0, 35.0)]);

    let markers: Vec<&Shape> = diagram
        .shapes()
        .iter()
        .filter(|shape| shape.kind() == ShapeKind::PointMarker)
        .collect();
    assert_eq!(markers.len(), 1);
    assert_eq!(positions(markers[0]), vec![(45.0, 35.0)]);
    assert!(diagram.labels().is_empty());
}

#[test]
fn test_well_formed_input_has_no_malformed_shapes() {
    let source = "+---+---+\n|   |   +---->\n+---+---+";
    let reconstruction = reconstruct_source(source, &ParseConfig::default().with_strict(true));
    assert!(reconstruction.malformed().is_empty());
    assert!(parse(source, &ParseConfig::default().with_strict(true)).is_ok());
}

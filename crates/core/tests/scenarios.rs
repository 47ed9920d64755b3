//! End-to-end scenarios spanning the span algebra, the streaming transformer, and the
//! style-preserving re-quoter, exercised together the way a real YAML-editing caller would chain
//! them: locate a node, requote its replacement, splice it into the document.

use yaml_edit::node::{NodeStyle, YamlNode, node_to_op};
use yaml_edit::requote::requote;
use yaml_edit::scalar::format_scalar;
use yaml_edit::span::Span;
use yaml_edit::splice::splice;

struct At {
    line: usize,
    column: usize,
    style: NodeStyle,
}

impl YamlNode for At {
    fn line(&self) -> usize {
        self.line
    }
    fn column(&self) -> usize {
        self.column
    }
    fn style(&self) -> NodeStyle {
        self.style
    }
}

#[test]
fn edits_two_scalars_in_a_small_document() {
    let source = "metadata:\n  name: \"foo\"\n  namespace: myns\n";

    let name_node = At {
        line: 2,
        column: 9,
        style: NodeStyle::Double,
    };
    let namespace_node = At {
        line: 3,
        column: 14,
        style: NodeStyle::Plain,
    };

    let name_op = node_to_op(&name_node, source, "bar").unwrap();
    let namespace_op = node_to_op(&namespace_node, source, "otherns").unwrap();

    let out = splice(vec![name_op, namespace_op], source).unwrap();
    assert_eq!(
        out,
        "metadata:\n  name: \"bar\"\n  namespace: otherns\n"
    );
}

#[test]
fn block_literal_replacement_regression_locks_original_indent() {
    let source = "data:\n  foo: |\n    bar: x\n";
    let node = At {
        line: 2,
        column: 8,
        style: NodeStyle::Literal,
    };
    let op = node_to_op(&node, source, "x: y\nbar: y\n").unwrap();
    let out = splice(vec![op], source).unwrap();
    assert_eq!(out, "data:\n  foo: |\n    x: y\n    bar: y\n");
}

#[test]
fn identity_transform_on_untouched_source() {
    let source = "a:\n  # a comment\n  b: 1\n";
    let out = splice(vec![], source).unwrap();
    assert_eq!(out, source);
}

#[test]
fn concrete_span_scenarios_from_the_design_table() {
    assert_eq!(
        splice(vec![Span::new(1, 2).unwrap().with("XYZ")], "abcd").unwrap(),
        "aXYZcd"
    );
    assert_eq!(
        splice(vec![Span::new(1, 2).unwrap().with("B")], "ábcd").unwrap(),
        "áBcd"
    );
    assert_eq!(
        splice(
            vec![
                Span::new(1, 2).unwrap().with("B"),
                Span::new(3, 4).unwrap().with("D"),
            ],
            "abcd"
        )
        .unwrap(),
        "aBcD"
    );
    assert_eq!(
        splice(vec![Span::at(2).with("X")], "abcd").unwrap(),
        "abXcd"
    );
    assert_eq!(splice(vec![Span::new(2, 3).unwrap().with("")], "abcd").unwrap(), "abd");
}

#[test]
fn requote_scenarios_from_the_design_table() {
    assert_eq!(requote("a", "'b'", 0), "'a'");
    assert_eq!(requote("1", "b", 0), "\"1\"");
    assert_eq!(format_scalar("a\nb\n", 2), "|\n  a\n  b");
    assert_eq!(format_scalar("a\nb\n\n", 2), "|+\n  a\n  b\n");
}

#[test]
fn double_quoted_scalar_round_trips_through_splice_and_requote() {
    let source = "key: \"old value\"\n";
    let node = At {
        line: 1,
        column: 6,
        style: NodeStyle::Double,
    };
    let op = node_to_op(&node, source, "new value").unwrap();
    let out = splice(vec![op], source).unwrap();
    assert_eq!(out, "key: \"new value\"\n");
}

#[test]
fn comments_and_blank_lines_outside_the_edited_span_survive() {
    let source = "# header comment\na: 1\n\nb: old\n# trailing comment\n";
    let node = At {
        line: 4,
        column: 4,
        style: NodeStyle::Plain,
    };
    let op = node_to_op(&node, source, "new").unwrap();
    let out = splice(vec![op], source).unwrap();
    assert_eq!(
        out,
        "# header comment\na: 1\n\nb: new\n# trailing comment\n"
    );
}

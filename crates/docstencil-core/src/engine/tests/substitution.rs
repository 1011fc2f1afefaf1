//! Variable substitution through full engine passes

use docstencil_testkit::CUSTOMER_JSON;

use super::helpers::{letter_tree, source};
use super::*;
use crate::document::{ContentType, NodeKind, TreeBuilder};

#[test]
fn test_letter_substitution() {
    let mut tree = letter_tree();
    let report = Engine::new()
        .run(&mut tree, source(CUSTOMER_JSON))
        .unwrap();

    assert_eq!(
        tree.rendered_text(),
        "Dear Antonia Rivera, greetings from Novigrad."
    );
    assert_eq!(report.work_items, 1);
    assert_eq!(report.processed, 2);
    assert_eq!(report.text_set, 2);
    assert_eq!(report.removed, 0);
    assert_eq!(report.clones, 0);
}

#[test]
fn test_unknown_identifier_blanks_the_control() {
    let mut builder = TreeBuilder::new();
    builder.control("variable_nickname", ContentType::PlainText, |b| {
        b.placeholder("NICK");
    });
    let mut tree = builder.build();

    // strict source: the miss is still swallowed by the variable replacer
    Engine::new().run(&mut tree, source(CUSTOMER_JSON)).unwrap();
    assert_eq!(tree.rendered_text(), "");
}

#[test]
fn test_numeric_format_specifier() {
    let mut builder = TreeBuilder::new();
    builder
        .text("Due: ")
        .control("variable_balance(n2)", ContentType::PlainText, |b| {
            b.placeholder("AMOUNT");
        });
    let mut tree = builder.build();

    Engine::new().run(&mut tree, source(CUSTOMER_JSON)).unwrap();
    assert_eq!(tree.rendered_text(), "Due: 1,234.50");
}

#[test]
fn test_multi_line_value_becomes_breaks() {
    let mut builder = TreeBuilder::new();
    builder.control("variable_poem", ContentType::PlainText, |b| {
        b.placeholder("POEM");
    });
    let mut tree = builder.build();

    Engine::new()
        .run(&mut tree, source(r#"{"poem": "roses\nare\r\nred"}"#))
        .unwrap();

    let control = tree.controls()[0];
    assert_eq!(tree.control_text(control), "roses\nare\nred");
    let content = tree.control_content(control).unwrap();
    let breaks = tree
        .children(content)
        .iter()
        .filter(|&&c| matches!(tree.kind(c), NodeKind::LineBreak))
        .count();
    assert_eq!(breaks, 2);
}

#[test]
fn test_rich_text_record_descends_into_inner_controls() {
    let mut builder = TreeBuilder::new();
    builder.control("variable_address", ContentType::RichText, |b| {
        b.control("variable_street", ContentType::PlainText, |b| {
            b.placeholder("STREET");
        })
        .text(" ")
        .control("variable_number", ContentType::PlainText, |b| {
            b.placeholder("NO");
        });
    });
    let mut tree = builder.build();

    let report = Engine::new()
        .run(&mut tree, source(CUSTOMER_JSON))
        .unwrap();

    assert_eq!(tree.rendered_text(), "Elm street 23");
    // one deferred item for the record scope
    assert_eq!(report.work_items, 2);
}

#[test]
fn test_plain_control_with_mapping_value_does_not_descend() {
    // a mapping behind a non rich text control is a shape error
    let mut builder = TreeBuilder::new();
    builder.control("variable_address", ContentType::PlainText, |b| {
        b.placeholder("ADDR");
    });
    let mut tree = builder.build();

    let result = Engine::new().run(&mut tree, source(CUSTOMER_JSON));
    match result {
        Err(EngineError::IncorrectType { found, .. }) => assert_eq!(found, "mapping"),
        other => panic!("Expected IncorrectType, got {:?}", other),
    }
}

#[test]
fn test_dotted_identifier_inside_record_scope() {
    // inner tags can themselves use dotted paths within the narrowed scope
    let mut builder = TreeBuilder::new();
    builder.control("variable_outer", ContentType::RichText, |b| {
        b.control("variable_inner.leaf", ContentType::PlainText, |b| {
            b.placeholder("LEAF");
        });
    });
    let mut tree = builder.build();

    Engine::new()
        .run(
            &mut tree,
            source(r#"{"outer": {"inner": {"leaf": "found"}}}"#).lenient(),
        )
        .unwrap();
    assert_eq!(tree.rendered_text(), "found");
}

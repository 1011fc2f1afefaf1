//! Replacer registration, enablement and output configuration

use docstencil_testkit::CUSTOMER_JSON;

use super::helpers::{letter_tree, source};
use super::*;
use crate::document::{ContentType, TreeBuilder};
use crate::replacers::VariableReplacer;

#[test]
fn test_disabling_a_prefix_skips_its_controls() {
    let mut engine = Engine::new();
    assert!(engine.set_enabled("variable", false));

    let mut tree = letter_tree();
    let report = engine.run(&mut tree, source(CUSTOMER_JSON)).unwrap();

    assert_eq!(tree.rendered_text(), "Dear NAME, greetings from CITY.");
    assert_eq!(report.text_set, 0);
}

#[test]
fn test_unknown_prefix_cannot_be_toggled() {
    let mut engine = Engine::new();
    assert!(!engine.set_enabled("nosuchprefix", false));
}

#[test]
fn test_first_order_scoped_replacer_ignores_nested_controls() {
    let mut engine = Engine::empty();
    engine.register_scoped(Box::new(VariableReplacer::new()), true);

    let mut builder = TreeBuilder::new();
    builder
        .untagged_control(ContentType::RichText, |b| {
            b.control("variable_name", ContentType::PlainText, |b| {
                b.placeholder("NAME");
            });
        })
        .text(" vs ")
        .control("variable_name", ContentType::PlainText, |b| {
            b.placeholder("NAME");
        });
    let mut tree = builder.build();

    engine.run(&mut tree, source(CUSTOMER_JSON)).unwrap();
    assert_eq!(tree.rendered_text(), "NAME vs Antonia Rivera");
}

#[test]
fn test_source_from_json_follows_the_strictness_setting() {
    let mut config = EngineConfig::default();
    config.resolution.strict_variables = false;
    let engine = Engine::with_config(config);

    let source = engine.source_from_json(r#"{"x": 1}"#).unwrap();
    assert!(!source.is_strict());

    let strict = Engine::new().source_from_json(r#"{"x": 1}"#).unwrap();
    assert!(strict.is_strict());
}

#[test]
fn test_stripping_controls_after_the_pass() {
    let mut config = EngineConfig::default();
    config.output.keep_controls = false;

    let mut tree = letter_tree();
    let report = Engine::with_config(config)
        .run(&mut tree, source(CUSTOMER_JSON))
        .unwrap();

    assert!(tree.controls().is_empty());
    assert_eq!(report.unwrapped, 2);
    assert_eq!(
        tree.rendered_text(),
        "Dear Antonia Rivera, greetings from Novigrad."
    );
}

#[test]
fn test_empty_engine_does_nothing() {
    let mut tree = letter_tree();
    let report = Engine::empty().run(&mut tree, source(CUSTOMER_JSON)).unwrap();

    assert_eq!(tree.rendered_text(), "Dear NAME, greetings from CITY.");
    assert_eq!(report.processed, 0);
    assert_eq!(report.work_items, 1);
}

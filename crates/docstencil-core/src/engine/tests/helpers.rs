//! Shared fixtures for engine tests

use crate::document::{ContentType, DocumentTree, TreeBuilder};
use crate::variables::VariableSource;

/// Strict source from fixture JSON.
pub(super) fn source(json: &str) -> VariableSource {
    VariableSource::from_json(json).expect("fixture JSON should parse")
}

/// Lenient source from fixture JSON.
pub(super) fn lenient(json: &str) -> VariableSource {
    source(json).lenient()
}

/// A short letter with two plain text variable controls.
pub(super) fn letter_tree() -> DocumentTree {
    let mut builder = TreeBuilder::new();
    builder
        .text("Dear ")
        .control("variable_name", ContentType::PlainText, |b| {
            b.placeholder("NAME");
        })
        .text(", greetings from ")
        .control("variable_address.city", ContentType::PlainText, |b| {
            b.placeholder("CITY");
        })
        .text(".");
    builder.build()
}

/// A repeating section over `regions`, each copy rendering the region name
/// and a nested repeating section over its streets.
pub(super) fn regions_tree() -> DocumentTree {
    let mut builder = TreeBuilder::new();
    builder.control("repeating_regions", ContentType::RichText, |b| {
        b.control("repeatingitem_name", ContentType::PlainText, |b| {
            b.placeholder("REGION");
        })
        .text(": ")
        .control("repeating_streets", ContentType::RichText, |b| {
            b.placeholder("STREET");
        });
    });
    builder.build()
}

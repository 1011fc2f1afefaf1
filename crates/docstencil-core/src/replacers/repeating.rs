use crate::data::DataValue;
use crate::document::{DocumentTree, NodeId};
use crate::error::{EngineError, Result};
use crate::replacers::{Outcome, Replacer, WorkItem};
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Expands a control subtree once per item of a list variable.
///
/// Every item gets its own deep copy of the whole control, inserted where
/// the original stood; the original is removed afterwards. Mapping items
/// additionally queue their copy's inner controls for resolution against
/// the item itself, with the item's 1-based position injected as `index`.
pub struct RepeatingReplacer;

struct Separators {
    each: String,
    last: String,
}

/// Pulls `separator` / `lastseparator` keyword pairs out of the tag
/// parameters. Keywords match case-insensitively and take the next token as
/// their value.
fn separators(params: &[String]) -> Separators {
    let mut each: Option<&str> = None;
    let mut last: Option<&str> = None;
    let mut previous: Option<&str> = None;
    for param in params {
        match previous {
            Some(keyword) if keyword.eq_ignore_ascii_case("separator") => {
                each = Some(param);
            }
            Some(keyword) if keyword.eq_ignore_ascii_case("lastseparator") => {
                last = Some(param);
            }
            _ => {}
        }
        previous = Some(param);
    }
    let each = pad(each);
    let last = last.map(|l| pad(Some(l))).unwrap_or_else(|| each.clone());
    Separators { each, last }
}

/// Separators always end in whitespace so consecutive items cannot glue
/// together; a missing or blank separator becomes a single space.
fn pad(separator: Option<&str>) -> String {
    match separator {
        None => " ".to_string(),
        Some(s) if s.trim().is_empty() => " ".to_string(),
        Some(s) if s.ends_with(char::is_whitespace) => s.to_string(),
        Some(s) => format!("{s} "),
    }
}

impl Replacer for RepeatingReplacer {
    fn prefix(&self) -> &str {
        "repeating"
    }

    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome> {
        let items = match source.resolve(&tag.identifier) {
            Ok(DataValue::List(items)) => items,
            Ok(DataValue::Absent) | Err(EngineError::VariableNotFound { .. }) => {
                tree.remove_control(control);
                return Ok(Outcome::removal());
            }
            Ok(other) => {
                return Err(EngineError::IncorrectType {
                    identifier: tag.identifier.clone(),
                    expected: "list",
                    found: other.type_name(),
                });
            }
            Err(err) => return Err(err),
        };

        if items.is_empty() {
            tree.remove_control(control);
            return Ok(Outcome::removal());
        }

        let separators = separators(&tag.params);
        let mut clones: Vec<NodeId> = Vec::with_capacity(items.len());
        let mut work: Vec<WorkItem> = Vec::new();

        for (position, item) in items.into_iter().enumerate() {
            match item {
                DataValue::Map(mut fields) => {
                    let Some(copy) = tree.clone_control_before(control) else {
                        continue;
                    };
                    fields
                        .entry("index".to_string())
                        .or_insert(DataValue::Int(position as i64 + 1));
                    work.push(WorkItem::new(
                        tree.descendant_controls(copy),
                        source.narrowed(fields),
                    ));
                    clones.push(copy);
                }
                DataValue::List(_) | DataValue::Absent => {
                    // no rendering rule for these item shapes
                    tracing::debug!(
                        "skipping item {} of '{}' ({})",
                        position,
                        tag.identifier,
                        item.type_name()
                    );
                }
                scalar => {
                    let Some(copy) = tree.clone_control_before(control) else {
                        continue;
                    };
                    tree.set_control_text(copy, &scalar.render_text());
                    clones.push(copy);
                }
            }
        }

        let count = clones.len();
        for (position, &copy) in clones.iter().enumerate() {
            if position + 1 == count {
                break;
            }
            let separator = if position + 2 == count {
                &separators.last
            } else {
                &separators.each
            };
            tree.append_text(copy, separator);
        }

        tree.remove_control(control);
        tracing::debug!("expanded '{}' into {} copies", tag.identifier, count);
        Ok(Outcome::expansion(count, work))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_separators_default_to_a_space() {
        let separators = separators(&params(&[]));
        assert_eq!(separators.each, " ");
        assert_eq!(separators.last, " ");
    }

    #[test]
    fn test_separator_keyword_takes_the_next_token() {
        let separators = separators(&params(&["separator", ";"]));
        assert_eq!(separators.each, "; ");
        assert_eq!(separators.last, "; ");
    }

    #[test]
    fn test_last_separator_overrides_the_final_joint() {
        let separators = separators(&params(&["separator", ",", "lastseparator", "and"]));
        assert_eq!(separators.each, ", ");
        assert_eq!(separators.last, "and ");
    }

    #[test]
    fn test_separator_keywords_are_case_insensitive() {
        let separators = separators(&params(&["Separator", "|", "LastSeparator", "&"]));
        assert_eq!(separators.each, "| ");
        assert_eq!(separators.last, "& ");
    }

    #[test]
    fn test_blank_separator_becomes_a_space() {
        let separators = separators(&params(&["separator", " "]));
        assert_eq!(separators.each, " ");
    }

    #[test]
    fn test_whitespace_terminated_separator_is_kept_as_is() {
        assert_eq!(pad(Some("a\t")), "a\t");
        assert_eq!(pad(Some(",")), ", ");
    }
}

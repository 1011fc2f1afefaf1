use crate::data::DataValue;
use crate::document::{ContentType, DocumentTree, NodeId};
use crate::error::{EngineError, Result};
use crate::replacers::{Outcome, Replacer};
use crate::tag::ParsedTag;
use crate::variables::VariableSource;

/// Loads image bytes named by a variable into a picture control.
///
/// The value is either a filesystem path or an inline `base64:` payload.
/// When several picture controls share one tag, an `index` variable in the
/// current scope picks which of them receives the bytes; repeating sections
/// inject exactly that variable per item.
pub struct PictureReplacer;

const INLINE_PREFIX: &str = "base64:";

impl Replacer for PictureReplacer {
    fn prefix(&self) -> &str {
        "image"
    }

    fn restriction(&self) -> ContentType {
        ContentType::Picture
    }

    fn process(
        &self,
        tree: &mut DocumentTree,
        control: NodeId,
        tag: &ParsedTag,
        source: &VariableSource,
    ) -> Result<Outcome> {
        let value = match source.resolve(&tag.identifier) {
            Ok(value) => value,
            Err(EngineError::VariableNotFound { .. }) => return Ok(Outcome::untouched()),
            Err(err) => return Err(err),
        };
        if value.is_absent() {
            return Ok(Outcome::untouched());
        }
        let Some(location) = value.scalar_text() else {
            return Err(EngineError::IncorrectType {
                identifier: tag.identifier.clone(),
                expected: "a byte source location",
                found: value.type_name(),
            });
        };
        if location.trim().is_empty() {
            return Ok(Outcome::untouched());
        }

        let bytes = read_bytes(&location, &tag.identifier)?;

        let Some(slot) = target_slot(tree, control, source) else {
            return Ok(Outcome::untouched());
        };
        if !tree.embed_image(slot, bytes) {
            return Ok(Outcome::untouched());
        }
        tracing::debug!("embedded image bytes for '{}'", tag.identifier);
        Ok(Outcome::embed())
    }
}

fn read_bytes(location: &str, identifier: &str) -> Result<Vec<u8>> {
    if let Some(payload) = location.strip_prefix(INLINE_PREFIX) {
        use base64::Engine as _;
        return base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| EngineError::PictureSource {
                identifier: identifier.to_string(),
                reason: format!("invalid base64 payload: {}", e),
            });
    }
    std::fs::read(location).map_err(|e| EngineError::PictureSource {
        identifier: identifier.to_string(),
        reason: format!("failed to read '{}': {}", location, e),
    })
}

/// Finds the control that should receive the bytes.
///
/// All attached controls sharing the full tag form a slot list; a lone slot
/// is used directly. With several slots, the 1-based `index` variable picks
/// one, and the control is skipped when `index` is missing or out of range.
fn target_slot(
    tree: &DocumentTree,
    control: NodeId,
    source: &VariableSource,
) -> Option<NodeId> {
    let tag = tree.control_tag(control)?.to_string();
    let slots = tree.find_controls(&tag);
    match slots.len() {
        0 => None,
        1 => slots.first().copied(),
        _ => {
            let index = slot_index(source)?;
            slots.get(index - 1).copied()
        }
    }
}

fn slot_index(source: &VariableSource) -> Option<usize> {
    match source.resolve("index") {
        Ok(DataValue::Int(i)) if i > 0 => Some(i as usize),
        Ok(DataValue::String(s)) => s.trim().parse::<usize>().ok().filter(|&i| i > 0),
        _ => None,
    }
}

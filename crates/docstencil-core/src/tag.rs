//! Control tag splitting.

/// A control tag split at underscores: `<prefix>_<identifier>[_<token>]*`.
///
/// The prefix routes the control to a replacer, the identifier names the
/// variable to resolve and the remaining tokens parameterize the replacer
/// (conditional operators, separators and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    pub identifier: String,
    pub params: Vec<String>,
}

impl ParsedTag {
    /// Splits `tag` against an expected prefix.
    ///
    /// Returns `None` when the control carries no tag, the tag contains no
    /// underscore, or the first token does not match `expected_prefix`
    /// case-insensitively.
    pub fn parse(tag: Option<&str>, expected_prefix: &str) -> Option<ParsedTag> {
        let tag = tag?;
        if !tag.contains('_') {
            return None;
        }
        let mut tokens = tag.split('_');
        let prefix = tokens.next()?;
        if !prefix.eq_ignore_ascii_case(expected_prefix) {
            return None;
        }
        let identifier = tokens.next().unwrap_or_default().to_string();
        let params = tokens.map(str::to_string).collect();
        Some(ParsedTag { identifier, params })
    }
}

//! Numeric format specifiers carried as a parenthesized identifier suffix.

use crate::data::DataValue;
use crate::error::{EngineError, Result};

/// A format specifier such as `(n2)` or `(F0)`: `n`/`N` groups thousands,
/// `f`/`F` does not, and the digits pick the decimal places (default 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumericFormat {
    grouped: bool,
    decimals: usize,
}

impl NumericFormat {
    /// Splits `identifier` into a path and a trailing format specifier.
    ///
    /// Returns `None` when the identifier carries no well-formed specifier,
    /// in which case the whole identifier is a plain path.
    pub(crate) fn split(identifier: &str) -> Option<(&str, NumericFormat)> {
        let rest = identifier.strip_suffix(')')?;
        let open = rest.rfind('(')?;
        let format = NumericFormat::parse(&rest[open + 1..])?;
        Some((&identifier[..open], format))
    }

    fn parse(code: &str) -> Option<NumericFormat> {
        let mut chars = code.chars();
        let grouped = match chars.next()? {
            'n' | 'N' => true,
            'f' | 'F' => false,
            _ => return None,
        };
        let digits = chars.as_str();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let decimals = if digits.is_empty() {
            2
        } else {
            digits.parse().ok()?
        };
        Some(NumericFormat { grouped, decimals })
    }

    /// Renders `value` under this specifier. Only numbers and numeric
    /// strings qualify.
    pub(crate) fn render(&self, value: &DataValue, identifier: &str) -> Result<String> {
        let number = match value {
            DataValue::Int(i) => *i as f64,
            DataValue::Float(f) => *f,
            DataValue::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => f,
                Err(_) => {
                    return Err(EngineError::IncorrectType {
                        identifier: identifier.to_string(),
                        expected: "number",
                        found: "string",
                    });
                }
            },
            other => {
                return Err(EngineError::IncorrectType {
                    identifier: identifier.to_string(),
                    expected: "number",
                    found: other.type_name(),
                });
            }
        };

        let fixed = format!("{:.*}", self.decimals, number);
        if self.grouped {
            Ok(group_thousands(&fixed))
        } else {
            Ok(fixed)
        }
    }
}

/// Inserts `,` separators into the integer part of an already fixed-point
/// rendered number.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (position, digit) in int_part.chars().enumerate() {
        if position != 0 && (int_part.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

//! Textual rendering and truncation of dispatcher output.
//!
//! Rendering is a canonical debug form, not JSON: it must cope with bytes and
//! timestamps, and truncated output is not expected to parse anyway.

use std::fmt::{self, Write as _};

use chrono::SecondsFormat;

use crate::value::ResultValue;

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Null => f.write_str("null"),
            ResultValue::Bool(b) => write!(f, "{b}"),
            ResultValue::Int(i) => write!(f, "{i}"),
            ResultValue::Float(x) => write!(f, "{x:?}"),
            ResultValue::Str(s) => write!(f, "{s:?}"),
            ResultValue::Bytes(bytes) => {
                f.write_str("b\"")?;
                for b in bytes {
                    for c in std::ascii::escape_default(*b) {
                        f.write_char(c as char)?;
                    }
                }
                f.write_char('"')
            }
            ResultValue::Timestamp(ts) => write!(
                f,
                "Timestamp({})",
                ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            ResultValue::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            ResultValue::Map(entries) => {
                f.write_char('{')?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Text handed back to the caller, plus what the audit trail wants to know
/// about how much was cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub rendered_chars: usize,
    pub truncated: bool,
}

pub fn render(value: &ResultValue) -> String {
    value.to_string()
}

/// First `limit` characters of `s`. Counts chars, never splits a code point.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn render_truncated(full: String, limit: usize) -> Rendered {
    let rendered_chars = full.chars().count();
    if rendered_chars <= limit {
        return Rendered {
            text: full,
            rendered_chars,
            truncated: false,
        };
    }
    Rendered {
        text: truncate_chars(&full, limit).to_string(),
        rendered_chars,
        truncated: true,
    }
}

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::session::Params;

/// One agent tool call: `{"command": "...", "args": {...}, "limit": N}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,

    #[serde(default, deserialize_with = "deserialize_args")]
    pub args: Params,

    /// `None` means the dispatcher's default limit. Any integral JSON number
    /// is accepted (`1e3` included): negatives degrade to 0, values past
    /// `usize::MAX` saturate.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_limit"
    )]
    pub limit: Option<usize>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Params::new(),
            limit: None,
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn deserialize_args<'de, D>(d: D) -> Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Params>::deserialize(d)?.unwrap_or_default())
}

fn deserialize_limit<'de, D>(d: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(d)? {
        None => Ok(None),
        Some(n) => limit_from_number(&n).map(Some).map_err(D::Error::custom),
    }
}

fn limit_from_number(n: &Number) -> Result<usize, String> {
    if let Some(u) = n.as_u64() {
        return Ok(usize::try_from(u).unwrap_or(usize::MAX));
    }
    if n.as_i64().is_some() {
        return Ok(0);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f <= 0.0 {
                Ok(0)
            } else if f >= usize::MAX as f64 {
                Ok(usize::MAX)
            } else {
                Ok(f as usize)
            }
        }
        _ => Err(format!("limit must be a whole number of characters, got {n}")),
    }
}

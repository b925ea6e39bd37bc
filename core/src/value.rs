//! Dynamic result values returned by session handles.
//!
//! Service responses are open-ended, so handles hand back a `ResultValue`
//! instead of a typed struct per operation. Wire payloads are JSON with two
//! tagged shapes for values JSON cannot carry directly:
//! - `{"$bytes": "<base64>"}` for binary bodies
//! - `{"$timestamp": "<rfc3339>"}` for timestamps

use std::collections::BTreeMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub const BYTES_TAG: &str = "$bytes";
pub const TIMESTAMP_TAG: &str = "$timestamp";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    List(Vec<ResultValue>),
    /// Keys iterate in sorted order, which keeps rendering deterministic.
    Map(BTreeMap<String, ResultValue>),
}

impl ResultValue {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ResultValue)>,
    {
        ResultValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn str(s: impl Into<String>) -> Self {
        ResultValue::Str(s.into())
    }

    pub fn get(&self, key: &str) -> Option<&ResultValue> {
        match self {
            ResultValue::Map(m) => m.get(key),
            _ => None,
        }
    }
}

impl From<Value> for ResultValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => ResultValue::Null,
            Value::Bool(b) => ResultValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ResultValue::Int(i)
                } else {
                    ResultValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ResultValue::Str(s),
            Value::Array(items) => ResultValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                if obj.len() == 1 {
                    if let Some(tagged) = decode_tagged(&obj) {
                        return tagged;
                    }
                }
                ResultValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

// A tag whose payload does not decode falls back to a plain map.
fn decode_tagged(obj: &serde_json::Map<String, Value>) -> Option<ResultValue> {
    if let Some(Value::String(b64)) = obj.get(BYTES_TAG) {
        return base64::engine::general_purpose::STANDARD
            .decode(b64)
            .ok()
            .map(ResultValue::Bytes);
    }
    if let Some(Value::String(ts)) = obj.get(TIMESTAMP_TAG) {
        return DateTime::parse_from_rfc3339(ts)
            .ok()
            .map(|dt| ResultValue::Timestamp(dt.with_timezone(&Utc)));
    }
    None
}

//! Normalization of platform payloads.
//!
//! The platform is inconsistent about types (counts arrive as numbers, as
//! strings, or as "1.2万"), so every field is read leniently and missing
//! fields fall back to defaults instead of failing the whole response.

mod detail;
mod followers;
mod notes;

pub use detail::{parse_comments, parse_feed, parse_note_card};
pub use followers::parse_followers;
pub use notes::{ParsedNotes, parse_self_info, parse_user_notes};

use serde_json::Value;

use crate::error::UpstreamError;

/// Unwraps the `{success, code, msg, data}` envelope.
///
/// A response without a `success` field is returned as-is.
pub fn unwrap_envelope(body: Value) -> Result<Value, UpstreamError> {
    let Value::Object(mut map) = body else {
        return Err(UpstreamError::decode("response is not a JSON object"));
    };

    match map.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(map.remove("data").unwrap_or(Value::Null)),
        Some(false) => {
            let code = map.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = map
                .get("msg")
                .map(text)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "request rejected".to_string());
            Err(UpstreamError::from_api(code, message))
        }
        None => Ok(Value::Object(map)),
    }
}

/// Reads a string field; numbers are rendered, anything else is empty.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Reads `value[key]` as text.
pub fn field(value: &Value, key: &str) -> String {
    value.get(key).map(text).unwrap_or_default()
}

/// Reads a counter leniently. Unparseable values count as zero.
pub fn count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or_default(),
        Value::String(s) => parse_count(s),
        _ => 0,
    }
}

fn parse_count(raw: &str) -> u64 {
    let raw = raw.trim().trim_end_matches('+');
    let (number, multiplier) = if let Some(n) = raw.strip_suffix('万') {
        (n, 10_000.0)
    } else if let Some(n) = raw.strip_suffix('亿') {
        (n, 100_000_000.0)
    } else if let Some(n) = raw.strip_suffix(['w', 'W']) {
        (n, 10_000.0)
    } else if let Some(n) = raw.strip_suffix(['k', 'K']) {
        (n, 1_000.0)
    } else {
        (raw, 1.0)
    };

    match number.trim().parse::<f64>() {
        Ok(n) if n > 0.0 => (n * multiplier).round() as u64,
        _ => 0,
    }
}

/// Reads a unix timestamp (seconds or milliseconds). Zero means absent.
pub fn timestamp(value: &Value) -> Option<i64> {
    let ts = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (ts > 0).then_some(ts)
}

/// Accepts an object, or a string holding a JSON object.
pub(crate) fn object_or_encoded(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or(Value::Null),
        Some(v) => v.clone(),
        None => Value::Null,
    }
}

//! Secret payload decoding and `.env` line output

use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

/// Decode a secret string into key/value pairs.
///
/// Never fails: anything that is not a JSON object yields an empty map, and
/// non-string values inside an object are skipped.
pub fn parse_payload(payload: &str) -> HashMap<String, String> {
    let object = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "secret payload is not a JSON object");
            return HashMap::new();
        }
        Err(err) => {
            tracing::warn!(error = %err, "secret payload is not valid JSON");
            return HashMap::new();
        }
    };

    let mut entries = HashMap::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::String(s) => {
                entries.insert(key, s);
            }
            other => {
                tracing::debug!(key = %key, kind = json_kind(&other), "skipping non-string value");
            }
        }
    }
    entries
}

/// Write one `key="value"` line per entry, then flush.
///
/// Values are written verbatim; embedded quotes are not escaped.
pub fn write_entries<W: Write>(writer: W, entries: &HashMap<String, String>) -> io::Result<usize> {
    let mut writer = BufWriter::new(writer);
    for (key, value) in entries {
        writeln!(writer, "{}=\"{}\"", key, value)?;
    }
    writer.flush()?;
    Ok(entries.len())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

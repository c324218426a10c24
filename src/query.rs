use serde_json::{Map, Value};
use urlencoding::encode;

/// Builds a URL query string from a JSON parameter map.
///
/// - `Null` entries are omitted entirely.
/// - Array values produce one `key=value` pair per element, in order.
/// - Scalars render without JSON quoting (`"a"` → `a`, `true` → `true`).
/// - Keys and values are percent-encoded.
///
/// Returns an empty string when nothing survives, so callers can skip the
/// `?` separator.
pub fn build_query_string(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(rendered) = render_scalar(item) {
                        pairs.push(format!("{}={}", encode(key), encode(&rendered)));
                    }
                }
            }
            other => {
                if let Some(rendered) = render_scalar(other) {
                    pairs.push(format!("{}={}", encode(key), encode(&rendered)));
                }
            }
        }
    }
    pairs.join("&")
}

/// Renders a scalar JSON value as its unquoted query form.
///
/// Non-scalar values (nested arrays/objects) have no defined query
/// representation and fall back to compact JSON text.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

use serde_json::Value;

use crate::record::LogRecord;

/// Hook type for replacing the default description rendering.
///
/// When configured on the adapter it fully replaces [`inspect`] for every
/// record; the default never runs as a fallback.
pub type RenderFn = dyn Fn(&LogRecord) -> String + Send + Sync;

/// Nesting depth beyond which arrays and objects are elided.
const MAX_DEPTH: usize = 6;

/// Render an arbitrary value as a deterministic, human-readable string.
///
/// This is the default description renderer: total over any
/// [`serde_json::Value`] (which is acyclic by construction), never panics,
/// and produces the same output for the same input. Strings render
/// single-quoted, object keys iterate in map order, and nesting past
/// [`MAX_DEPTH`] collapses to `[Array]`/`[Object]`.
pub fn inspect(value: &Value) -> String {
    inspect_at(value, 0)
}

fn inspect_at(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return "[Array]".to_string();
            }
            if items.is_empty() {
                return "[]".to_string();
            }
            let inner = items
                .iter()
                .map(|item| inspect_at(item, depth + 1))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[ {inner} ]")
        }
        Value::Object(map) => {
            if depth >= MAX_DEPTH {
                return "[Object]".to_string();
            }
            if map.is_empty() {
                return "{}".to_string();
            }
            let inner = map
                .iter()
                .map(|(key, item)| format!("{}: {}", key_repr(key), inspect_at(item, depth + 1)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{ {inner} }}")
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn key_repr(key: &str) -> String {
    let identifier_like = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier_like {
        key.to_string()
    } else {
        quote(key)
    }
}

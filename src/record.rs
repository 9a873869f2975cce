use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::level::Severity;

static NULL: Value = Value::Null;

/// A single log record handed to the adapter by the host logging system.
///
/// Records are created per log call, consumed once and not retained. `data`
/// is the ordered sequence of items attached to the call site; the payload
/// builder renders only the last one.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub data: Vec<Value>,
    pub level: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Build a record stamped with the current time.
    pub fn new(level: impl Into<String>, data: Vec<Value>) -> Self {
        LogRecord {
            data,
            level: level.into(),
            timestamp: Utc::now(),
        }
    }

    /// Parse the level string into the ordered severity set, if it matches.
    pub fn severity(&self) -> Option<Severity> {
        self.level.parse().ok()
    }

    /// The last data item, or `Null` when the record carries none.
    pub fn last_item(&self) -> &Value {
        self.data.last().unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_item_is_null_for_empty_data() {
        let record = LogRecord::new("info", vec![]);
        assert_eq!(record.last_item(), &Value::Null);
    }

    #[test]
    fn last_item_picks_the_final_entry() {
        let record = LogRecord::new("info", vec![json!("first"), json!({"a": 1}), json!("last")]);
        assert_eq!(record.last_item(), &json!("last"));
    }

    #[test]
    fn severity_parses_known_levels_only() {
        assert_eq!(
            LogRecord::new("warn", vec![]).severity(),
            Some(Severity::Warn)
        );
        assert_eq!(LogRecord::new("wat", vec![]).severity(), None);
    }
}

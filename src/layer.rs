use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::record::LogRecord;
use crate::transport::Transport;

/// `tracing_subscriber` layer that adapts events into [`LogRecord`]s and
/// offers them to a [`Transport`].
///
/// There is no channel or batching here: the transport's `log` already
/// returns immediately and runs delivery on its own task, so each event is
/// handed over synchronously and cheaply. The transport's live threshold
/// decides which events actually leave the process.
pub struct DiscordLayer {
    transport: Arc<dyn Transport>,
}

impl DiscordLayer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        DiscordLayer { transport }
    }
}

impl<S> Layer<S> for DiscordLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        // Message goes last so the payload builder renders it.
        let mut data = Vec::new();
        if !fields.is_empty() {
            data.push(Value::Object(fields.into_iter().collect()));
        }
        data.push(Value::String(message.unwrap_or_default()));

        let record = LogRecord {
            data,
            level: severity_label(*event.metadata().level()).to_string(),
            timestamp: Utc::now(),
        };
        self.transport.log(&record);
    }
}

fn severity_label(level: Level) -> &'static str {
    match level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        Level::TRACE => "silly",
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut BTreeMap<String, Value>,
    message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{value:?}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use serde_json::json;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[test]
    fn events_become_records_with_message_last() {
        let transport = Arc::new(MemoryTransport::new());
        let subscriber = Registry::default().with(DiscordLayer::new(transport.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(user = "bob", "boom");
        });

        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "error");
        assert_eq!(records[0].last_item(), &json!("boom"));
        assert_eq!(records[0].data[0], json!({ "user": "bob" }));
    }

    #[test]
    fn trace_events_map_to_silly() {
        let transport = Arc::new(MemoryTransport::new());
        let subscriber = Registry::default().with(DiscordLayer::new(transport.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("chatter");
            tracing::warn!("careful");
        });

        let records = transport.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, "silly");
        assert_eq!(records[1].level, "warn");
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde_json::Value;

use crate::config::WebhookConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::host::LogHost;
use crate::level::{color_for, LevelCell, Severity};
use crate::payload::{Embed, EmbedField, Payload, Thumbnail};
use crate::record::LogRecord;
use crate::render::{self, RenderFn};

/// Slot name used when a transport self-registers into a host.
pub const TRANSPORT_KEY: &str = "discord";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_transport_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Hook type for replacing the failure-reporting cascade.
pub type ReportFn = dyn Fn(&DeliveryError) + Send + Sync;

/// A pluggable destination the host logging system can route records to.
///
/// `id` is process-unique and stable across handle clones; the failure
/// cascade uses it to exclude a transport from its own peer rebroadcast,
/// so two transports must never share an id even if they share a slot name.
pub trait Transport: Send + Sync {
    fn id(&self) -> u64;

    /// Current severity threshold, read live.
    fn level(&self) -> Severity;

    /// Adjust the threshold; deliveries already in flight are unaffected.
    fn set_level(&self, level: Severity);

    /// Offer one record. Returns immediately; any delivery work happens on
    /// a background task.
    fn log(&self, record: &LogRecord);
}

/// Acknowledgement from the destination for one delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
}

/// Asynchronous delivery backend for built [`Payload`]s.
///
/// The production implementation is [`HttpDelivery`]; tests substitute
/// recording or failing implementations to observe the pipeline without
/// network I/O.
#[async_trait]
pub trait Deliver: Send + Sync {
    /// Attempt a single delivery. No retry, no backoff.
    async fn deliver(&self, payload: &Payload) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Webhook delivery over HTTP POST with a JSON body.
pub struct HttpDelivery {
    client: Client,
    endpoint: String,
}

impl HttpDelivery {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpDelivery {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Deliver for HttpDelivery {
    async fn deliver(&self, payload: &Payload) -> Result<DeliveryReceipt, DeliveryError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if status.is_success() {
            Ok(DeliveryReceipt {
                status: status.as_u16(),
            })
        } else {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            Err(DeliveryError::Rejected {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

struct Inner {
    id: u64,
    username: Option<String>,
    avatar_url: Option<String>,
    thumb_url: Option<String>,
    level: LevelCell,
    delivery: Arc<dyn Deliver>,
    render: Option<Box<RenderFn>>,
    report_error: Option<Box<ReportFn>>,
    host: Option<Arc<dyn LogHost>>,
}

/// The adapter: builds a webhook payload per record and ships it on a
/// background task, absorbing every delivery failure.
///
/// Cloning is cheap and clones share all state, including the live
/// severity threshold.
#[derive(Clone)]
pub struct DiscordTransport {
    inner: Arc<Inner>,
}

impl DiscordTransport {
    /// Validate the configuration and construct the adapter with the
    /// HTTP delivery backend.
    ///
    /// Fails with [`ConfigError::MissingWebhook`] when the endpoint is
    /// empty; this is the only error the adapter ever raises. When the
    /// config carries a host, the new transport registers itself under
    /// [`TRANSPORT_KEY`].
    pub fn new(config: WebhookConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let delivery = Arc::new(HttpDelivery::new(config.webhook.trim()));
        Self::with_delivery(config, delivery)
    }

    /// Construct with a custom delivery backend.
    pub fn with_delivery(
        config: WebhookConfig,
        delivery: Arc<dyn Deliver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = DiscordTransport {
            inner: Arc::new(Inner {
                id: next_transport_id(),
                username: config.username,
                avatar_url: config.avatar_url,
                thumb_url: config.thumb_url,
                level: LevelCell::new(config.level.unwrap_or(Severity::Silly)),
                delivery,
                render: config.render,
                report_error: config.report_error,
                host: config.host,
            }),
        };
        if let Some(host) = &transport.inner.host {
            host.register(TRANSPORT_KEY, Arc::new(transport.clone()));
        }
        Ok(transport)
    }

    /// Map a record to the wire payload.
    ///
    /// Pure with respect to the record and the adapter's identity fields:
    /// no network, no mutable state. The description renders the record's
    /// last data item through the configured hook or the default
    /// [`render::inspect`].
    pub fn build_payload(&self, record: &LogRecord) -> Payload {
        let description = match &self.inner.render {
            Some(render) => render(record),
            None => render::inspect(record.last_item()),
        };
        Payload {
            username: self.inner.username.clone(),
            avatar_url: self.inner.avatar_url.clone(),
            embeds: vec![Embed {
                description,
                thumbnail: Thumbnail {
                    url: self.inner.thumb_url.clone(),
                },
                color: color_for(&record.level),
                fields: vec![
                    EmbedField::inline("Level", record.level.clone()),
                    EmbedField::inline(
                        "DateTime",
                        record
                            .timestamp
                            .to_rfc3339_opts(SecondsFormat::Millis, true),
                    ),
                ],
            }],
        }
    }

    /// Deliver one payload. Failures never surface to the caller: a
    /// failed delivery is routed through the failure cascade together
    /// with the payload it could not deliver, and the call resolves
    /// with `None`.
    pub async fn send(&self, payload: Payload) -> Option<DeliveryReceipt> {
        match self.inner.delivery.deliver(&payload).await {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                self.report_failure(&err, Some(&payload));
                None
            }
        }
    }

    /// Route an error through the failure cascade.
    pub fn report_error(&self, error: &DeliveryError) {
        self.report_failure(error, None);
    }

    /// Three-tier failure cascade; exactly one tier fires per call.
    ///
    /// 1. Custom hook, when configured.
    /// 2. Peer rebroadcast through the host: a synthetic `warn` record
    ///    goes to every registered transport except this one. Its data
    ///    carries the error followed by the failed payload's description
    ///    when available, so the original log content survives the
    ///    reroute. Exclusion is by transport id, never by slot name.
    /// 3. A bare stderr write.
    fn report_failure(&self, error: &DeliveryError, failed: Option<&Payload>) {
        if let Some(report) = &self.inner.report_error {
            report(error);
            return;
        }
        if let Some(host) = &self.inner.host {
            let peers: Vec<_> = host
                .transports()
                .into_iter()
                .filter(|peer| peer.id() != self.inner.id)
                .collect();
            let mut data = vec![Value::String(error.to_string())];
            if let Some(embed) = failed.and_then(|payload| payload.embeds.first()) {
                data.push(Value::String(embed.description.clone()));
            }
            let record = LogRecord::new("warn", data);
            host.dispatch(&record, &peers);
            return;
        }
        eprintln!("discord transport: {error}");
    }

    fn enabled(&self, record: &LogRecord) -> bool {
        match record.severity() {
            Some(severity) => severity >= self.inner.level.get(),
            // Unparseable levels stay visible downstream.
            None => true,
        }
    }
}

impl Transport for DiscordTransport {
    fn id(&self) -> u64 {
        self.inner.id
    }

    fn level(&self) -> Severity {
        self.inner.level.get()
    }

    fn set_level(&self, level: Severity) {
        self.inner.level.set(level);
    }

    fn log(&self, record: &LogRecord) {
        if !self.enabled(record) {
            return;
        }
        // Snapshot everything the delivery needs before returning; the
        // spawned task never touches the live threshold.
        let payload = self.build_payload(record);
        let transport = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    transport.send(payload).await;
                });
            }
            Err(_) => {
                eprintln!("discord transport: no async runtime, dropping record");
            }
        }
    }
}

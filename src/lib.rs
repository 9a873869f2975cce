//! Forwards structured log records to a Discord webhook as rich embeds.
//!
//! The adapter is a single sink plugged into a host logging system: it
//! builds one embed payload per record, posts it fire-and-forget, and on
//! delivery failure reroutes the error to the host's other transports (or
//! a custom hook, or stderr) instead of raising into the caller.
//!
//! ```no_run
//! use std::sync::Arc;
//! use discord_webhook_sink::config::WebhookConfig;
//! use discord_webhook_sink::transport::DiscordTransport;
//!
//! # fn main() -> Result<(), discord_webhook_sink::error::ConfigError> {
//! let transport = DiscordTransport::new(
//!     WebhookConfig::new("https://discord.com/api/webhooks/id/token")
//!         .with_username("App"),
//! )?;
//! discord_webhook_sink::init::init(Arc::new(transport));
//! tracing::error!("something broke");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod init;
pub mod layer;
pub mod level;
pub mod memory;
pub mod payload;
pub mod record;
pub mod render;
pub mod transport;

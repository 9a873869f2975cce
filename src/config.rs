use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::host::LogHost;
use crate::level::Severity;
use crate::record::LogRecord;
use crate::render::RenderFn;
use crate::transport::ReportFn;

/// Webhook URL, e.g. `https://discord.com/api/webhooks/...`.
pub const DISCORD_WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Display name shown as the message sender.
pub const DISCORD_USERNAME_ENV: &str = "DISCORD_USERNAME";

/// Optional avatar image URL for the sender.
pub const DISCORD_AVATAR_URL_ENV: &str = "DISCORD_AVATAR_URL";

/// Optional thumbnail image URL for each embed.
pub const DISCORD_THUMB_URL_ENV: &str = "DISCORD_THUMB_URL";

/// Minimum severity level name, e.g. `warn`.
pub const DISCORD_LEVEL_ENV: &str = "DISCORD_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Construction-time configuration for a
/// [`DiscordTransport`](crate::transport::DiscordTransport).
///
/// Only `webhook` is required. The severity threshold defaults to the most
/// permissive level (`silly`) when unset. The render and error-report hooks
/// fully replace the corresponding default behavior when supplied.
pub struct WebhookConfig {
    pub webhook: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub thumb_url: Option<String>,
    pub level: Option<Severity>,
    pub(crate) host: Option<Arc<dyn LogHost>>,
    pub(crate) render: Option<Box<RenderFn>>,
    pub(crate) report_error: Option<Box<ReportFn>>,
}

impl WebhookConfig {
    pub fn new(webhook: impl Into<String>) -> Self {
        WebhookConfig {
            webhook: webhook.into(),
            username: None,
            avatar_url: None,
            thumb_url: None,
            level: None,
            host: None,
            render: None,
            report_error: None,
        }
    }

    /// Build a config from the `DISCORD_*` environment variables.
    ///
    /// A missing webhook variable yields a config that fails validation at
    /// construction time; an unparseable level name is ignored.
    pub fn from_env() -> Self {
        let mut config = WebhookConfig::new(env_or(DISCORD_WEBHOOK_URL_ENV, ""));
        if let Ok(username) = std::env::var(DISCORD_USERNAME_ENV) {
            config = config.with_username(username);
        }
        if let Ok(avatar_url) = std::env::var(DISCORD_AVATAR_URL_ENV) {
            config = config.with_avatar_url(avatar_url);
        }
        if let Ok(thumb_url) = std::env::var(DISCORD_THUMB_URL_ENV) {
            config = config.with_thumb_url(thumb_url);
        }
        if let Ok(level) = std::env::var(DISCORD_LEVEL_ENV) {
            if let Ok(level) = level.parse() {
                config = config.with_level(level);
            }
        }
        config
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn with_thumb_url(mut self, thumb_url: impl Into<String>) -> Self {
        self.thumb_url = Some(thumb_url.into());
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Attach a host; the transport self-registers into its registry at
    /// construction time and uses it for peer rebroadcast on failure.
    pub fn with_host(mut self, host: Arc<dyn LogHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the default description renderer.
    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&LogRecord) -> String + Send + Sync + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    /// Replace the entire failure-reporting cascade with a custom hook.
    pub fn with_report_error<F>(mut self, report_error: F) -> Self
    where
        F: Fn(&crate::error::DeliveryError) + Send + Sync + 'static,
    {
        self.report_error = Some(Box::new(report_error));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook.trim().is_empty() {
            return Err(ConfigError::MissingWebhook);
        }
        Ok(())
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("webhook", &self.webhook)
            .field("username", &self.username)
            .field("avatar_url", &self.avatar_url)
            .field("thumb_url", &self.thumb_url)
            .field("level", &self.level)
            .field("host", &self.host.is_some())
            .field("render", &self.render.is_some())
            .field("report_error", &self.report_error.is_some())
            .finish()
    }
}

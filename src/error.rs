/// Error type returned when validating adapter configuration.
///
/// This is the only error the adapter ever raises to its direct caller;
/// everything that happens after construction is absorbed internally.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration field: webhook")]
    MissingWebhook,
}

/// Error type describing a failed webhook delivery.
///
/// Never propagated to the log call site; the delivery engine routes it
/// through the failure-reporting cascade instead.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    /// The destination answered with a non-success status.
    #[error("webhook {endpoint} rejected the payload with status {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The destination could not be reached at all.
    #[error("failed to deliver to webhook {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_names_endpoint_and_status() {
        let err = DeliveryError::Rejected {
            endpoint: "https://x/y".to_string(),
            status: 500,
            body: "oops".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("https://x/y"));
        assert!(text.contains("500"));
        assert!(text.contains("oops"));
    }
}

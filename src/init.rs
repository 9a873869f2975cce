use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::layer::DiscordLayer;
use crate::transport::Transport;

/// Install a global `tracing` subscriber that forwards events to the
/// given transport.
///
/// This is the recommended entrypoint for applications that only want the
/// webhook channel. Panics if a global subscriber is already set.
pub fn init(transport: Arc<dyn Transport>) {
    let subscriber = Registry::default().with(DiscordLayer::new(transport));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}

/// Like [`init`], but also prints events to stdout through a `fmt` layer,
/// so the webhook stays a side channel rather than the only output.
pub fn init_with_stdout(transport: Arc<dyn Transport>) {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let subscriber = Registry::default()
        .with(DiscordLayer::new(transport))
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}

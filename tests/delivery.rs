use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::time::{sleep, Duration};

use discord_webhook_sink::config::WebhookConfig;
use discord_webhook_sink::record::LogRecord;
use discord_webhook_sink::transport::{DiscordTransport, Transport};

#[tokio::test]
async fn successful_delivery_returns_the_receipt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .with_status(204)
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::PartialJsonString(
            "{\"username\": \"App\"}".to_string(),
        ))
        .match_body(mockito::Matcher::PartialJsonString(
            "{\"embeds\": [{\"description\": \"'boom'\"}]}".to_string(),
        ))
        .create_async()
        .await;

    let transport = DiscordTransport::new(
        WebhookConfig::new(format!("{}/hook", server.url())).with_username("App"),
    )
    .unwrap();
    let record = LogRecord::new("error", vec![json!("boom")]);

    let receipt = transport.send(transport.build_payload(&record)).await;
    assert_eq!(receipt.unwrap().status, 204);
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_delivery_reports_once_and_never_escapes() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let endpoint = format!("{}/hook", server.url());

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let transport = DiscordTransport::new(
        WebhookConfig::new(endpoint.clone()).with_report_error(move |err| {
            sink.lock().unwrap().push(err.to_string());
        }),
    )
    .unwrap();
    let record = LogRecord::new("error", vec![json!("boom")]);

    let receipt = transport.send(transport.build_payload(&record)).await;
    assert!(receipt.is_none());

    let reported = reported.lock().unwrap();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains(&endpoint));
    assert!(reported[0].contains("500"));
}

#[tokio::test]
async fn unreachable_endpoint_reports_a_transport_error() {
    // Nothing listens on this port; reqwest fails at the connection level.
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let transport = DiscordTransport::new(
        WebhookConfig::new("http://127.0.0.1:9/hook").with_report_error(move |err| {
            sink.lock().unwrap().push(err.to_string());
        }),
    )
    .unwrap();
    let record = LogRecord::new("error", vec![json!("boom")]);

    let receipt = transport.send(transport.build_payload(&record)).await;
    assert!(receipt.is_none());

    let reported = reported.lock().unwrap();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains("http://127.0.0.1:9/hook"));
}

#[tokio::test]
async fn log_is_fire_and_forget() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .with_status(204)
        .match_body(mockito::Matcher::PartialJsonString(
            "{\"embeds\": [{\"fields\": [{\"name\": \"Level\", \"value\": \"warn\"}]}]}"
                .to_string(),
        ))
        .create_async()
        .await;

    let transport =
        DiscordTransport::new(WebhookConfig::new(format!("{}/hook", server.url()))).unwrap();

    // Returns immediately; delivery happens on a background task.
    transport.log(&LogRecord::new("warn", vec![json!("careful")]));

    for _ in 0..100 {
        if mock.matched_async().await {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    mock.assert_async().await;
}

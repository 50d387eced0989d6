use super::*;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn serve_webhallen(server: &MockServer, web_stock: i64) {
    serve_webhallen_product(server, "Sony PlayStation 5 Digital Edition", web_stock).await;
}

/// Replaces whatever the mock server answered before
async fn serve_webhallen_product(server: &MockServer, name: &str, web_stock: i64) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(webhallen_body(name, web_stock)))
        .mount(server)
        .await;
}

fn webhallen_sources(server: &MockServer) -> Vec<SourceConfig> {
    parse_sources(&format!(
        r#"
[[sources]]
name = "Webhallen digital edition"
tracker = "webhallen"
endpoint = "{uri}/api/search?page=1"
edition = "digital"
message = "Webhallen har nu Playstation 5 Digital edition i lager."
visit_url = "https://www.webhallen.com/se/category/16279-Konsol"

[[sources]]
name = "Webhallen standard edition"
tracker = "webhallen"
endpoint = "{uri}/api/search?page=1"
edition = "standard"
message = "Webhallen har nu Playstation 5 Standard edition i lager."
"#,
        uri = server.uri()
    ))
}

#[tokio::test]
async fn test_restock_announced_once_after_priming() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let mut scheduler = create_test_scheduler(&webhallen_sources(&server), notifier.clone());

    // Cycle 0: already in stock at startup, recorded but not announced
    serve_webhallen(&server, 4).await;
    let summary = scheduler.run_cycle().await;
    assert!(summary.priming);
    assert_eq!(summary.available, 1);
    assert_eq!(summary.unavailable, 1);
    assert!(notifier.published().is_empty());
    assert!(scheduler.state().is_alerted("Webhallen digital edition"));

    // Cycle 1: still in stock, nothing new
    let summary = scheduler.run_cycle().await;
    assert_eq!(summary.notified, 0);

    // Cycle 2: sold out, the source re-arms
    serve_webhallen(&server, 0).await;
    let summary = scheduler.run_cycle().await;
    assert_eq!(summary.unavailable, 2);
    assert!(!scheduler.state().is_alerted("Webhallen digital edition"));

    // Cycle 3: back in stock, exactly one announcement
    serve_webhallen(&server, 2).await;
    let summary = scheduler.run_cycle().await;
    assert_eq!(summary.notified, 1);
    assert_eq!(
        notifier.published(),
        vec!["Webhallen har nu Playstation 5 Digital edition i lager. https://www.webhallen.com/se/category/16279-Konsol"]
    );
    assert!(notifier.operator().is_empty());
    assert_eq!(scheduler.cycle(), 4);

    Ok(())
}

#[tokio::test]
async fn test_announcement_falls_back_to_endpoint() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let sources = parse_sources(&format!(
        r#"
[[sources]]
name = "Webhallen standard edition"
tracker = "webhallen"
endpoint = "{}/api/search"
message = "Webhallen har nu Playstation 5 Standard edition i lager."
"#,
        server.uri()
    ));
    let mut scheduler = create_test_scheduler(&sources, notifier.clone());

    serve_webhallen_product(&server, "Sony PlayStation 5 Konsol", 0).await;
    scheduler.run_cycle().await;

    serve_webhallen_product(&server, "Sony PlayStation 5 Konsol", 1).await;
    scheduler.run_cycle().await;

    assert_eq!(
        notifier.published(),
        vec![format!(
            "Webhallen har nu Playstation 5 Standard edition i lager. {}/api/search",
            server.uri()
        )]
    );

    Ok(())
}

#[tokio::test]
async fn test_post_source_sends_form_and_headers() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/json"))
        .and(body_string("category=369"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [{ "name": "Playstation 5 Konsol", "stock": { "quantity": "3" } }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let sources = parse_sources(&format!(
        r#"
[[sources]]
name = "Spel och Sånt Standard edition"
tracker = "spelochsant"
method = "POST"
endpoint = "{uri}/products/json"
edition = "standard"
message = "Spel och Sånt har nu Playstation 5 Standard edition i lager."

[sources.headers]
X-Requested-With = "XMLHttpRequest"

[sources.form]
category = "369"

[[sources]]
name = "Spel och Sånt Digital edition"
tracker = "spelochsant"
method = "POST"
endpoint = "{uri}/products/json"
edition = "digital"
message = "Spel och Sånt har nu Playstation 5 Digital edition i lager."

[sources.headers]
X-Requested-With = "XMLHttpRequest"

[sources.form]
category = "369"
"#,
        uri = server.uri()
    ));
    let mut scheduler = create_test_scheduler(&sources, notifier.clone());

    let summary = scheduler.run_cycle().await;

    assert_eq!(summary.available, 1);
    assert_eq!(summary.unavailable, 1);
    assert_eq!(summary.failed, 0);
    assert!(scheduler.state().is_alerted("Spel och Sånt Standard edition"));

    Ok(())
}

#[tokio::test]
async fn test_slow_source_is_reported_and_scan_continues() -> anyhow::Result<()> {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&slow)
        .await;
    let server = MockServer::start().await;
    serve_webhallen(&server, 0).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let sources = parse_sources(&format!(
        r#"
[[sources]]
name = "Power digital edition"
tracker = "power"
endpoint = "{slow}/api/v2/productlists"
edition = "digital"
message = "Power har nu Playstation 5 Digital edition i lager."

[[sources]]
name = "Webhallen digital edition"
tracker = "webhallen"
endpoint = "{fast}/api/search"
edition = "digital"
message = "Webhallen har nu Playstation 5 Digital edition i lager."
"#,
        slow = slow.uri(),
        fast = server.uri()
    ));
    let mut scheduler = create_test_scheduler(&sources, notifier.clone());

    let summary = scheduler.run_cycle().await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.unavailable, 1);
    let operator = notifier.operator();
    assert_eq!(operator.len(), 1);
    assert!(operator[0].starts_with("Error for Power digital edition: transport failure"));
    assert!(operator[0].contains("timed out"));

    Ok(())
}

#[tokio::test]
async fn test_layout_change_is_reported_once_per_hour() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>Maintenance</p></body></html>"))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let sources = parse_sources(&format!(
        r#"
[[sources]]
name = "Mediamarkt standard edition"
tracker = "mediamarkt"
endpoint = "{}/sv/category/_playstation-5-konsoler-766514.html"
message = "MediaMarkt har nu Playstation 5 Standard edition i lager."
"#,
        server.uri()
    ));
    let mut scheduler = create_test_scheduler(&sources, notifier.clone());

    for _ in 0..3 {
        let summary = scheduler.run_cycle().await;
        assert_eq!(summary.failed, 1);
    }

    let operator = notifier.operator();
    assert_eq!(operator.len(), 1, "repeated failure within the hour should be reported once");
    assert!(operator[0].contains("classification failure: Element not found: ul.products-list"));
    assert!(!scheduler.state().is_alerted("Mediamarkt standard edition"));

    Ok(())
}

#[tokio::test]
async fn test_simultaneous_failures_are_reported_once_each() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>Maintenance</p></body></html>"))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let sources = parse_sources(&format!(
        r#"
[[sources]]
name = "Mediamarkt standard edition"
tracker = "mediamarkt"
endpoint = "{uri}/sv/category/_playstation-5-konsoler-766514.html"
message = "MediaMarkt har nu Playstation 5 Standard edition i lager."

[[sources]]
name = "Mediamarkt digital edition"
tracker = "mediamarkt"
endpoint = "{uri}/sv/category/_playstation-5-konsoler-766514.html"
edition = "digital"
message = "MediaMarkt har nu Playstation 5 Digital edition i lager."
"#,
        uri = server.uri()
    ));
    let mut scheduler = create_test_scheduler(&sources, notifier.clone());

    for _ in 0..4 {
        let summary = scheduler.run_cycle().await;
        assert_eq!(summary.failed, 2);
    }

    let operator = notifier.operator();
    assert_eq!(operator.len(), 2, "each failing source should be reported once within the hour");
    assert!(operator.iter().any(|m| m.starts_with("Error for Mediamarkt standard edition")));
    assert!(operator.iter().any(|m| m.starts_with("Error for Mediamarkt digital edition")));

    Ok(())
}

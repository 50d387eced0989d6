use super::*;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn power_sources(retailer: &MockServer) -> Vec<SourceConfig> {
    parse_sources(&format!(
        r#"
[[sources]]
name = "Power standard edition"
tracker = "power"
endpoint = "{}/api/v2/productlists?cat=7416"
edition = "standard"
message = "Power har nu Playstation 5 Standard edition i lager."
visit_url = "https://www.power.se/c/7416/gaming/playstation/playstation-konsoler/"
"#,
        retailer.uri()
    ))
}

async fn serve_power(server: &MockServer, stock_count: i64) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/productlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "totalProductCount": 1,
            "products": [{
                "title": "Sony PlayStation 5 (PS5)",
                "stockCount": stock_count,
                "canAddToCart": stock_count > 0
            }]
        })))
        .mount(server)
        .await;
}

fn discord_scheduler(retailer: &MockServer, discord: &MockServer) -> ScanScheduler {
    let notifier = PluginManager::new().notifier_from_config(&get_test_discord_config(discord));
    assert_eq!(notifier.name(), "discord");
    create_test_scheduler(&power_sources(retailer), notifier)
}

#[tokio::test]
async fn test_restock_is_posted_to_discord_webhook() -> anyhow::Result<()> {
    let retailer = MockServer::start().await;
    let discord = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/public"))
        .and(query_param("wait", "true"))
        .and(body_partial_json(serde_json::json!({
            "content": "Power har nu Playstation 5 Standard edition i lager. https://www.power.se/c/7416/gaming/playstation/playstation-konsoler/",
            "username": "Restock Test Bot"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1100" })))
        .expect(1)
        .mount(&discord)
        .await;

    let mut scheduler = discord_scheduler(&retailer, &discord);

    serve_power(&retailer, 0).await;
    scheduler.run_cycle().await;
    serve_power(&retailer, 3).await;
    let summary = scheduler.run_cycle().await;
    let repeat = scheduler.run_cycle().await;

    assert_eq!(summary.notified, 1);
    assert_eq!(repeat.notified, 0);

    Ok(())
}

#[tokio::test]
async fn test_rejected_post_reports_to_operator_and_retries_next_cycle() -> anyhow::Result<()> {
    let retailer = MockServer::start().await;
    let discord = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/public"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&discord)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1101" })))
        .expect(1)
        .mount(&discord)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/2/operator"))
        .and(body_string_contains("publish failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "2001" })))
        .expect(1)
        .mount(&discord)
        .await;

    let mut scheduler = discord_scheduler(&retailer, &discord);

    serve_power(&retailer, 0).await;
    scheduler.run_cycle().await;
    serve_power(&retailer, 3).await;

    let failed = scheduler.run_cycle().await;
    assert_eq!(failed.notified, 0);
    assert!(!scheduler.state().is_alerted("Power standard edition"));

    let retried = scheduler.run_cycle().await;
    assert_eq!(retried.notified, 1);
    assert!(scheduler.state().is_alerted("Power standard edition"));

    Ok(())
}

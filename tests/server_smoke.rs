//! Live server smoke tests over a real socket.

mod common;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_live_dispatch_and_rejection() {
    let mut config = common::folder_config();
    config.tenancy.default_tenant = None;
    let (addr, shutdown) = common::spawn_server(config).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/acme/blog/rss", addr))
        .header("accept-language", "fr-FR")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "public,max-age=100");
    assert_eq!(response.headers()["content-language"], "fr-FR");
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["rule"], "folderblogrss");
    assert_eq!(body["tenant"], "acme");

    let response = client
        .get(format!("http://{}/nowhere/sitemap", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "no_tenant");

    shutdown.trigger();
}

#[tokio::test]
async fn test_live_https_redirect_is_not_followed() {
    let mut config = common::folder_config();
    config.security.require_https = true;
    let (addr, shutdown) = common::spawn_server(config).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = client
        .get(format!("http://{}/acme/sitemap", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    // The socket address is not a registered host, so the tenant's own host is used.
    assert_eq!(response.headers()["location"], "https://acme.test/acme/sitemap");

    shutdown.trigger();
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let (addr, shutdown) = common::spawn_server(common::folder_config()).await;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let response = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let fresh = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    assert!(fresh.get(format!("http://{}/", addr)).send().await.is_err());
}

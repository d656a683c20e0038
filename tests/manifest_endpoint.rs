//! End-to-end tests for the manifest endpoint.
//!
//! These start a real Axum server on a random port and fetch the manifest
//! over HTTP, checking headers, origin handling and key filtering.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use waya_miniapp::config::ManifestConfig;
use waya_miniapp::manifest::{FALLBACK_ORIGIN, MANIFEST_CACHE_CONTROL, ManifestBuilder};
use waya_miniapp::web::{AppState, MANIFEST_PATH, ServerHandle, router, start_server};

fn is_bind_permission_error<E: std::fmt::Display>(err: &E) -> bool {
    err.to_string().contains("Operation not permitted")
        || err.to_string().contains("Permission denied")
}

/// Start a server on a random port, or `None` when the sandbox forbids binding.
async fn start_test_server(config: ManifestConfig) -> Option<ServerHandle> {
    let state = Arc::new(AppState::new(ManifestBuilder::new(config)));
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    match start_server(addr, state).await {
        Ok(handle) => Some(handle),
        Err(e) if is_bind_permission_error(&e) => None,
        Err(e) => panic!("Failed to start test server: {e:?}"),
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client")
}

#[tokio::test]
async fn test_manifest_served_with_cache_headers() {
    let config = ManifestConfig {
        public_url: Some("https://waya.example".to_string()),
        account_association_header: Some("eyJmaWQiOjEyMzR9".to_string()),
        account_association_payload: Some("eyJkb21haW4iOiJ3YXlhLmV4YW1wbGUifQ".to_string()),
        account_association_signature: Some("MHgxMjM0".to_string()),
        name: Some("Waya".to_string()),
        primary_category: Some("Finance".to_string()),
        ..Default::default()
    };
    let Some(handle) = start_test_server(config).await else {
        return;
    };

    let response = client()
        .get(format!("http://{}{}", handle.local_addr(), MANIFEST_PATH))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some(MANIFEST_CACHE_CONTROL)
    );
    assert!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"))
    );

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["accountAssociation"]["header"], "eyJmaWQiOjEyMzR9");
    assert_eq!(body["accountAssociation"]["signature"], "MHgxMjM0");
    assert_eq!(body["frame"]["name"], "Waya");
    assert_eq!(body["frame"]["homeUrl"], "https://waya.example");
    assert_eq!(body["frame"]["iconUrl"], "https://waya.example/icon.png");
    assert_eq!(body["frame"]["primaryCategory"], "finance");
    assert_eq!(body["frame"]["noindex"], false);

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_loopback_request_origin_is_never_advertised() {
    let Some(handle) = start_test_server(ManifestConfig::default()).await else {
        return;
    };

    // The client connects over 127.0.0.1, which is the request origin.
    let body: Value = client()
        .get(format!("http://{}{}", handle.local_addr(), MANIFEST_PATH))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    let frame = body["frame"].as_object().expect("frame object");
    assert_eq!(frame["homeUrl"], FALLBACK_ORIGIN);
    for (key, value) in frame {
        if let Some(s) = value.as_str() {
            assert!(!s.is_empty(), "{key} is empty");
            assert!(!s.contains("127.0.0.1"), "{key} leaks loopback: {s}");
        }
        if let Some(items) = value.as_array() {
            assert!(!items.is_empty(), "{key} is an empty list");
        }
    }

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_forwarded_origin_drives_urls() {
    let Some(handle) = start_test_server(ManifestConfig::default()).await else {
        return;
    };

    let body: Value = client()
        .get(format!("http://{}{}", handle.local_addr(), MANIFEST_PATH))
        .header("x-forwarded-host", "preview.waya.example")
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    assert_eq!(body["frame"]["homeUrl"], "https://preview.waya.example");
    assert_eq!(
        body["frame"]["webhookUrl"],
        "https://preview.waya.example/api/webhook"
    );
    assert_eq!(
        body["frame"]["screenshotUrls"],
        serde_json::json!(["https://preview.waya.example/screenshot.png"])
    );

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_health_endpoint() {
    let Some(handle) = start_test_server(ManifestConfig::default()).await else {
        return;
    };

    let body: Value = client()
        .get(format!("http://{}/api/health", handle.local_addr()))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "healthy");

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_dropping_handle_stops_server() {
    let Some(handle) = start_test_server(ManifestConfig::default()).await else {
        return;
    };
    let url = format!("http://{}/api/health", handle.local_addr());
    assert!(client().get(&url).send().await.expect("request").status().is_success());

    drop(handle);

    let mut stopped = false;
    for _ in 0..40 {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        if client().get(&url).send().await.is_err() {
            stopped = true;
            break;
        }
    }
    assert!(stopped, "server still answering after its handle was dropped");
}

#[tokio::test]
async fn test_router_degrades_hostile_overrides() {
    let config = ManifestConfig {
        icon_url: Some("http://localhost:3000/icon.png".to_string()),
        hero_image_url: Some("https://[::1]/hero.png".to_string()),
        tags: Some(" , ".to_string()),
        primary_category: Some("defi".to_string()),
        splash_background_color: Some("red".to_string()),
        ..Default::default()
    };
    let app = router(Arc::new(AppState::new(ManifestBuilder::new(config))));

    let response = app
        .oneshot(
            Request::builder()
                .uri(MANIFEST_PATH)
                .header("host", "waya.example")
                .header("x-forwarded-proto", "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let frame = &body["frame"];
    assert_eq!(frame["iconUrl"], "https://waya.example/icon.png");
    assert_eq!(frame["heroImageUrl"], "https://waya.example/hero.png");
    assert_eq!(
        frame["tags"],
        serde_json::json!(["waya", "miniapp", "farcaster", "base", "lifi"])
    );
    assert_eq!(frame["primaryCategory"], "social");
    assert_eq!(frame["splashBackgroundColor"], "#FFFFFF");
}

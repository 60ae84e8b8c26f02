mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use cep_lookup::routes::{RouterOptions, app_router, build_router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

fn server(provider: Arc<common::StubProvider>, rate_limit_per_minute: u32) -> TestServer {
    let (state, _cache) = common::create_test_state(provider);
    let app = build_router(
        state,
        RouterOptions {
            rate_limit_per_minute,
            behind_proxy: false,
        },
    )
    .unwrap()
    .layer(common::MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_lookup_is_served_under_both_prefixes() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let server = server(provider.clone(), 100);

    let plain = server.get("/cep/14784478").await;
    let prefixed = server.get("/api/cep/14784478").await;

    assert_eq!(plain.status_code(), 200);
    assert_eq!(prefixed.status_code(), 200);
    assert_eq!(plain.json::<Value>(), prefixed.json::<Value>());
    // The second request is served from the shared cache
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_rate_limit_rejects_eleventh_request() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let server = server(provider, 10);

    for _ in 0..10 {
        assert_eq!(server.get("/cep/123").await.status_code(), 400);
    }

    let response = server.get("/cep/123").await;
    assert_eq!(response.status_code(), 429);
}

#[tokio::test]
async fn test_rate_limit_is_shared_between_prefixes() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let server = server(provider, 2);

    assert_eq!(server.get("/cep/123").await.status_code(), 400);
    assert_eq!(server.get("/api/cep/123").await.status_code(), 400);

    assert_eq!(server.get("/cep/123").await.status_code(), 429);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let server = server(provider, 1);

    for _ in 0..5 {
        server.get("/health").await.assert_status_ok();
    }
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let server = server(provider.clone(), 10);

    server.get("/cep").await.assert_status_not_found();
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let provider = common::StubProvider::returning_json(common::barretos_json());
    let (state, _cache) = common::create_test_state(provider.clone());
    let app = app_router(state, RouterOptions::default()).unwrap();

    let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
    let mut request = Request::builder()
        .uri("/cep/14784478/")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}

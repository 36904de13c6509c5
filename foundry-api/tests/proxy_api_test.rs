mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test::{self, TestRequest};
use common::{setup_test_app, setup_test_app_with_tags_url};
use serde_json::{json, Value};

#[actix_rt::test]
async fn test_unreachable_ollama_returns_empty_models() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get().uri("/proxy/ollama/tags").to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"models": []}));

    Ok(())
}

#[actix_rt::test]
async fn test_ollama_tags_are_relayed() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let upstream = json!({
        "models": [
            {"name": "llama3:8b", "modified_at": "2024-05-01T10:00:00Z", "size": 4661224676u64},
            {"name": "mistral:latest", "size": 4109865159u64}
        ]
    });
    let _mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream.to_string())
        .create_async()
        .await;

    let test_app = setup_test_app_with_tags_url(&format!("{}/api/tags", server.url())).await?;

    let req = TestRequest::get().uri("/proxy/ollama/tags").to_request();
    let body: Value = test::call_and_read_body_json(&test_app.app, req).await;

    assert_eq!(body, upstream);

    Ok(())
}

#[actix_rt::test]
async fn test_health_check() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());

    Ok(())
}

#[actix_rt::test]
async fn test_cors_preflight_from_dev_origin() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/agents")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    Ok(())
}

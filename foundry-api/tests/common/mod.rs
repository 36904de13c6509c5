#![allow(dead_code)]

use actix_web::body::{BoxBody, EitherBody};
use actix_web::{test, web, App};
use foundry_api::config::{DatabaseConfig, OllamaConfig, DEFAULT_ALLOWED_ORIGINS};
use foundry_api::handlers;
use foundry_api::proxy::OllamaProxy;
use foundry_api::storage::{bootstrap, SharedStore, SqlAgentStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Nothing listens here, so the proxy always takes its fallback path
pub const UNREACHABLE_TAGS_URL: &str = "http://127.0.0.1:9/api/tags";

pub struct TestApp<S> {
    pub store: SqlAgentStore,
    pub app: S,
    _db_dir: TempDir,
}

pub fn test_database_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: Some(format!(
            "sqlite://{}",
            dir.path().join("foundry.db").display()
        )),
        max_connections: 4,
        ..DatabaseConfig::default()
    }
}

/// Fresh SQLite file with every migration applied
pub async fn setup_test_store() -> anyhow::Result<(TempDir, SqlAgentStore)> {
    let dir = tempfile::tempdir()?;
    let pool = bootstrap::prepare(&test_database_config(&dir)).await?;
    Ok((dir, SqlAgentStore::new(pool)))
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<EitherBody<BoxBody>>,
            Error = actix_web::Error,
        >,
    >,
> {
    setup_test_app_with_tags_url(UNREACHABLE_TAGS_URL).await
}

pub async fn setup_test_app_with_tags_url(
    tags_url: &str,
) -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<EitherBody<BoxBody>>,
            Error = actix_web::Error,
        >,
    >,
> {
    let (db_dir, store) = setup_test_store().await?;
    let shared: SharedStore = Arc::new(store.clone());
    let proxy = OllamaProxy::new(&OllamaConfig {
        tags_url: tags_url.to_string(),
        timeout_secs: 2,
    })?;
    let allowed_origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|s| s.to_string())
        .collect();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(shared))
            .app_data(web::Data::new(proxy))
            .wrap(handlers::cors(&allowed_origins))
            .configure(handlers::configure),
    )
    .await;

    Ok(TestApp {
        store,
        app,
        _db_dir: db_dir,
    })
}

pub fn agent_payload(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "role": "assistant",
        "personality": "calm",
        "avatar": "x",
        "provider": "gemini",
        "model": "gemini-1.5-flash"
    })
}

pub fn message_payload(id: &str, agent_id: &str, content: &str) -> Value {
    json!({
        "id": id,
        "agent_id": agent_id,
        "role": "user",
        "content": content
    })
}

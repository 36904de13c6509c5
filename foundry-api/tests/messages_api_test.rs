mod common;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{agent_payload, message_payload, setup_test_app};
use serde_json::{json, Value};

async fn post_json<S>(app: &S, uri: &str, body: Value) -> StatusCode
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
    >,
{
    let req = TestRequest::post().uri(uri).set_json(body).to_request();
    test::call_service(app, req).await.status()
}

#[actix_rt::test]
async fn test_list_messages_orders_by_id_descending() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;

    assert_eq!(post_json(app, "/agents", agent_payload("a1", "One")).await, StatusCode::OK);
    assert_eq!(post_json(app, "/agents", agent_payload("a2", "Two")).await, StatusCode::OK);

    for (id, agent_id) in [("m2", "a1"), ("m1", "a2"), ("m4", "a1"), ("m3", "a2")] {
        let status = post_json(app, "/messages", message_payload(id, agent_id, "text")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let req = TestRequest::get().uri("/messages").to_request();
    let messages: Value = test::call_and_read_body_json(app, req).await;
    let ids: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec!["m4", "m3", "m2", "m1"]);

    Ok(())
}

#[actix_rt::test]
async fn test_create_message_round_trips_trace_and_sources() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;

    assert_eq!(post_json(app, "/agents", agent_payload("a1", "Bot")).await, StatusCode::OK);

    let trace = json!([
        {"label": "Planning", "type": "thought", "status": "completed", "timestamp": "10:00:01", "duration": "1.2s"},
        {"label": "Search", "type": "tool", "status": "completed", "timestamp": "10:00:03", "detail": "3 results"}
    ]);
    let sources = json!([{"title": "Rust Book", "uri": "https://doc.rust-lang.org/book/"}]);

    let req = TestRequest::post()
        .uri("/messages")
        .set_json(json!({
            "id": "m1",
            "agent_id": "a1",
            "role": "assistant",
            "content": "Here is what I found",
            "trace": trace,
            "sources": sources
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;

    assert_eq!(created["agent_id"], "a1");
    assert_eq!(created["trace"], trace);
    assert_eq!(created["sources"], sources);
    assert!(created["timestamp"].is_string());

    let req = TestRequest::get().uri("/messages").to_request();
    let listed: Value = test::call_and_read_body_json(app, req).await;
    assert_eq!(listed[0]["trace"], trace);

    Ok(())
}

#[actix_rt::test]
async fn test_message_without_blobs_serializes_nulls() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;

    assert_eq!(post_json(app, "/agents", agent_payload("a1", "Bot")).await, StatusCode::OK);

    let req = TestRequest::post()
        .uri("/messages")
        .set_json(message_payload("m1", "a1", "hi"))
        .to_request();
    let created: Value = test::call_and_read_body_json(app, req).await;

    let object = created.as_object().unwrap();
    assert!(object.contains_key("trace") && created["trace"].is_null());
    assert!(object.contains_key("sources") && created["sources"].is_null());

    Ok(())
}

#[actix_rt::test]
async fn test_message_for_unknown_agent_fails_constraint() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/messages")
        .set_json(message_payload("m1", "ghost", "hello?"))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "constraint_error");

    let req = TestRequest::get().uri("/messages").to_request();
    let messages: Value = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(messages, json!([]));

    Ok(())
}

#[actix_rt::test]
async fn test_duplicate_message_id_conflicts() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;

    assert_eq!(post_json(app, "/agents", agent_payload("a1", "Bot")).await, StatusCode::OK);
    assert_eq!(
        post_json(app, "/messages", message_payload("m1", "a1", "first")).await,
        StatusCode::OK
    );
    assert_eq!(
        post_json(app, "/messages", message_payload("m1", "a1", "second")).await,
        StatusCode::CONFLICT
    );

    Ok(())
}

#[actix_rt::test]
async fn test_message_missing_content_is_rejected() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/messages")
        .set_json(json!({"id": "m1", "agent_id": "a1", "role": "user"}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");

    Ok(())
}

#[actix_rt::test]
async fn test_deleting_agent_cascades_to_messages() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;

    assert_eq!(post_json(app, "/agents", agent_payload("a1", "Doomed")).await, StatusCode::OK);
    assert_eq!(post_json(app, "/agents", agent_payload("a2", "Survivor")).await, StatusCode::OK);
    for (id, agent_id) in [("m1", "a1"), ("m2", "a1"), ("m3", "a2")] {
        let status = post_json(app, "/messages", message_payload(id, agent_id, "text")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let req = TestRequest::delete().uri("/agents/a1").to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/messages").to_request();
    let messages: Value = test::call_and_read_body_json(app, req).await;
    let remaining: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(remaining, vec!["m3"]);

    Ok(())
}

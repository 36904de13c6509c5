use crate::error::ApiResult;
use crate::storage::SharedStore;
use actix_web::{get, post, web, HttpResponse};
use shared_types::MessageCreate;
use tracing::info;

/// All messages across agents, newest id first
#[get("/messages")]
pub async fn list_messages(store: web::Data<SharedStore>) -> ApiResult<HttpResponse> {
    let messages = store.list_messages().await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[post("/messages")]
pub async fn create_message(
    store: web::Data<SharedStore>,
    message: web::Json<MessageCreate>,
) -> ApiResult<HttpResponse> {
    let message = store.create_message(message.into_inner()).await?;
    info!(
        message_id = %message.id,
        agent_id = %message.agent_id,
        role = %message.role,
        "Stored message"
    );
    Ok(HttpResponse::Ok().json(message))
}

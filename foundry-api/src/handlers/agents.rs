use crate::error::ApiResult;
use crate::storage::SharedStore;
use actix_web::{delete, get, post, put, web, HttpResponse};
use shared_types::{AgentCreate, DeleteResponse};
use tracing::info;

#[get("/agents")]
pub async fn list_agents(store: web::Data<SharedStore>) -> ApiResult<HttpResponse> {
    let agents = store.list_agents().await?;
    info!(count = agents.len(), "Listed agents");
    Ok(HttpResponse::Ok().json(agents))
}

#[post("/agents")]
pub async fn create_agent(
    store: web::Data<SharedStore>,
    agent: web::Json<AgentCreate>,
) -> ApiResult<HttpResponse> {
    let agent = store.create_agent(agent.into_inner()).await?;
    info!(agent_id = %agent.id, provider = %agent.provider, model = %agent.model, "Created agent");
    Ok(HttpResponse::Ok().json(agent))
}

/// The agent together with its messages
#[get("/agents/{agent_id}")]
pub async fn get_agent(
    store: web::Data<SharedStore>,
    agent_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let agent = store.get_agent_with_messages(&agent_id).await?;
    Ok(HttpResponse::Ok().json(agent))
}

#[put("/agents/{agent_id}")]
pub async fn update_agent(
    store: web::Data<SharedStore>,
    agent_id: web::Path<String>,
    agent: web::Json<AgentCreate>,
) -> ApiResult<HttpResponse> {
    let agent = store.update_agent(&agent_id, agent.into_inner()).await?;
    info!(agent_id = %agent.id, "Updated agent");
    Ok(HttpResponse::Ok().json(agent))
}

#[delete("/agents/{agent_id}")]
pub async fn delete_agent(
    store: web::Data<SharedStore>,
    agent_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    store.delete_agent(&agent_id).await?;
    info!(agent_id = %agent_id, "Deleted agent and its messages");
    Ok(HttpResponse::Ok().json(DeleteResponse::agent_deleted()))
}

pub mod agents;
pub mod health;
pub mod messages;
pub mod ollama;

use crate::error::ApiError;
use actix_cors::Cors;
use actix_web::web;
use tracing::warn;

/// Register every route of the API
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::health_check)
        .service(agents::list_agents)
        .service(agents::create_agent)
        .service(agents::get_agent)
        .service(agents::update_agent)
        .service(agents::delete_agent)
        .service(messages::list_messages)
        .service(messages::create_message)
        .service(ollama::get_ollama_tags);
}

/// Turn body decoding failures into `ApiError::Validation`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected request body");
        ApiError::Validation(err.to_string()).into()
    })
}

/// Local development origins, any method and header, credentials allowed
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

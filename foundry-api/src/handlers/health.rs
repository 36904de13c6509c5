use actix_web::{get, HttpResponse, Responder};
use shared_types::HealthResponse;

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::ok())
}

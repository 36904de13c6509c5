use crate::proxy::OllamaProxy;
use actix_web::{get, web, HttpResponse, Responder};

#[get("/proxy/ollama/tags")]
pub async fn get_ollama_tags(proxy: web::Data<OllamaProxy>) -> impl Responder {
    HttpResponse::Ok().json(proxy.fetch_tags().await)
}

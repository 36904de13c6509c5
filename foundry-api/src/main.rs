use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use foundry_api::config::ApiConfig;
use foundry_api::handlers;
use foundry_api::proxy::OllamaProxy;
use foundry_api::storage::{bootstrap, SharedStore, SqlAgentStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "foundry-api", version, about = "Agent Foundry API server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    foundry_api::init_tracing();

    let cli = Cli::parse();
    let config = ApiConfig::load(cli.config.as_deref())?;

    let pool = if config.database.migrate_on_startup {
        bootstrap::prepare(&config.database).await?
    } else {
        warn!("Schema migration on startup disabled; run `foundry-db init` before serving");
        bootstrap::connect(&config.database).await?
    };
    info!("Database connection pool ready");

    let store: SharedStore = Arc::new(SqlAgentStore::new(pool));
    let proxy = OllamaProxy::new(&config.ollama)?;
    let allowed_origins = config.cors.allowed_origins.clone();

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting foundry-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(proxy.clone()))
            .wrap(handlers::cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}

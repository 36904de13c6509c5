//! Database creation and schema migration.
//!
//! The server runs [`prepare`] on startup unless `database.migrate_on_startup`
//! is off; the `foundry-db` binary exposes the same steps for out-of-band use.

use super::Dialect;
use crate::config::DatabaseConfig;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::{Any, AnyPool};
use tracing::{debug, info, warn};

static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("src/storage/migrations/sqlite");
static MYSQL_MIGRATOR: Migrator = sqlx::migrate!("src/storage/migrations/mysql");

/// Columns added to `agents` after the first schema shipped
const MODEL_COLUMNS: [(&str, &str); 2] = [
    (
        "provider",
        "ALTER TABLE agents ADD COLUMN provider VARCHAR(50) NOT NULL DEFAULT 'gemini'",
    ),
    (
        "model",
        "ALTER TABLE agents ADD COLUMN model VARCHAR(100) NOT NULL DEFAULT 'gemini-1.5-flash'",
    ),
];

/// Create the database if the engine needs it, open a pool and migrate it
pub async fn prepare(config: &DatabaseConfig) -> anyhow::Result<AnyPool> {
    let url = config.connection_url();
    let dialect = Dialect::from_url(&url)?;

    ensure_database(&url).await?;
    let pool = connect(config).await?;
    run_migrations(&pool, dialect).await?;

    Ok(pool)
}

pub async fn connect(config: &DatabaseConfig) -> Result<AnyPool, sqlx::Error> {
    install_default_drivers();

    AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_url())
        .await
}

/// Make sure the target database exists.
///
/// In-memory SQLite is skipped. For SQLite files this creates the file; for
/// MySQL it connects to the server without a database and issues
/// `CREATE DATABASE`.
pub async fn ensure_database(url: &str) -> Result<(), sqlx::Error> {
    install_default_drivers();

    if is_in_memory(url) {
        info!("Using in-memory SQLite database. Skipping database creation.");
        return Ok(());
    }

    if Any::database_exists(url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database not found, creating it");
    Any::create_database(url).await
}

/// Apply every pending versioned migration for the dialect
pub async fn run_migrations(pool: &AnyPool, dialect: Dialect) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = match dialect {
        Dialect::Sqlite => &SQLITE_MIGRATOR,
        Dialect::MySql => &MYSQL_MIGRATOR,
    };

    migrator.run(pool).await?;
    info!(
        ?dialect,
        migrations = migrator.iter().count(),
        "Database schema is up to date"
    );
    Ok(())
}

/// Add `provider` and `model` to an `agents` table created before they existed.
///
/// Intended for databases that were never managed by the migrator. A failing
/// `ALTER TABLE` (usually because the column is already there) is logged and
/// skipped. Returns the columns that were actually added.
pub async fn add_model_columns(pool: &AnyPool) -> Vec<&'static str> {
    let mut added = Vec::new();

    info!("Checking 'agents' table schema...");
    for (column, statement) in MODEL_COLUMNS {
        match sqlx::query(statement).execute(pool).await {
            Ok(_) => {
                info!(column, "Added column to agents");
                added.push(column);
            }
            Err(e) => {
                warn!(column, error = %e, "Column might already exist");
            }
        }
    }

    added
}

fn is_in_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

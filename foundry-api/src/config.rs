use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3001",
    "http://127.0.0.1:3001",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings. `url` wins when present; otherwise the URL is
/// assembled from the individual components.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
    pub migrate_on_startup: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OllamaConfig {
    pub tags_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8021,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: "root".to_string(),
            password: "rootpass".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3306,
            name: "agent_foundry".to_string(),
            max_connections: 10,
            migrate_on_startup: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            tags_url: "http://127.0.0.1:11434/api/tags".to_string(),
            timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

impl ApiConfig {
    /// Load configuration from defaults, config files and the process environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(config_file, env::vars().collect())
    }

    /// Layering, lowest first: defaults, `./foundry.toml`,
    /// `~/.config/agent-foundry/api.toml`, the explicit `config_file`,
    /// `FOUNDRY__SECTION__KEY` variables, then `DATABASE_URL` and the `DB_*`
    /// component variables.
    pub fn load_from(
        config_file: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.user", defaults.database.user)?
            .set_default("database.password", defaults.database.password)?
            .set_default("database.host", defaults.database.host)?
            .set_default("database.port", i64::from(defaults.database.port))?
            .set_default("database.name", defaults.database.name)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.migrate_on_startup",
                defaults.database.migrate_on_startup,
            )?
            .set_default("cors.allowed_origins", defaults.cors.allowed_origins)?
            .set_default("ollama.tags_url", defaults.ollama.tags_url)?
            .set_default("ollama.timeout_secs", defaults.ollama.timeout_secs as i64)?;

        if let Ok(current_dir) = env::current_dir() {
            builder =
                builder.add_source(File::from(current_dir.join("foundry.toml")).required(false));
        }

        if let Some(user_config) = get_user_config_path() {
            builder = builder.add_source(File::from(user_config).required(false));
        }

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("FOUNDRY")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("database.url", vars.get("DATABASE_URL").cloned())?
            .set_override_option("database.user", vars.get("DB_USER").cloned())?
            .set_override_option("database.password", vars.get("DB_PASS").cloned())?
            .set_override_option("database.host", vars.get("DB_HOST").cloned())?
            .set_override_option("database.port", vars.get("DB_PORT").cloned())?
            .set_override_option("database.name", vars.get("DB_NAME").cloned())?;

        builder.build()?.try_deserialize()
    }
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agent-foundry/api.toml"))
}

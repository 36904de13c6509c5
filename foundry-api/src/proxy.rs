use crate::config::OllamaConfig;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
enum ProxyError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),
}

/// Passthrough to the local Ollama model listing.
///
/// Never fails outward: anything that goes wrong collapses to `{"models": []}`.
#[derive(Clone)]
pub struct OllamaProxy {
    tags_url: String,
    http_client: reqwest::Client,
}

impl OllamaProxy {
    pub fn new(config: &OllamaConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            tags_url: config.tags_url.clone(),
            http_client,
        })
    }

    pub async fn fetch_tags(&self) -> Value {
        match self.request_tags().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, url = %self.tags_url, "Ollama fetch error");
                empty_tags()
            }
        }
    }

    async fn request_tags(&self) -> Result<Value, ProxyError> {
        let response = self.http_client.get(&self.tags_url).send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ProxyError::Status(status));
        }

        let body = response.json::<Value>().await?;
        debug!(url = %self.tags_url, "Relaying Ollama tags");
        Ok(body)
    }
}

pub fn empty_tags() -> Value {
    json!({ "models": [] })
}

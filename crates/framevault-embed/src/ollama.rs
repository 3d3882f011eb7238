//! Ollama embedding backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use framevault_core::{defaults, EmbeddingBackend, Error, Result};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = defaults::OLLAMA_URL;

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = defaults::EMBED_MODEL;

/// Default embedding dimension for the default model.
pub const DEFAULT_DIMENSION: usize = defaults::EMBED_DIMENSION;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedding backend talking to a local Ollama server.
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    /// Create a backend with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(
            DEFAULT_OLLAMA_URL.to_string(),
            DEFAULT_EMBED_MODEL.to_string(),
            DEFAULT_DIMENSION,
        )
    }

    /// Create a backend with custom configuration.
    pub fn with_config(base_url: String, model: String, dimension: usize) -> Result<Self> {
        let timeout = std::env::var("FRAMEVAULT_EMBED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::EMBED_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %base_url,
            model = %model,
            timeout_secs = timeout,
            "initializing Ollama embedder"
        );

        Ok(Self {
            client,
            base_url,
            model,
            dimension,
        })
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OLLAMA_BASE` | `http://127.0.0.1:11434` |
    /// | `OLLAMA_EMBED_MODEL` | `nomic-embed-text` |
    /// | `OLLAMA_EMBED_DIM` | 768 |
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_BASE").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model = std::env::var("OLLAMA_EMBED_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string());
        let dimension = std::env::var("OLLAMA_EMBED_DIM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DIMENSION);

        Self::with_config(base_url, model, dimension)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "embedding request failed with status {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.embedding.len() != self.dimension {
            return Err(Error::Embedding(format!(
                "model {} returned dimension {}, expected {}",
                self.model,
                body.embedding.len(),
                self.dimension
            )));
        }
        Ok(body.embedding)
    }
}

#[async_trait]
impl EmbeddingBackend for OllamaEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(input_count = texts.len(), model = %self.model, "embedding texts");
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_one(text).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

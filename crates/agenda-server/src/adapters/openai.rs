//! OpenAI implementation of the Embedder port
//!
//! Calls the embeddings endpoint with a configurable model and
//! requested dimension.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use agenda::ports::Embedder;
use agenda::EngineError;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Embedder backed by the OpenAI embeddings API.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    input: String,
    model: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::embedding(&self.model, "empty input text"));
        }

        let request = EmbeddingRequest {
            input: text.to_string(),
            model: self.model.clone(),
            dimensions: self.dimension,
        };

        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::embedding(&self.model, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::embedding(
                &self.model,
                format!("API error {status}: {error_text}"),
            ));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EngineError::embedding(&self.model, e.to_string()))?;

        let vector = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EngineError::embedding(&self.model, "no embedding returned"))?;

        if vector.len() != self.dimension {
            return Err(EngineError::embedding(
                &self.model,
                format!(
                    "expected {} dimensions, got {}",
                    self.dimension,
                    vector.len()
                ),
            ));
        }

        Ok(vector)
    }
}

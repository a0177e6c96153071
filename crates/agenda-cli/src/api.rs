//! Agenda API Client

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API Client for the Agenda server
pub struct AgendaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub districts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub district: String,
    pub venue: String,
    pub event_type: String,
    pub price: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultResponse {
    pub rank: usize,
    pub similarity: f32,
    pub event: EventResponse,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultResponse>,
}

#[derive(Debug, Deserialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub total_events: usize,
    pub collection_name: String,
    pub embedding_model: String,
}

impl AgendaClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Run a semantic search
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/agenda/search", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await
            .context("Failed to connect to Agenda API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let results: SearchResponse = resp.json().await.context("Failed to parse response")?;

        Ok(results)
    }

    /// Trigger a feed ingestion cycle
    pub async fn ingest(&self) -> Result<IngestResponse> {
        let url = format!("{}/agenda/ingest", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .send()
            .await
            .context("Failed to connect to Agenda API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let report: IngestResponse = resp.json().await.context("Failed to parse response")?;

        Ok(report)
    }

    /// Fetch collection statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        let url = format!("{}/agenda/stats", self.base_url);
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to connect to Agenda API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let stats: StatsResponse = resp.json().await.context("Failed to parse response")?;

        Ok(stats)
    }

    /// Drop and recreate the collection
    pub async fn reset(&self) -> Result<()> {
        let url = format!("{}/agenda/reset", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .send()
            .await
            .context("Failed to connect to Agenda API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        Ok(())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }
}

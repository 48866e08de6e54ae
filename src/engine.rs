//! HTTP client for the remote search engine.
//!
//! Responses are never interpreted here beyond their status code; bodies are
//! handed back verbatim so callers can relay them.

use crate::config::Settings;
use crate::error::EngineError;
use crate::search::SearchRequest;
use reqwest::{RequestBuilder, StatusCode, Url, header};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

/// Status, content type and raw body of an engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    pub status: u16,
    /// The engine's `Content-Type`, if it sent one.
    pub content_type: Option<String>,
    pub body: String,
}

impl EngineResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct EngineClient {
    http: reqwest::Client,
    base: Url,
    index: String,
}

impl EngineClient {
    pub fn new(base_url: &str, index: &str) -> Result<Self, EngineError> {
        let base = Url::parse(base_url).map_err(|_| EngineError::Url(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(EngineError::Url(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            index: index.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, EngineError> {
        Self::new(&settings.engine_url, &settings.index)
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// `{base}/{index}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| EngineError::Url(self.base.to_string()))?
            .pop_if_empty()
            .push(&self.index)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<EngineResponse, EngineError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        info!("{}(): {}", operation, status);
        debug!("{}", body);
        Ok(EngineResponse {
            status,
            content_type,
            body,
        })
    }

    /// Drop the index if it exists, then create it from `config`.
    ///
    /// Destructive: all documents in the old index are gone afterwards.
    pub async fn recreate_index(&self, config: &Value) -> Result<EngineResponse, EngineError> {
        let url = self.url(&[])?;

        let deleted = self.send("delete_index", self.http.delete(url.clone())).await?;
        if !deleted.is_success() && deleted.status != StatusCode::NOT_FOUND.as_u16() {
            warn!("Deleting index {} returned {}", self.index, deleted.status);
        }

        self.send("create_index", self.http.put(url).json(config)).await
    }

    /// Send a newline-delimited bulk payload and refresh the index.
    pub async fn bulk(&self, payload: String) -> Result<EngineResponse, EngineError> {
        let mut url = self.url(&["_bulk"])?;
        url.set_query(Some("refresh"));

        let request = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(payload);
        self.send("index_bulk_data", request).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<EngineResponse, EngineError> {
        let url = self.url(&["_search"])?;
        self.send("evaluate_query", self.http.post(url).json(request)).await
    }

    pub async fn get_document(&self, id: &str) -> Result<EngineResponse, EngineError> {
        let url = self.url(&["_doc", id])?;
        self.send("get_document_by_id", self.http.get(url)).await
    }

    /// Run `text` through the analyzer configured for `field`.
    pub async fn analyze(&self, field: &str, text: &str) -> Result<EngineResponse, EngineError> {
        let url = self.url(&["_analyze"])?;
        let body = json!({ "field": field, "text": text });
        self.send("analyze", self.http.post(url).json(&body)).await
    }
}

//! Web search via Tavily.
//!
//! Requires `TAVILY_API_KEY` (passed in by the caller). API: https://docs.tavily.com

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::CollaboratorError;

use super::{WebOutcome, WebSearch, WebSnippet};

pub const TAVILY_API_BASE: &str = "https://api.tavily.com";

const DEFAULT_MAX_RESULTS: usize = 3;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    content: String,
}

/// Tavily client implementing [`WebSearch`].
pub struct TavilyClient {
    api_key: Option<Arc<str>>,
    base_url: String,
    max_results: usize,
    client: reqwest::Client,
}

impl TavilyClient {
    /// A missing key is accepted here; `search` then fails with `MissingCredential`.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(Arc::from),
            base_url: TAVILY_API_BASE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str) -> Result<WebOutcome, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingCredential("TAVILY_API_KEY"))?;
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        tracing::debug!(url = %url, query = %query, "tavily search");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({ "query": query, "max_results": self.max_results }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: SearchResponse = response.json().await?;
        let snippets: Vec<WebSnippet> = body
            .results
            .into_iter()
            .filter(|hit| !hit.content.trim().is_empty())
            .map(|hit| WebSnippet {
                title: hit.title,
                url: hit.url,
                content: hit.content.trim().to_string(),
            })
            .collect();
        if snippets.is_empty() {
            Ok(WebOutcome::NoResults)
        } else {
            Ok(WebOutcome::Found(snippets))
        }
    }
}

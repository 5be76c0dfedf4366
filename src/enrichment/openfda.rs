//! OpenFDA drug label client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{ChatError, Result};

use super::{DrugInfo, DrugLookup};

/// Longest search term forwarded to the service.
const MAX_TERM_CHARS: usize = 200;

#[derive(Debug)]
pub struct OpenFdaClient {
    client: Client,
    api_url: String,
}

impl OpenFdaClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChatError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    /// Extracts the `openfda` block of the first result, if any.
    pub fn parse_results(body: &Value) -> Option<DrugInfo> {
        let first = body["results"].as_array()?.first()?;
        let openfda = first
            .get("openfda")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        Some(DrugInfo { openfda })
    }
}

#[async_trait]
impl DrugLookup for OpenFdaClient {
    async fn lookup(&self, term: &str) -> Result<Option<DrugInfo>> {
        let term: String = term.trim().chars().take(MAX_TERM_CHARS).collect();
        debug!("OpenFDA search for {} chars", term.chars().count());

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("search", term.as_str()), ("limit", "1")])
            .send()
            .await?;

        // OpenFDA answers 404 when nothing matches
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ChatError::Upstream {
                status: response.status().as_u16(),
                message: "OpenFDA lookup failed".to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(Self::parse_results(&body))
    }
}

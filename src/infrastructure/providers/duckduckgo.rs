//! DuckDuckGo Instant Answer provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::errors::ProviderError;
use crate::domain::traits::{KnowledgeProvider, LookupResult};

/// Instant Answer API endpoint
pub const API_BASE: &str = "https://api.duckduckgo.com";

/// Instant Answer response, reduced to the fields we read
#[derive(Deserialize, Debug)]
struct InstantAnswer {
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
}

/// DuckDuckGo provider
pub struct DuckDuckGoProvider {
    client: Client,
    api_base: String,
    app_name: String,
}

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        Self::with_api_base(API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn lookup(&self, query: &str) -> Result<LookupResult, ProviderError> {
        let response = self.client
            .get(format!("{}/", self.api_base))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("no_redirect", "1"),
                ("skip_disambig", "1"),
                ("t", self.app_name.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!("status: {}", response.status())));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(LookupResult {
            reference_url: answer.abstract_url,
        })
    }
}

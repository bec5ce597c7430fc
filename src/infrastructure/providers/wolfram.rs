//! Wolfram|Alpha Full Results API provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::application::errors::ProviderError;
use crate::domain::traits::{AnswerPod, AnswerProvider, AnswerSubresult};

/// Full Results API endpoint
pub const API_BASE: &str = "https://api.wolframalpha.com/v2";

#[derive(Deserialize, Debug)]
struct QueryResponse {
    queryresult: QueryResult,
}

#[derive(Deserialize, Debug)]
struct QueryResult {
    #[serde(default)]
    success: bool,
    /// `false`, or an object with `code` and `msg`
    #[serde(default)]
    error: Value,
    #[serde(default)]
    pods: Vec<Pod>,
}

#[derive(Deserialize, Debug)]
struct Pod {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subpods: Vec<Subpod>,
}

#[derive(Deserialize, Debug)]
struct Subpod {
    plaintext: Option<String>,
}

/// Wolfram|Alpha provider
pub struct WolframProvider {
    app_id: String,
    client: Client,
    api_base: String,
}

impl WolframProvider {
    pub fn with_api_base(app_id: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn base_url(&self) -> String {
        format!("{}/query", self.api_base)
    }
}

fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::Object(map) => Some(
            map.get("msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        ),
        other => Some(other.to_string()),
    }
}

impl Pod {
    /// Image-only subpods come back with empty plaintext
    fn into_answer(self) -> AnswerPod {
        AnswerPod {
            title: self.title,
            subresults: self
                .subpods
                .into_iter()
                .map(|s| AnswerSubresult {
                    plain_text: s.plaintext.filter(|t| !t.is_empty()),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl AnswerProvider for WolframProvider {
    fn name(&self) -> &str {
        "wolfram"
    }

    async fn ask(&self, query: &str) -> Result<Vec<AnswerPod>, ProviderError> {
        if self.app_id.is_empty() {
            return Err(ProviderError::MissingCredential(self.name().to_string()));
        }

        let response = self.client
            .get(self.base_url())
            .query(&[
                ("appid", self.app_id.as_str()),
                ("input", query),
                ("output", "json"),
                ("format", "plaintext"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("status: {}, body: {}", status, body)));
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(msg) = error_message(&data.queryresult.error) {
            return Err(ProviderError::Api(msg));
        }
        if !data.queryresult.success {
            tracing::debug!("Wolfram|Alpha did not understand: {}", query);
            return Ok(Vec::new());
        }

        Ok(data.queryresult.pods.into_iter().map(Pod::into_answer).collect())
    }
}

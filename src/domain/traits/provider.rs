use async_trait::async_trait;

use crate::application::errors::ProviderError;

/// Top result of a knowledge lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    /// Empty when the provider found nothing
    pub reference_url: String,
}

/// One structured result returned by the answer provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerPod {
    pub title: String,
    pub subresults: Vec<AnswerSubresult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSubresult {
    pub plain_text: Option<String>,
}

impl AnswerSubresult {
    #[cfg(test)]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            plain_text: Some(text.into()),
        }
    }
}

/// Knowledge-lookup provider (wiki search)
#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, query: &str) -> Result<LookupResult, ProviderError>;
}

/// Computational-answer provider (natural language questions)
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn ask(&self, query: &str) -> Result<Vec<AnswerPod>, ProviderError>;
}

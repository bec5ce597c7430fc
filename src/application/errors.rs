//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command registry errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Trigger already registered: {0}")]
    DuplicateTrigger(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors raised by the knowledge-lookup and answer providers
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing credential for {0}")]
    MissingCredential(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reasons the connection supervisor stops for good
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("{0} offline due to invalid token or bot id")]
    Offline(String),
}

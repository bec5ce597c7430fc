//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Slack, console)
//! - Providers: Knowledge lookup and computational answers

pub mod adapters;
pub mod config;
pub mod providers;

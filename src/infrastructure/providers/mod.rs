//! Answer providers - External lookup services used by the command handlers

pub mod duckduckgo;
pub mod wolfram;

pub use duckduckgo::DuckDuckGoProvider;
pub use wolfram::WolframProvider;

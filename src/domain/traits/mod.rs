//! Domain traits - Abstractions for infrastructure implementations

pub mod backend;
pub mod provider;

pub use backend::ChatBackend;
pub use provider::{AnswerPod, AnswerProvider, AnswerSubresult, KnowledgeProvider, LookupResult};

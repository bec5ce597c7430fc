use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{BackendUser, InboundEvent};

/// Messaging backend abstraction.
///
/// An implementation owns at most one live session. `connect` replaces any
/// existing session with a fresh one.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short platform name used in logs
    fn name(&self) -> &str;

    /// Establish a new session. `Ok(false)` means the backend refused it
    /// (bad credential, unknown bot).
    async fn connect(&mut self) -> Result<bool, BotError>;

    /// Drain the events received since the last read without blocking
    async fn read_events(&mut self) -> Result<Vec<InboundEvent>, BotError>;

    /// Post `text` to `channel` as the bot user
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), BotError>;

    /// List the users known to the backend
    async fn list_users(&self) -> Result<Vec<BackendUser>, BotError>;

    /// Drop the current session, if any
    async fn disconnect(&mut self) {}
}

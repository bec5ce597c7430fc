//! Message dispatcher - Routes a command to its handler and posts the reply

use crate::application::errors::BotError;
use crate::application::services::CommandService;
use crate::domain::traits::ChatBackend;

/// Routes command messages to handlers and posts replies
pub struct MessageDispatcher {
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Handle one message from `channel`.
    ///
    /// Posts exactly one reply when the leading token is a registered
    /// trigger and nothing otherwise. Returns whether a reply was posted;
    /// only backend failures are errors.
    pub async fn dispatch<B>(&self, text: &str, channel: &str, backend: &B) -> Result<bool, BotError>
    where
        B: ChatBackend + ?Sized,
    {
        let Some(response) = self.commands.handle(text).await else {
            tracing::debug!(channel = %channel, "Ignoring message without a known trigger");
            return Ok(false);
        };

        tracing::info!(
            channel = %channel,
            len = response.len(),
            "Sending response: {}",
            first_line(&response)
        );
        backend.post_message(channel, &response).await?;
        Ok(true)
    }
}

/// Log preview of a reply; help output spans many lines
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

use std::sync::Arc;

use crate::application::messaging::parser::split_command;
use crate::application::services::handlers;
use crate::domain::entities::{BotIdentity, Command, CommandRegistry, Handler, ProcessClock};
use crate::domain::traits::{AnswerProvider, KnowledgeProvider};

/// Build the built-in command set for `identity`.
///
/// The mention trigger is only registered when the identity resolved.
pub fn build_registry(identity: &BotIdentity) -> CommandRegistry {
    let name = &identity.display_name;
    let mut commands = vec![
        Command::new("!help", Handler::Help)
            .with_usage("!help [command]")
            .with_description("Displays a list of valid commands"),
        Command::new("!version", Handler::Version)
            .with_description(format!("Show {}'s version", name)),
        Command::new("!wiki", Handler::Wiki)
            .with_usage("!wiki <search phrase>")
            .with_description("returns a single search result from wiki (via DuckDuckGo)"),
        Command::new("!uptime", Handler::Uptime)
            .with_description(format!("Show how long {} has been online", name)),
    ];

    match identity.mention_trigger() {
        Some(trigger) => commands.push(
            Command::new(trigger, Handler::Ask)
                .with_name(name.clone())
                .with_usage(format!("@{} <question>", name))
                .with_description(format!("chat with {}", name)),
        ),
        None => tracing::warn!("{} has no backend id, mention commands are disabled", name),
    }

    let mut registry = CommandRegistry::new();
    extend_registry(&mut registry, commands);
    registry
}

/// Add commands to `registry`, skipping any whose trigger is taken
pub fn extend_registry(registry: &mut CommandRegistry, commands: impl IntoIterator<Item = Command>) {
    for command in commands {
        if let Err(e) = registry.register(command) {
            tracing::warn!("Skipping command: {}", e);
        }
    }
}

/// Shared state the handlers read from
pub struct CommandContext {
    pub identity: BotIdentity,
    pub clock: ProcessClock,
    /// Product name shown by `!version`
    pub product: String,
    pub knowledge: Arc<dyn KnowledgeProvider>,
    pub answers: Option<Arc<dyn AnswerProvider>>,
}

/// Service for resolving and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    context: CommandContext,
}

impl CommandService {
    pub fn new(registry: CommandRegistry, context: CommandContext) -> Self {
        Self { registry, context }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.context.identity
    }

    /// Reply for `text`, or `None` when its leading token isn't a trigger
    pub async fn handle(&self, text: &str) -> Option<String> {
        let (token, _) = split_command(text);
        let command = self.registry.get(token)?;
        tracing::debug!(trigger = %command.trigger, handler = %command.handler, "Running command");
        Some(self.invoke(&command.handler, text).await)
    }

    async fn invoke(&self, handler: &Handler, text: &str) -> String {
        match handler {
            Handler::Help => handlers::help(&self.registry, text),
            Handler::Version => handlers::version(&self.context.product),
            Handler::Uptime => handlers::uptime(&self.context.clock),
            Handler::Wiki => handlers::wiki(self.context.knowledge.as_ref(), text).await,
            Handler::Ask => {
                handlers::ask(self.context.answers.as_deref(), &self.context.identity, text).await
            }
            Handler::Unimplemented(name) => {
                tracing::warn!("No handler named {}", name);
                handlers::NOT_IMPLEMENTED.to_string()
            }
        }
    }
}

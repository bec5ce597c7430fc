use std::collections::HashMap;
use std::fmt;

use crate::application::errors::CommandError;

/// Handler bound to a trigger.
///
/// Built-in commands always map to a concrete variant. `Unimplemented` only
/// appears for config-defined commands naming a handler that doesn't exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    Help,
    Version,
    Wiki,
    Uptime,
    Ask,
    Unimplemented(String),
}

impl Handler {
    /// Resolve a handler by its configured name
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "help" => Handler::Help,
            "version" => Handler::Version,
            "wiki" => Handler::Wiki,
            "uptime" => Handler::Uptime,
            "ask" => Handler::Ask,
            _ => Handler::Unimplemented(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Handler::Help => "help",
            Handler::Version => "version",
            Handler::Wiki => "wiki",
            Handler::Uptime => "uptime",
            Handler::Ask => "ask",
            Handler::Unimplemented(name) => name,
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents a bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Leading token that selects this command, e.g. `!wiki` or `<@U123>`
    pub trigger: String,
    /// Bare name accepted by `!help <name>`
    pub name: String,
    pub usage: String,
    pub description: String,
    pub handler: Handler,
}

impl Command {
    pub fn new(trigger: impl Into<String>, handler: Handler) -> Self {
        let trigger = trigger.into();
        let name = trigger.trim_start_matches(['!', '@']).to_string();
        Self {
            usage: trigger.clone(),
            trigger,
            name,
            description: String::new(),
            handler,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Whether a help argument refers to this command.
    ///
    /// Accepts the bare name with or without its leading marker, or the
    /// full trigger.
    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        let bare = input_lower.trim_start_matches(['!', '@']);
        self.trigger.to_lowercase() == input_lower || self.name.to_lowercase() == bare
    }

    /// One line of help output
    pub fn help_line(&self) -> String {
        format!("{} — {}", self.usage, self.description)
    }
}

/// Trigger-keyed command registry.
///
/// Iteration follows registration order so help output is stable.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        if self.commands.contains_key(&command.trigger) {
            return Err(CommandError::DuplicateTrigger(command.trigger));
        }
        self.order.push(command.trigger.clone());
        self.commands.insert(command.trigger.clone(), command);
        Ok(())
    }

    pub fn get(&self, trigger: &str) -> Option<&Command> {
        self.commands.get(trigger)
    }

    /// Find the command a help argument refers to
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.all().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|t| self.commands.get(t))
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

}

#[cfg(test)]
impl CommandRegistry {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

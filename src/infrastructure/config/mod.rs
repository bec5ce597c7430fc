//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::domain::entities::{Command, Handler};
use crate::infrastructure::adapters::slack;
use crate::infrastructure::providers::{duckduckgo, wolfram};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub slack: SlackConfig,
    pub providers: ProvidersConfig,
    pub supervisor: SupervisorConfig,
    pub commands: Vec<CommandConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    /// Display name the bot is registered under on the backend
    pub name: String,
    /// Product name shown by `!version`
    pub product: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SlackConfig {
    pub token: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProvidersConfig {
    pub duckduckgo: DuckDuckGoConfig,
    pub wolfram: WolframConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DuckDuckGoConfig {
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WolframConfig {
    pub app_id: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SupervisorConfig {
    pub poll_interval_ms: u64,
}

/// Extra trigger bound to a handler by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandConfig {
    pub trigger: String,
    pub handler: String,
    pub usage: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "devbot".to_string(),
            product: "Botbot".to_string(),
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: slack::API_BASE.to_string(),
        }
    }
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            api_base: duckduckgo::API_BASE.to_string(),
        }
    }
}

impl Default for WolframConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_base: wolfram::API_BASE.to_string(),
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Overlay environment variables on top of this config
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = var("SLACK_BOT_TOKEN").filter(|t| !t.is_empty()) {
            self.slack.token = Some(token);
        }

        if let Some(app_id) = var("WA_TOKEN").filter(|t| !t.is_empty()) {
            self.providers.wolfram.app_id = Some(app_id);
        }

        if let Some(name) = var("BOT_NAME").filter(|n| !n.is_empty()) {
            self.bot.name = name;
        }

        if let Some(interval) = var("BOT_POLL_INTERVAL_MS") {
            match interval.parse::<u64>() {
                Ok(ms) if ms > 0 => self.supervisor.poll_interval_ms = ms,
                _ => tracing::warn!("Ignoring invalid BOT_POLL_INTERVAL_MS: {}", interval),
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.name must not be empty".to_string()));
        }
        if self.supervisor.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "supervisor.poll-interval-ms must be positive".to_string(),
            ));
        }
        let bad_trigger = self
            .commands
            .iter()
            .find(|c| c.trigger.is_empty() || c.trigger.contains(char::is_whitespace));
        if let Some(cmd) = bad_trigger {
            return Err(ConfigError::InvalidValue(format!(
                "command trigger {:?} must be a single word",
                cmd.trigger
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.supervisor.poll_interval_ms)
    }

    /// Config-defined commands, ready to register
    pub fn extra_commands(&self) -> Vec<Command> {
        self.commands
            .iter()
            .map(|c| {
                let command = Command::new(c.trigger.clone(), Handler::from_name(&c.handler))
                    .with_description(c.description.clone());
                match &c.usage {
                    Some(usage) => command.with_usage(usage.clone()),
                    None => command,
                }
            })
            .collect()
    }
}

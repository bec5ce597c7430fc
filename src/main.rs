use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

mod application;
mod domain;
mod infrastructure;

use application::errors::SupervisorError;
use application::messaging::MessageDispatcher;
use application::services::{build_registry, extend_registry, resolve_identity, CommandContext, CommandService};
use application::supervisor::ConnectionSupervisor;
use domain::entities::ProcessClock;
use domain::traits::{AnswerProvider, ChatBackend, KnowledgeProvider};
use infrastructure::adapters::{ConsoleAdapter, SlackAdapter};
use infrastructure::config::Config;
use infrastructure::providers::{DuckDuckGoProvider, WolframProvider};

#[derive(Parser)]
#[command(name = "botbot")]
#[command(about = "A Slack assistant for wiki lookups and quick answers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Slack bot token (overrides config and SLACK_BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("botbot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(),
    }
}

fn load_config(config_path: &str) -> Config {
    if !std::path::Path::new(config_path).exists() {
        return Config::load_env();
    }

    Config::load(config_path)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
        .with_env()
}

fn run_bot(config_path: &str, token_override: Option<String>) -> ExitCode {
    let clock = ProcessClock::start();

    let mut config = load_config(config_path);
    if let Some(token) = token_override {
        config.slack.token = Some(token);
    }

    tracing::info!("Starting botbot: {}", config.bot.name);

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        match config.slack.token.clone() {
            Some(token) => {
                let slack = SlackAdapter::with_api_base(token, &config.slack.api_base);
                run_with_backend(slack, &config, clock).await
            }
            None => {
                // Run console bot (dev mode)
                tracing::warn!("SLACK_BOT_TOKEN not set, using console mode");
                run_with_backend(ConsoleAdapter::new(&config.bot.name), &config, clock).await
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_with_backend<B: ChatBackend>(
    backend: B,
    config: &Config,
    clock: ProcessClock,
) -> Result<(), SupervisorError> {
    let identity = resolve_identity(&backend, &config.bot.name).await;

    let mut registry = build_registry(&identity);
    extend_registry(&mut registry, config.extra_commands());
    tracing::info!(
        "Registered commands: {}",
        registry.triggers().collect::<Vec<_>>().join(", ")
    );

    let knowledge: Arc<dyn KnowledgeProvider> =
        Arc::new(DuckDuckGoProvider::with_api_base(&config.providers.duckduckgo.api_base));

    let wolfram = &config.providers.wolfram;
    let answers: Option<Arc<dyn AnswerProvider>> = match &wolfram.app_id {
        Some(app_id) => Some(Arc::new(WolframProvider::with_api_base(app_id, &wolfram.api_base))),
        None => {
            tracing::warn!("WA_TOKEN not set, questions will go unanswered");
            None
        }
    };

    let commands = CommandService::new(
        registry,
        CommandContext {
            identity,
            clock,
            product: config.bot.product.clone(),
            knowledge,
            answers,
        },
    );

    let mut supervisor = ConnectionSupervisor::new(backend, MessageDispatcher::new(commands))
        .with_poll_interval(config.poll_interval());

    let result = supervisor.run_until(shutdown_signal()).await;
    tracing::info!(
        "Supervisor stopped ({}, {} reconnects)",
        supervisor.state(),
        supervisor.reconnects()
    );
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl-C"),
        Err(e) => {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

fn init_config() -> ExitCode {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to render config: {}", e);
            ExitCode::FAILURE
        }
    }
}

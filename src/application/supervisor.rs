//! Connection supervisor - Keeps the bot connected and polling
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> (failure) -> Disconnected -> Connecting ...
//! ```
//!
//! A refused connect is final. Any failure while connected tears the session
//! down and restarts from `Connecting` after one poll interval, forever.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::application::errors::{BotError, SupervisorError};
use crate::application::messaging::{parse_events, MessageDispatcher};
use crate::domain::traits::ChatBackend;

/// Delay between reads, and before every reconnect
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Owns the backend session and drives the poll loop
pub struct ConnectionSupervisor<B: ChatBackend> {
    backend: B,
    dispatcher: MessageDispatcher,
    poll_interval: Duration,
    state: ConnectionState,
    reconnects: u64,
}

impl<B: ChatBackend> ConnectionSupervisor<B> {
    pub fn new(backend: B, dispatcher: MessageDispatcher) -> Self {
        Self {
            backend,
            dispatcher,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: ConnectionState::Disconnected,
            reconnects: 0,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of restarts after a failed poll cycle
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run until the backend refuses a connection
    #[cfg(test)]
    pub async fn run(&mut self) -> Result<(), SupervisorError> {
        self.supervise().await
    }

    /// Run until the backend refuses a connection or `shutdown` resolves
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), SupervisorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let outcome = tokio::select! {
            result = self.supervise() => Some(result),
            _ = &mut shutdown => None,
        };

        match outcome {
            Some(result) => result,
            None => {
                tracing::info!("Shutting down {} session", self.backend.name());
                self.backend.disconnect().await;
                self.set_state(ConnectionState::Disconnected);
                Ok(())
            }
        }
    }

    async fn supervise(&mut self) -> Result<(), SupervisorError> {
        let bot_name = self.dispatcher.commands().identity().display_name.clone();

        loop {
            self.set_state(ConnectionState::Connecting);
            match self.backend.connect().await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::error!("{} offline due to invalid token or bot id", bot_name);
                    self.set_state(ConnectionState::Disconnected);
                    return Err(SupervisorError::Offline(bot_name));
                }
                Err(e) => {
                    tracing::error!(error = %e, "{} offline due to invalid token or bot id", bot_name);
                    self.set_state(ConnectionState::Disconnected);
                    return Err(SupervisorError::Offline(bot_name));
                }
            }

            self.set_state(ConnectionState::Connected);
            tracing::info!(
                "{} activated and online... ({})",
                bot_name,
                self.dispatcher.commands().identity()
            );

            let error = self.poll().await;
            tracing::warn!(error = %error, "Disconnected! Reconnecting...");
            self.backend.disconnect().await;
            self.set_state(ConnectionState::Disconnected);
            self.reconnects += 1;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Poll until a cycle fails, returning the failure
    async fn poll(&mut self) -> BotError {
        loop {
            if let Err(e) = self.poll_once().await {
                return e;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One read-parse-dispatch cycle
    pub async fn poll_once(&mut self) -> Result<(), BotError> {
        let events = self.backend.read_events().await?;
        if let (Some(text), Some(channel)) = parse_events(&events) {
            self.dispatcher.dispatch(text, channel, &self.backend).await?;
        }
        Ok(())
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            tracing::debug!("Connection state: {} -> {}", self.state, state);
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::services::{build_registry, CommandContext, CommandService};
    use crate::application::test_support::{ScriptedBackend, StubAnswers, StubKnowledge};
    use crate::domain::entities::{BotIdentity, InboundEvent, ProcessClock};

    const TEST_INTERVAL: Duration = Duration::from_millis(1);

    fn supervisor(backend: ScriptedBackend) -> ConnectionSupervisor<ScriptedBackend> {
        let identity = BotIdentity::resolved("devbot", "U42");
        let registry = build_registry(&identity);
        let dispatcher = MessageDispatcher::new(CommandService::new(
            registry,
            CommandContext {
                identity,
                clock: ProcessClock::start(),
                product: "Botbot".to_string(),
                knowledge: Arc::new(StubKnowledge::found("https://example.org/wiki/Rust")),
                answers: Some(Arc::new(StubAnswers::failing())),
            },
        ));
        ConnectionSupervisor::new(backend, dispatcher).with_poll_interval(TEST_INTERVAL)
    }

    async fn run_script(
        supervisor: &mut ConnectionSupervisor<ScriptedBackend>,
    ) -> Result<(), SupervisorError> {
        let exhausted = supervisor.backend().exhausted();
        tokio::time::timeout(
            Duration::from_secs(5),
            supervisor.run_until(async move { exhausted.notified().await }),
        )
        .await
        .expect("supervisor did not stop")
    }

    #[tokio::test]
    async fn test_read_failure_reconnects_once_then_resumes() {
        let backend = ScriptedBackend::new()
            .then_read(vec![InboundEvent::message("!wiki rust", "C1")])
            .then_read_error("socket reset")
            .then_read(vec![InboundEvent::message("!wiki rust", "C2")]);
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        run_script(&mut supervisor).await.unwrap();

        let stats = stats.lock().unwrap().clone();
        assert_eq!(stats.connect_calls, 2);
        assert_eq!(supervisor.reconnects(), 1);
        assert_eq!(
            &stats.log[..8],
            &["connect", "read", "post", "read", "disconnect", "connect", "read", "post"]
        );
        let channels: Vec<&str> = stats.posts.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(channels, vec!["C1", "C2"]);
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_refused_connect_stops_without_retry() {
        let backend = ScriptedBackend::new().then_connect(Ok(false));
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        let result = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
            .await
            .expect("supervisor did not stop");

        assert!(matches!(result, Err(SupervisorError::Offline(name)) if name == "devbot"));
        let stats = stats.lock().unwrap().clone();
        assert_eq!(stats.connect_calls, 1);
        assert_eq!(stats.read_calls, 0);
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_error_is_offline() {
        let backend = ScriptedBackend::new()
            .then_connect(Err(BotError::Network("dns failure".to_string())));
        let mut supervisor = supervisor(backend);

        let result = run_script(&mut supervisor).await;

        assert!(matches!(result, Err(SupervisorError::Offline(_))));
    }

    #[tokio::test]
    async fn test_refused_reconnect_stops() {
        let backend = ScriptedBackend::new()
            .then_connect(Ok(true))
            .then_connect(Ok(false))
            .then_read_error("socket reset");
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        let result = run_script(&mut supervisor).await;

        assert!(result.is_err());
        assert_eq!(stats.lock().unwrap().connect_calls, 2);
    }

    #[tokio::test]
    async fn test_post_failure_triggers_reconnect() {
        let backend = ScriptedBackend::new()
            .then_read(vec![InboundEvent::message("!version", "C1")])
            .failing_posts();
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        run_script(&mut supervisor).await.unwrap();

        let stats = stats.lock().unwrap().clone();
        assert_eq!(stats.connect_calls, 2);
        assert!(stats.posts.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_commands_keep_polling() {
        let backend = ScriptedBackend::new()
            .then_read(vec![InboundEvent::message("good morning", "C1")])
            .then_read(Vec::new())
            .then_read(vec![InboundEvent::new(None, Some("C1".to_string()))]);
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        run_script(&mut supervisor).await.unwrap();

        let stats = stats.lock().unwrap().clone();
        assert_eq!(stats.connect_calls, 1);
        assert!(stats.posts.is_empty());
        assert!(stats.read_calls >= 4);
    }

    #[tokio::test]
    async fn test_event_without_channel_is_ignored() {
        let backend = ScriptedBackend::new()
            .then_read(vec![InboundEvent::new(Some("!version".to_string()), None)]);
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        run_script(&mut supervisor).await.unwrap();

        assert!(stats.lock().unwrap().posts.is_empty());
    }

    #[tokio::test]
    async fn test_poll_once_dispatches_first_message() {
        let backend = ScriptedBackend::new().then_read(vec![
            InboundEvent::new(None, Some("C1".to_string())),
            InboundEvent::message("!wiki rust", "C2"),
            InboundEvent::message("!version", "C3"),
        ]);
        let stats = backend.stats_handle();
        let mut supervisor = supervisor(backend);

        supervisor.poll_once().await.unwrap();

        assert_eq!(
            stats.lock().unwrap().posts,
            vec![("C2".to_string(), "https://example.org/wiki/Rust".to_string())]
        );
    }
}

//! Console adapter for development/testing

use std::io::BufRead;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{BackendUser, InboundEvent};
use crate::domain::traits::ChatBackend;

/// Channel name console messages arrive on
pub const CONSOLE_CHANNEL: &str = "console";

/// Backend id the bot gets on the console
pub const CONSOLE_BOT_ID: &str = "console";

/// Console backend: stdin lines in, printed replies out
pub struct ConsoleAdapter {
    bot_name: String,
    receiver: Option<mpsc::Receiver<String>>,
}

impl ConsoleAdapter {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            receiver: None,
        }
    }

    /// Feed lines from `receiver` instead of stdin
    #[cfg(test)]
    pub fn with_receiver(mut self, receiver: mpsc::Receiver<String>) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Read `input` line by line on a dedicated OS thread.
    ///
    /// A read blocked on the terminal must never hold the runtime open at shutdown.
    fn spawn_line_reader<R>(input: R) -> mpsc::Receiver<String>
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(32);
        let spawned = std::thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || {
                for line in input.lines() {
                    match line {
                        Ok(line) => {
                            if sender.blocking_send(line).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Failed to read console input: {}", e);
                            return;
                        }
                    }
                }
                tracing::info!("Console input closed");
            });
        if let Err(e) = spawned {
            tracing::error!("Failed to start console reader: {}", e);
        }
        receiver
    }
}

#[async_trait]
impl ChatBackend for ConsoleAdapter {
    fn name(&self) -> &str {
        "console"
    }

    async fn connect(&mut self) -> Result<bool, BotError> {
        if self.receiver.is_none() {
            tracing::info!("Starting console bot (dev mode), mention with <@{}>", CONSOLE_BOT_ID);
            let stdin = std::io::BufReader::new(std::io::stdin());
            self.receiver = Some(Self::spawn_line_reader(stdin));
        }
        Ok(true)
    }

    async fn read_events(&mut self) -> Result<Vec<InboundEvent>, BotError> {
        let receiver = self.receiver
            .as_mut()
            .ok_or_else(|| BotError::Internal("Console not connected".to_string()))?;

        // One line per read so queued commands each get their own poll cycle
        while let Ok(line) = receiver.try_recv() {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(vec![InboundEvent::message(line, CONSOLE_CHANNEL)]);
            }
        }
        Ok(Vec::new())
    }

    async fn post_message(&self, _channel: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<BackendUser>, BotError> {
        Ok(vec![BackendUser::new(CONSOLE_BOT_ID, self.bot_name.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_become_console_events() {
        let (sender, receiver) = mpsc::channel(8);
        let mut console = ConsoleAdapter::new("devbot").with_receiver(receiver);
        assert!(console.connect().await.unwrap());

        sender.send("!uptime".to_string()).await.unwrap();
        sender.send("   ".to_string()).await.unwrap();
        sender.send(" <@console> 2+2 ".to_string()).await.unwrap();

        assert_eq!(
            console.read_events().await.unwrap(),
            vec![InboundEvent::message("!uptime", CONSOLE_CHANNEL)]
        );
        assert_eq!(
            console.read_events().await.unwrap(),
            vec![InboundEvent::message("<@console> 2+2", CONSOLE_CHANNEL)]
        );
        assert!(console.read_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queued_lines_are_read_one_at_a_time() {
        let (sender, receiver) = mpsc::channel(8);
        let mut console = ConsoleAdapter::new("devbot").with_receiver(receiver);
        for line in ["!help", "!version", "!uptime"] {
            sender.send(line.to_string()).await.unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..4 {
            for event in console.read_events().await.unwrap() {
                seen.push(event.text.unwrap());
            }
        }
        assert_eq!(seen, vec!["!help", "!version", "!uptime"]);
    }

    #[tokio::test]
    async fn test_line_reader_forwards_input() {
        let input = std::io::Cursor::new("!help\n!wiki rust\n");
        let mut receiver = ConsoleAdapter::spawn_line_reader(input);

        assert_eq!(receiver.recv().await.as_deref(), Some("!help"));
        assert_eq!(receiver.recv().await.as_deref(), Some("!wiki rust"));
        assert_eq!(receiver.recv().await, None);
    }

    /// Input that never produces a byte, like an idle terminal
    struct IdleInput(std::sync::mpsc::Receiver<()>);

    impl std::io::Read for IdleInput {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_blocked_reader_does_not_hold_runtime_open() {
        let (keep_blocked, idle) = std::sync::mpsc::channel::<()>();
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let receiver = rt.block_on(async {
                ConsoleAdapter::spawn_line_reader(std::io::BufReader::new(IdleInput(idle)))
            });
            drop(rt);
            drop(receiver);
            let _ = done_tx.send(());
        });

        assert!(done_rx.recv_timeout(std::time::Duration::from_secs(5)).is_ok());
        drop(keep_blocked);
    }

    #[tokio::test]
    async fn test_closed_input_reads_empty() {
        let (sender, receiver) = mpsc::channel(8);
        let mut console = ConsoleAdapter::new("devbot").with_receiver(receiver);
        drop(sender);
        assert!(console.read_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bot_is_listed_as_user() {
        let console = ConsoleAdapter::new("devbot");
        let users = console.list_users().await.unwrap();
        assert_eq!(users, vec![BackendUser::new("console", "devbot")]);
    }
}

//! In-memory backend and providers for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::errors::{BotError, ProviderError};
use crate::domain::entities::{BackendUser, InboundEvent};
use crate::domain::traits::{AnswerPod, AnswerProvider, ChatBackend, KnowledgeProvider, LookupResult};

/// Counters and call log recorded by [`ScriptedBackend`]
#[derive(Debug, Default, Clone)]
pub struct BackendStats {
    pub connect_calls: usize,
    pub read_calls: usize,
    pub list_users_calls: usize,
    pub posts: Vec<(String, String)>,
    /// `connect`, `read`, `post` and `disconnect` in call order
    pub log: Vec<&'static str>,
}

/// Backend that replays a fixed script of connect and read outcomes.
///
/// Once the read script runs out it signals `exhausted` and returns empty
/// batches.
pub struct ScriptedBackend {
    users: Vec<BackendUser>,
    list_users_fails: bool,
    connects: VecDeque<Result<bool, BotError>>,
    reads: VecDeque<Result<Vec<InboundEvent>, BotError>>,
    fail_posts: bool,
    stats: Arc<Mutex<BackendStats>>,
    exhausted: Arc<Notify>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            list_users_fails: false,
            connects: VecDeque::new(),
            reads: VecDeque::new(),
            fail_posts: false,
            stats: Arc::new(Mutex::new(BackendStats::default())),
            exhausted: Arc::new(Notify::new()),
        }
    }

    pub fn with_users(mut self, users: Vec<BackendUser>) -> Self {
        self.users = users;
        self
    }

    pub fn failing_list_users(mut self) -> Self {
        self.list_users_fails = true;
        self
    }

    /// Queue a connect outcome; connects succeed once the queue is empty
    pub fn then_connect(mut self, result: Result<bool, BotError>) -> Self {
        self.connects.push_back(result);
        self
    }

    pub fn then_read(mut self, events: Vec<InboundEvent>) -> Self {
        self.reads.push_back(Ok(events));
        self
    }

    pub fn then_read_error(mut self, message: &str) -> Self {
        self.reads.push_back(Err(BotError::Network(message.to_string())));
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn stats(&self) -> BackendStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn stats_handle(&self) -> Arc<Mutex<BackendStats>> {
        Arc::clone(&self.stats)
    }

    pub fn exhausted(&self) -> Arc<Notify> {
        Arc::clone(&self.exhausted)
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn connect(&mut self) -> Result<bool, BotError> {
        {
            let mut stats = self.stats.lock().unwrap();
            stats.connect_calls += 1;
            stats.log.push("connect");
        }
        self.connects.pop_front().unwrap_or(Ok(true))
    }

    async fn read_events(&mut self) -> Result<Vec<InboundEvent>, BotError> {
        {
            let mut stats = self.stats.lock().unwrap();
            stats.read_calls += 1;
            stats.log.push("read");
        }
        match self.reads.pop_front() {
            Some(result) => result,
            None => {
                self.exhausted.notify_one();
                Ok(Vec::new())
            }
        }
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), BotError> {
        let mut stats = self.stats.lock().unwrap();
        stats.log.push("post");
        if self.fail_posts {
            return Err(BotError::Network("post failed".to_string()));
        }
        stats.posts.push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<BackendUser>, BotError> {
        self.stats.lock().unwrap().list_users_calls += 1;
        if self.list_users_fails {
            return Err(BotError::Auth("invalid_auth".to_string()));
        }
        Ok(self.users.clone())
    }

    async fn disconnect(&mut self) {
        self.stats.lock().unwrap().log.push("disconnect");
    }
}

/// Knowledge provider returning a canned result
pub struct StubKnowledge {
    url: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl StubKnowledge {
    pub fn found(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::found("")
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeProvider for StubKnowledge {
    fn name(&self) -> &str {
        "stub"
    }

    async fn lookup(&self, query: &str) -> Result<LookupResult, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.url {
            Some(url) => Ok(LookupResult {
                reference_url: url.clone(),
            }),
            None => Err(ProviderError::Network("connection refused".to_string())),
        }
    }
}

/// Answer provider returning canned pods
pub struct StubAnswers {
    pods: Option<Vec<AnswerPod>>,
    queries: Mutex<Vec<String>>,
}

impl StubAnswers {
    pub fn pods(pods: Vec<AnswerPod>) -> Self {
        Self {
            pods: Some(pods),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            pods: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerProvider for StubAnswers {
    fn name(&self) -> &str {
        "stub"
    }

    async fn ask(&self, query: &str) -> Result<Vec<AnswerPod>, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.pods
            .clone()
            .ok_or_else(|| ProviderError::Api("did not understand input".to_string()))
    }
}

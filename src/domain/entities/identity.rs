use std::fmt;

/// The bot's own identity on the messaging backend.
///
/// Resolved once at startup; `backend_id` stays `None` when no user with the
/// configured display name could be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub display_name: String,
    pub backend_id: Option<String>,
}

impl BotIdentity {
    pub fn resolved(display_name: impl Into<String>, backend_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            backend_id: Some(backend_id.into()),
        }
    }

    pub fn unresolved(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            backend_id: None,
        }
    }

    #[cfg(test)]
    pub fn is_resolved(&self) -> bool {
        self.backend_id.is_some()
    }

    /// Trigger token users type to address the bot directly, e.g. `<@U024BE7LH>`
    pub fn mention_trigger(&self) -> Option<String> {
        self.backend_id.as_ref().map(|id| format!("<@{}>", id))
    }
}

impl fmt::Display for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend_id {
            Some(id) => write!(f, "{} ({})", self.display_name, id),
            None => write!(f, "{} (unresolved)", self.display_name),
        }
    }
}

/// A user entry as reported by the backend's user directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUser {
    pub id: String,
    pub name: String,
}

impl BackendUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

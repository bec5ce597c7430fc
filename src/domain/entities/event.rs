/// One raw event received from the backend.
///
/// Only events carrying text are actionable; `channel` is the origin the
/// reply goes back to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundEvent {
    pub text: Option<String>,
    pub channel: Option<String>,
}

impl InboundEvent {
    pub fn new(text: Option<String>, channel: Option<String>) -> Self {
        Self { text, channel }
    }

    pub fn message(text: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            channel: Some(channel.into()),
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.text.is_some()
    }
}

//! Message parser - Pulls commands out of raw backend events

use crate::domain::entities::InboundEvent;

/// First event in `events` that carries text, paired with its channel.
///
/// Returns `(None, None)` when no event has text.
pub fn parse_events(events: &[InboundEvent]) -> (Option<&str>, Option<&str>) {
    events
        .iter()
        .find(|e| e.is_actionable())
        .map(|e| (e.text.as_deref(), e.channel.as_deref()))
        .unwrap_or((None, None))
}

/// Split `text` at its first whitespace into the trigger token and the rest
pub fn split_command(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest),
        None => (text, ""),
    }
}

//! Command handlers - Each computes the reply text for one command
//!
//! Handlers receive the full message text, trigger included, and never fail:
//! user mistakes and provider errors both turn into a fixed reply.

use crate::application::services::uptime::format_duration;
use crate::domain::entities::{BotIdentity, Command, CommandRegistry, ProcessClock};
use crate::domain::traits::{AnswerPod, AnswerProvider, KnowledgeProvider};

pub const NOT_IMPLEMENTED: &str = "function not implemented";
pub const MISSING_QUERY: &str = "?";
pub const NO_RESULTS: &str = "No results found";
pub const LOOKUP_UNAVAILABLE: &str = "Lookup is unavailable right now";
pub const MISSING_QUESTION: &str = "Sir ?";
pub const NO_ANSWER: &str = "Sir, I don't have an answer for that";

/// Credit line the answer provider uses when asked who built it
const PROVIDER_CREDIT: &str = "Stephen Wolfram and his team";

fn arguments(text: &str) -> Vec<&str> {
    text.split_whitespace().skip(1).collect()
}

/// `!help [command]`
pub fn help(registry: &CommandRegistry, text: &str) -> String {
    match arguments(text).first() {
        None => registry
            .all()
            .map(Command::help_line)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(name) => registry
            .find(name)
            .map(Command::help_line)
            .unwrap_or_default(),
    }
}

/// `!version`
pub fn version(product: &str) -> String {
    format!("{} {}", product, env!("CARGO_PKG_VERSION"))
}

/// `!uptime`
pub fn uptime(clock: &ProcessClock) -> String {
    format_duration(clock.elapsed_secs())
}

/// `!wiki <phrase>`
///
/// Phrases of several words are searched as `wiki <phrase>` so the lookup
/// favors encyclopedia entries; a single word is searched as-is.
pub async fn wiki(provider: &dyn KnowledgeProvider, text: &str) -> String {
    let words = arguments(text);
    let query = match words.as_slice() {
        [] => return MISSING_QUERY.to_string(),
        [word] => word.to_string(),
        _ => format!("wiki {}", words.join(" ")),
    };

    match provider.lookup(&query).await {
        Ok(result) if !result.reference_url.is_empty() => result.reference_url,
        Ok(_) => NO_RESULTS.to_string(),
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "Lookup failed");
            LOOKUP_UNAVAILABLE.to_string()
        }
    }
}

/// `@<bot> <question>`
///
/// The answer is the first plain-text subresult of the second pod; the
/// first pod only echoes how the question was interpreted.
pub async fn ask(
    provider: Option<&dyn AnswerProvider>,
    identity: &BotIdentity,
    text: &str,
) -> String {
    let words = arguments(text);
    if words.is_empty() {
        return MISSING_QUESTION.to_string();
    }

    let Some(provider) = provider else {
        tracing::warn!("No answer provider configured");
        return NO_ANSWER.to_string();
    };

    match provider.ask(&words.join(" ")).await {
        Ok(pods) => pods
            .get(1)
            .and_then(first_plain_text)
            .map(|answer| credit(answer, &identity.display_name))
            .unwrap_or_else(|| NO_ANSWER.to_string()),
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "Question failed");
            NO_ANSWER.to_string()
        }
    }
}

fn first_plain_text(pod: &AnswerPod) -> Option<&str> {
    pod.subresults
        .iter()
        .find_map(|sub| sub.plain_text.as_deref().filter(|t| !t.is_empty()))
}

fn credit(answer: &str, bot_name: &str) -> String {
    answer.replace(PROVIDER_CREDIT, &format!("{} & {}", bot_name, PROVIDER_CREDIT))
}

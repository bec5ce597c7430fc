use crate::domain::entities::BotIdentity;
use crate::domain::traits::ChatBackend;

/// Look up the bot's backend id by display name.
///
/// Makes a single `list_users` call. Any failure leaves the identity
/// unresolved; there is no retry.
pub async fn resolve_identity<B>(backend: &B, display_name: &str) -> BotIdentity
where
    B: ChatBackend + ?Sized,
{
    let users = match backend.list_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "could not find bot user with the name {}", display_name);
            return BotIdentity::unresolved(display_name);
        }
    };

    match users.into_iter().find(|u| u.name == display_name) {
        Some(user) => {
            tracing::info!("Resolved {} to backend id {}", display_name, user.id);
            BotIdentity::resolved(display_name, user.id)
        }
        None => {
            tracing::warn!("could not find bot user with the name {}", display_name);
            BotIdentity::unresolved(display_name)
        }
    }
}

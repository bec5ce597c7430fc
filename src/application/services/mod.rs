//! Application services - Identity, commands and their handlers

pub mod command_service;
pub mod handlers;
pub mod identity_service;
pub mod uptime;

pub use command_service::{build_registry, extend_registry, CommandContext, CommandService};
pub use identity_service::resolve_identity;

//! Domain entities - Core objects shared by the application layer

pub mod clock;
pub mod command;
pub mod event;
pub mod identity;

pub use clock::ProcessClock;
pub use command::{Command, CommandRegistry, Handler};
pub use event::InboundEvent;
pub use identity::{BackendUser, BotIdentity};

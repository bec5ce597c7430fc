//! Message handling - Event parsing and command dispatch

pub mod dispatcher;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use parser::parse_events;

//! Domain layer - Core bot concepts with no I/O
//! 
//! This layer contains:
//! - Entities: Identity, commands, inbound events, the process clock
//! - Traits: Abstractions for the messaging backend and answer providers

pub mod entities;
pub mod traits;

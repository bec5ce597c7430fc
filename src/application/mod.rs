//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Identity resolution, command registry and handlers
//! - Messaging: Event parsing and command dispatch
//! - Supervisor: The connection-resilience poll loop
//! - Errors: Domain-specific errors

pub mod errors;
pub mod messaging;
pub mod services;
pub mod supervisor;

#[cfg(test)]
pub mod test_support;

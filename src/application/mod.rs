//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Business logic orchestration and view building
//! - Errors: Domain-specific errors
//! - Messaging: Callback/command parsing and dispatching

pub mod errors;
pub mod messaging;
pub mod services;

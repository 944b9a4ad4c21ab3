//! HTTP API Handlers
//!
//! One submodule per domain, wired together in [`router`].

// Core modules
pub mod router;
pub mod state;
pub mod types;

// Health and metrics
pub mod health;

// Document operations
pub mod documents;
pub mod quiz;
pub mod tts;

// Study assistant
pub mod chatbot;

// Accounts
pub mod users;

// Test utilities (compiled only in test builds)
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use router::{build_protected_routes, build_public_routes, build_router, AppState};
pub use state::AppContext;
pub use types::*;

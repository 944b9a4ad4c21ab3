//! EduNeuro Library
//!
//! Document accessibility server for readers with dyslexia or ADHD.
//! Uploaded PDF and text documents can be summarized, highlighted, simplified,
//! narrated and turned into quizzes.
//!
//! # Key Features
//! - Optional OpenAI-compatible language model for every text operation
//! - Deterministic rule-based fallbacks that never return an empty result
//! - RocksDB storage for documents, cached summaries and quizzes
//! - Prometheus metrics and structured tracing

pub mod accounts;
pub mod auth;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod processing;
pub mod speech;
pub mod storage;
pub mod tracing_setup;
pub mod validation;

// Re-export dependencies to ensure tests use the same version
pub use chrono;
pub use uuid;

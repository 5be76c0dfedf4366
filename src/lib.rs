//! DocIA - Medical-assistant chat gateway
//!
//! Answers chat requests through an external LLM with response caching,
//! retry with backoff, optional drug-information enrichment and
//! best-effort conversation persistence.

pub mod api;
pub mod cache;
pub mod chat;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod models;
pub mod persistence;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{ChatError, Result};
pub use tasks::spawn_cleanup_task;

//! Request and Response models for the chat gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{Attachment, ChatRequest, ChatTurn, Role, MISSING_MESSAGES};
pub use responses::{
    ChatResponse, ErrorResponse, EvictResponse, HealthResponse, ResponseMetadata, StatsResponse,
};

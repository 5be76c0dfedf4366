//! API Module
//!
//! HTTP handlers and routing for the chat gateway REST API.
//!
//! # Endpoints
//! - `POST /api/chat` - Answer a conversation (JSON or multipart)
//! - `GET /stats` - Get response cache statistics
//! - `DELETE /cache` - Clear the response cache
//! - `DELETE /cache/:key` - Evict one cached response
//! - `GET /health` - Health check endpoint
//!
//! Every endpoint but `/health` requires a session.

pub mod handlers;
pub mod payload;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

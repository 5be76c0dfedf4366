//! Chat Module
//!
//! Request orchestration and response assembly for the chat endpoint.

mod service;
mod suggestions;

pub use service::{
    assemble_response, build_turns, ChatService, ChatSettings, DEFAULT_CONFIDENCE,
    HISTORY_WINDOW, KNOWLEDGE_BASE_SOURCE, LLM_SOURCE,
};
pub use suggestions::{suggest_for, MAX_SUGGESTIONS};

//! Request DTOs for the chat gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

/// Localized message returned when a chat request carries no usable turn.
pub const MISSING_MESSAGES: &str = "Messages requis";

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// File uploaded alongside a user turn.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    /// Client-side file name
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    /// Images and PDFs are sent to the model; other files are only counted.
    pub fn is_forwardable(&self) -> bool {
        self.mime_type.starts_with("image/") || self.is_pdf()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    /// Only set from multipart uploads, never from JSON
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Request body for the chat endpoint (POST /api/chat)
///
/// Sent either as JSON or as `multipart/form-data` with the same fields plus
/// `file_*` parts.
///
/// # Fields
/// - `messages`: Ordered conversation turns, oldest first
/// - `conversationId`: Optional conversation to persist the exchange under
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.last_user_turn() {
            Some(turn) if !turn.content.trim().is_empty() => None,
            _ => Some(MISSING_MESSAGES.to_string()),
        }
    }

    /// Most recent turn written by the user.
    pub fn last_user_turn(&self) -> Option<&ChatTurn> {
        self.messages.iter().rev().find(|t| t.role == Role::User)
    }

    /// Hands uploaded files to the most recent user turn.
    ///
    /// Files are dropped when the request has no user turn; such a request
    /// fails validation anyway.
    pub fn attach_files(&mut self, files: Vec<Attachment>) {
        if let Some(turn) = self.messages.iter_mut().rev().find(|t| t.role == Role::User) {
            turn.attachments = files;
        }
    }

    /// Conversation id, ignoring blank values sent by some clients.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

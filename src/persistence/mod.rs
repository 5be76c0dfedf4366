//! Persistence Module
//!
//! Session checks and conversation history writes, delegated to a hosted
//! backend. Writes are best-effort from the chat service's point of view.

mod supabase;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::Role;

pub use supabase::SupabaseStore;

/// Caller identity established by the session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    /// Session token, forwarded on writes so row-level policies apply
    pub access_token: Option<String>,
}

impl AuthenticatedUser {
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            access_token: None,
        }
    }
}

/// Row written to the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub conversation_id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Hosted store for sessions and conversation history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Resolves the caller from its bearer token.
    ///
    /// Any failure is reported as [`crate::error::ChatError::Unauthorized`].
    async fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedUser>;

    async fn insert_message(&self, user: &AuthenticatedUser, message: NewMessage) -> Result<()>;

    /// Bumps `updated_at` and records the conversation length.
    async fn touch_conversation(
        &self,
        user: &AuthenticatedUser,
        conversation_id: &str,
        message_count: usize,
    ) -> Result<()>;
}

/// Store used when no backend is configured.
///
/// Every caller is accepted as anonymous and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl ConversationStore for DisabledStore {
    async fn authenticate(&self, _bearer: Option<&str>) -> Result<AuthenticatedUser> {
        Ok(AuthenticatedUser::anonymous())
    }

    async fn insert_message(&self, _user: &AuthenticatedUser, message: NewMessage) -> Result<()> {
        debug!(
            conversation_id = %message.conversation_id,
            "Persistence disabled, dropping message"
        );
        Ok(())
    }

    async fn touch_conversation(
        &self,
        _user: &AuthenticatedUser,
        _conversation_id: &str,
        _message_count: usize,
    ) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_disabled_store_accepts_everyone() {
        let store = DisabledStore;
        let user = store.authenticate(None).await.unwrap();
        assert_eq!(user, AuthenticatedUser::anonymous());

        let message = NewMessage {
            conversation_id: "c".into(),
            role: Role::User,
            content: "x".into(),
            metadata: None,
        };
        assert!(store.insert_message(&user, message).await.is_ok());
        assert!(store.touch_conversation(&user, "c", 2).await.is_ok());
    }

    #[test]
    fn test_new_message_serialization() {
        let message = NewMessage {
            conversation_id: "c-1".into(),
            role: Role::Assistant,
            content: "Bonjour".into(),
            metadata: Some(json!({ "cached": false })),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["conversation_id"], "c-1");
        assert_eq!(value["metadata"]["cached"], false);

        let bare = NewMessage { metadata: None, ..message };
        assert!(serde_json::to_value(&bare).unwrap().get("metadata").is_none());
    }
}

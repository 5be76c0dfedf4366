//! Supabase (GoTrue + PostgREST) conversation store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::warn;

use crate::error::{ChatError, Result};

use super::{AuthenticatedUser, ConversationStore, NewMessage};

pub struct SupabaseStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseStore {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChatError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Adds the project key and the caller's session (or the anon key).
    fn authorized(&self, request: RequestBuilder, user: &AuthenticatedUser) -> RequestBuilder {
        let token = user.access_token.as_deref().unwrap_or(&self.anon_key);
        request.header("apikey", &self.anon_key).bearer_auth(token)
    }

    async fn expect_success(request: RequestBuilder, what: &str) -> Result<()> {
        let response = request
            .send()
            .await
            .map_err(|e| ChatError::Persistence(format!("{}: {}", what, e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ChatError::Persistence(format!(
                "{} returned {}: {}",
                what, status, body
            )))
        }
    }
}

#[async_trait]
impl ConversationStore for SupabaseStore {
    async fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedUser> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ChatError::Unauthorized)?;

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!("Session check failed: {}", e);
                ChatError::Unauthorized
            })?;

        if !response.status().is_success() {
            warn!("Session check rejected with status {}", response.status());
            return Err(ChatError::Unauthorized);
        }

        let body: Value = response.json().await.map_err(|_| ChatError::Unauthorized)?;
        let id = body["id"].as_str().ok_or(ChatError::Unauthorized)?;

        Ok(AuthenticatedUser {
            id: id.to_string(),
            access_token: Some(token.to_string()),
        })
    }

    async fn insert_message(&self, user: &AuthenticatedUser, message: NewMessage) -> Result<()> {
        let request = self
            .client
            .post(format!("{}/rest/v1/messages", self.base_url))
            .header("Prefer", "return=minimal")
            .json(&message);

        Self::expect_success(self.authorized(request, user), "insert message").await
    }

    async fn touch_conversation(
        &self,
        user: &AuthenticatedUser,
        conversation_id: &str,
        message_count: usize,
    ) -> Result<()> {
        let request = self
            .client
            .patch(format!("{}/rest/v1/conversations", self.base_url))
            .query(&[("id", format!("eq.{}", conversation_id))])
            .header("Prefer", "return=minimal")
            .json(&json!({
                "updated_at": chrono::Utc::now().to_rfc3339(),
                "message_count": message_count,
            }));

        Self::expect_success(self.authorized(request, user), "update conversation").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use httpmock::MockServer;

    fn signed_in() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".into(),
            access_token: Some("session-token".into()),
        }
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/auth/v1/user")
                .header("apikey", "anon")
                .header("authorization", "Bearer session-token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"user-1","email":"patient@example.com"}"#);
        });

        let store = SupabaseStore::new(&server.base_url(), "anon").unwrap();
        let user = store.authenticate(Some("session-token")).await.unwrap();

        mock.assert();
        assert_eq!(user, signed_in());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_missing_token() {
        let store = SupabaseStore::new("http://127.0.0.1:9", "anon").unwrap();
        assert_eq!(store.authenticate(None).await, Err(ChatError::Unauthorized));
        assert_eq!(store.authenticate(Some(" ")).await, Err(ChatError::Unauthorized));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_invalid_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/auth/v1/user");
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"msg":"invalid JWT"}"#);
        });

        let store = SupabaseStore::new(&server.base_url(), "anon").unwrap();
        assert_eq!(
            store.authenticate(Some("expired")).await,
            Err(ChatError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_insert_message_posts_row() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/rest/v1/messages")
                .header("authorization", "Bearer session-token")
                .body_contains(r#""conversation_id":"c-1""#);
            then.status(201);
        });

        let store = SupabaseStore::new(&server.base_url(), "anon").unwrap();
        let message = NewMessage {
            conversation_id: "c-1".into(),
            role: Role::User,
            content: "Bonjour".into(),
            metadata: None,
        };
        store.insert_message(&signed_in(), message).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_touch_conversation_failure_is_persistence_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("PATCH")
                .path("/rest/v1/conversations")
                .query_param("id", "eq.c-1");
            then.status(500).body("boom");
        });

        let store = SupabaseStore::new(&server.base_url(), "anon").unwrap();
        let result = store.touch_conversation(&signed_in(), "c-1", 3).await;
        assert!(matches!(result, Err(ChatError::Persistence(_))));
    }
}

//! Chat Service
//!
//! Orchestrates one chat request: cache lookup, optional enrichment,
//! retried LLM call, response assembly, cache write and best-effort
//! persistence.

use std::sync::Arc;

use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{fingerprint, SharedCache};
use crate::config::Config;
use crate::enrichment::{enrich, DrugLookup, Enrichment, OPENFDA_SOURCE};
use crate::error::{ChatError, Result};
use crate::llm::{with_disclaimer, with_retry, ChatModel, Completion, RetryPolicy};
use crate::models::{
    ChatRequest, ChatResponse, ChatTurn, ResponseMetadata, Role, MISSING_MESSAGES,
};
use crate::persistence::{AuthenticatedUser, ConversationStore, NewMessage};

use super::suggestions::suggest_for;

/// Source label for answers generated by the LLM.
pub const LLM_SOURCE: &str = "Mistral AI";

/// Source label for the assistant's own medical knowledge base.
pub const KNOWLEDGE_BASE_SOURCE: &str = "Base médicale DocIA";

/// Confidence reported for freshly generated answers.
pub const DEFAULT_CONFIDENCE: u8 = 85;

/// Number of most recent turns forwarded to the model.
pub const HISTORY_WINDOW: usize = 10;

/// Tunables of the chat flow.
///
/// The cached-answer lifetime belongs to the cache itself; see
/// [`crate::cache::TtlCache::new`].
#[derive(Debug, Clone, Default)]
pub struct ChatSettings {
    pub retry: RetryPolicy,
}

impl ChatSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config.retry_policy(),
        }
    }
}

/// Handles chat requests against injected collaborators.
pub struct ChatService {
    cache: SharedCache,
    model: Arc<dyn ChatModel>,
    drugs: Arc<dyn DrugLookup>,
    store: Arc<dyn ConversationStore>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        cache: SharedCache,
        model: Arc<dyn ChatModel>,
        drugs: Arc<dyn DrugLookup>,
        store: Arc<dyn ConversationStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            cache,
            model,
            drugs,
            store,
            settings,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Session check for the caller's bearer token.
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedUser> {
        self.store.authenticate(bearer).await
    }

    /// Answers one chat request.
    ///
    /// Identical questions within the cache TTL are answered from cache
    /// without calling the model. Enrichment and persistence failures are
    /// logged and never fail the request.
    pub async fn handle(
        &self,
        user: &AuthenticatedUser,
        request: ChatRequest,
    ) -> Result<ChatResponse> {
        let started = Instant::now();

        if let Some(msg) = request.validate() {
            return Err(ChatError::InvalidRequest(msg));
        }
        let last_turn = request
            .last_user_turn()
            .ok_or_else(|| ChatError::InvalidRequest(MISSING_MESSAGES.to_string()))?;
        let question = last_turn.content.clone();

        let key = fingerprint(&question, &last_turn.attachments);

        // Write lock: a read may evict an expired entry
        let cached = self.cache.write().await.get(&key);
        if let Some(hit) = cached {
            debug!(user_id = %user.id, "Serving chat response from cache");
            let response = hit.as_cached(elapsed_ms(started));
            self.persist_exchange(user, &request, &question, &response).await;
            return Ok(response);
        }

        let enrichment = enrich(self.drugs.as_ref(), &question).await;
        let turns = build_turns(&request.messages, &enrichment);

        let model = self.model.as_ref();
        let completion = with_retry(&self.settings.retry, |_| model.complete(&turns)).await?;

        let response = assemble_response(&completion, &enrichment, &question, elapsed_ms(started));

        self.cache.write().await.insert(key, response.clone());

        self.persist_exchange(user, &request, &question, &response).await;

        info!(
            user_id = %user.id,
            model = self.model.model_name(),
            tokens = completion.total_tokens.unwrap_or(0),
            response_time_ms = elapsed_ms(started),
            "Chat response generated"
        );
        Ok(response)
    }

    /// Writes the user turn and the answer, then touches the conversation.
    ///
    /// Stops at the first failing write; failures are logged only.
    async fn persist_exchange(
        &self,
        user: &AuthenticatedUser,
        request: &ChatRequest,
        question: &str,
        response: &ChatResponse,
    ) {
        let Some(conversation_id) = request.conversation_id() else {
            return;
        };
        let file_count = request
            .last_user_turn()
            .map(|t| t.attachments.len())
            .unwrap_or(0);

        let result = async {
            self.store
                .insert_message(
                    user,
                    NewMessage {
                        conversation_id: conversation_id.to_string(),
                        role: Role::User,
                        content: question.to_string(),
                        metadata: upload_metadata(file_count),
                    },
                )
                .await?;

            self.store
                .insert_message(
                    user,
                    NewMessage {
                        conversation_id: conversation_id.to_string(),
                        role: Role::Assistant,
                        content: response.message.clone(),
                        metadata: response.metadata.as_ref().map(|m| json!(m)),
                    },
                )
                .await?;

            self.store
                .touch_conversation(user, conversation_id, request.messages.len() + 1)
                .await
        }
        .await;

        if let Err(e) = result {
            warn!(
                user_id = %user.id,
                conversation_id,
                "Failed to persist chat exchange: {}",
                e
            );
        }
    }
}

/// Conversation sent to the model: the most recent turns, then the drug
/// context when the lookup found something.
pub fn build_turns(messages: &[ChatTurn], enrichment: &Enrichment) -> Vec<ChatTurn> {
    let skip = messages.len().saturating_sub(HISTORY_WINDOW);
    let mut turns: Vec<ChatTurn> = messages[skip..].to_vec();

    if let Some(info) = enrichment.drug_info() {
        turns.push(info.context_turn());
    }
    turns
}

/// Builds the user-facing response for a fresh completion.
pub fn assemble_response(
    completion: &Completion,
    enrichment: &Enrichment,
    question: &str,
    response_time: u64,
) -> ChatResponse {
    let mut sources = Vec::with_capacity(3);
    if enrichment.drug_info().is_some() {
        sources.push(OPENFDA_SOURCE.to_string());
    }
    sources.push(LLM_SOURCE.to_string());
    sources.push(KNOWLEDGE_BASE_SOURCE.to_string());

    ChatResponse {
        message: with_disclaimer(&completion.content),
        sources,
        confidence: Some(DEFAULT_CONFIDENCE),
        suggestions: suggest_for(question),
        metadata: Some(ResponseMetadata {
            response_time,
            model: completion.model.clone(),
            tokens: completion.total_tokens,
            cached: false,
        }),
    }
}

/// Metadata stored with a user turn that came with files.
fn upload_metadata(file_count: usize) -> Option<serde_json::Value> {
    (file_count > 0).then(|| json!({ "hasFiles": true, "fileCount": file_count }))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

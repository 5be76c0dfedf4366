//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use tracing::{info, warn};

use super::payload::read_chat_request;
use crate::cache::{self, SharedCache, TtlCache};
use crate::chat::{ChatService, ChatSettings};
use crate::config::Config;
use crate::enrichment::OpenFdaClient;
use crate::error::{ChatError, Result};
use crate::llm::MistralClient;
use crate::models::{ChatResponse, EvictResponse, HealthResponse, StatsResponse};
use crate::persistence::{ConversationStore, DisabledStore, SupabaseStore};

/// Application state shared across all handlers.
///
/// The cache is owned here and handed to the chat service, so its lifetime
/// is that of the router rather than of the process.
#[derive(Clone)]
pub struct AppState {
    /// Response cache, also reachable through the admin endpoints
    pub cache: SharedCache,
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Creates a new AppState around an already wired chat service.
    pub fn new(chat: ChatService) -> Self {
        Self {
            cache: chat.cache().clone(),
            chat: Arc::new(chat),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires the Mistral, OpenFDA and Supabase clients. Running without
    /// Supabase credentials requires `auth_disabled`; every caller is then
    /// anonymous and history is not written.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = conversation_store(config)?;
        let cache = cache::shared(TtlCache::new(config.cache_ttl()));

        if config.mistral_api_key.is_empty() {
            warn!("MISTRAL_API_KEY is not set, upstream calls will be rejected");
        }
        let model = Arc::new(MistralClient::from_config(config)?);
        let drugs = Arc::new(OpenFdaClient::new(&config.openfda_api_url)?);

        let chat = ChatService::new(cache, model, drugs, store, ChatSettings::from_config(config));
        Ok(Self::new(chat))
    }
}

fn conversation_store(config: &Config) -> Result<Arc<dyn ConversationStore>> {
    match config.supabase_credentials() {
        Some((url, key)) => {
            if config.auth_disabled {
                warn!("AUTH_DISABLED is ignored because Supabase is configured");
            }
            info!("Persisting conversations to {}", url);
            Ok(Arc::new(SupabaseStore::new(url, key)?))
        }
        None if config.auth_disabled => {
            warn!("Authentication and history are disabled (AUTH_DISABLED=true)");
            Ok(Arc::new(DisabledStore))
        }
        None => Err(ChatError::Internal(
            "Supabase is not configured; set AUTH_DISABLED=true to run without it".to_string(),
        )),
    }
}

/// Extracts the token of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Handler for POST /api/chat
///
/// Authenticates the caller, then answers the conversation. The body is
/// either JSON or a multipart form carrying files.
pub async fn chat_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ChatResponse>> {
    let bearer = bearer_token(request.headers()).map(str::to_owned);
    let user = state.chat.authenticate(bearer.as_deref()).await?;
    let request = read_chat_request(request, &state).await?;

    let response = state.chat.handle(&user, request).await?;
    Ok(Json(response))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    state.chat.authenticate(bearer_token(&headers)).await?;

    // Acquire read lock for stats
    let cache = state.cache.read().await;
    Ok(Json(StatsResponse::from(cache.stats())))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EvictResponse>> {
    let user = state.chat.authenticate(bearer_token(&headers)).await?;

    let mut cache = state.cache.write().await;
    let removed = cache.len();
    cache.clear();

    info!(user_id = %user.id, "Response cache cleared ({} entries)", removed);
    Ok(Json(EvictResponse::cleared(removed)))
}

/// Handler for DELETE /cache/:key
///
/// Absent keys are not an error.
pub async fn evict_key_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<EvictResponse>> {
    state.chat.authenticate(bearer_token(&headers)).await?;

    let removed = state.cache.write().await.delete(&key);
    Ok(Json(EvictResponse::key(&key, removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Test doubles for the remote collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docia::cache::{self, TtlCache};
use docia::chat::{ChatService, ChatSettings};
use docia::enrichment::{DrugInfo, DrugLookup};
use docia::error::{ChatError, Result};
use docia::llm::{ChatModel, Completion};
use docia::models::ChatTurn;
use docia::persistence::{AuthenticatedUser, ConversationStore, NewMessage};

pub const VALID_TOKEN: &str = "valid-token";

/// Cached-answer lifetime used unless a test picks its own.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

// == Model ==

/// Model answering from a script, then with a fixed fallback answer.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl ScriptedModel {
    pub fn answering(answer: &str) -> Arc<Self> {
        Self::scripted(Vec::new(), answer)
    }

    pub fn scripted(script: Vec<Result<String>>, fallback: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: fallback.to_string(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Turns received by the most recent call.
    pub fn last_turns(&self) -> Vec<ChatTurn> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(turns.to_vec());

        let next = self.script.lock().unwrap().pop_front();
        let content = match next {
            Some(result) => result?,
            None => self.fallback.clone(),
        };

        Ok(Completion {
            content,
            total_tokens: Some(42),
            model: "mistral-large-latest".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "mistral-large-latest"
    }
}

/// Model whose calls never complete.
pub struct HangingModel;

#[async_trait]
impl ChatModel for HangingModel {
    async fn complete(&self, _turns: &[ChatTurn]) -> Result<Completion> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ChatError::Internal("unreachable".into()))
    }

    fn model_name(&self) -> &str {
        "hanging"
    }
}

// == Drug lookup ==

pub struct FixedDrugs {
    answer: Result<Option<DrugInfo>>,
    calls: AtomicUsize,
}

impl FixedDrugs {
    pub fn none() -> Arc<Self> {
        Self::with(Ok(None))
    }

    pub fn with(answer: Result<Option<DrugInfo>>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DrugLookup for FixedDrugs {
    async fn lookup(&self, _term: &str) -> Result<Option<DrugInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

// == Store ==

/// Store accepting only [`VALID_TOKEN`] and recording every write.
#[derive(Default)]
pub struct RecordingStore {
    pub messages: Mutex<Vec<NewMessage>>,
    pub touched: Mutex<Vec<(String, usize)>>,
    pub fail_writes: bool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Self::default()
        })
    }

    pub fn messages(&self) -> Vec<NewMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn touched(&self) -> Vec<(String, usize)> {
        self.touched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for RecordingStore {
    async fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedUser> {
        match bearer {
            Some(VALID_TOKEN) => Ok(AuthenticatedUser {
                id: "user-1".into(),
                access_token: Some(VALID_TOKEN.into()),
            }),
            _ => Err(ChatError::Unauthorized),
        }
    }

    async fn insert_message(&self, _user: &AuthenticatedUser, message: NewMessage) -> Result<()> {
        if self.fail_writes {
            return Err(ChatError::Persistence("insert refused".into()));
        }
        self.messages.lock().unwrap().push(message);
        Ok(())
    }

    async fn touch_conversation(
        &self,
        _user: &AuthenticatedUser,
        conversation_id: &str,
        message_count: usize,
    ) -> Result<()> {
        if self.fail_writes {
            return Err(ChatError::Persistence("update refused".into()));
        }
        self.touched
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), message_count));
        Ok(())
    }
}

// == Wiring ==

pub fn service(
    model: Arc<dyn ChatModel>,
    drugs: Arc<dyn DrugLookup>,
    store: Arc<dyn ConversationStore>,
) -> ChatService {
    service_with(model, drugs, store, ChatSettings::default(), CACHE_TTL)
}

pub fn service_with(
    model: Arc<dyn ChatModel>,
    drugs: Arc<dyn DrugLookup>,
    store: Arc<dyn ConversationStore>,
    settings: ChatSettings,
    cache_ttl: Duration,
) -> ChatService {
    let cache = cache::shared(TtlCache::new(cache_ttl));
    ChatService::new(cache, model, drugs, store, settings)
}

pub fn signed_in() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-1".into(),
        access_token: Some(VALID_TOKEN.into()),
    }
}

//! Chat payload extraction
//!
//! `POST /api/chat` takes either a JSON body or `multipart/form-data` with a
//! `messages` JSON field, an optional `conversationId` field and `file_*`
//! parts.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use tracing::{debug, warn};

use crate::error::{ChatError, Result};
use crate::models::{Attachment, ChatRequest, ChatTurn, MISSING_MESSAGES};

/// Prefix of multipart fields carrying uploaded files.
const FILE_FIELD_PREFIX: &str = "file_";

/// Content type assumed for file parts sent without one.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Reads a chat request from a JSON or multipart body.
///
/// Any malformed body is reported as [`MISSING_MESSAGES`].
pub async fn read_chat_request<S>(request: Request, state: &S) -> Result<ChatRequest>
where
    S: Send + Sync,
{
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| invalid(rejection.body_text()))?;
        read_multipart(multipart).await
    } else {
        let Json(body) = Json::<ChatRequest>::from_request(request, state)
            .await
            .map_err(|rejection| invalid(rejection.body_text()))?;
        Ok(body)
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<ChatRequest> {
    let mut messages: Vec<ChatTurn> = Vec::new();
    let mut conversation_id = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "messages" {
            let text = field.text().await.map_err(|e| invalid(e.body_text()))?;
            messages = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        } else if name == "conversationId" {
            conversation_id = Some(field.text().await.map_err(|e| invalid(e.body_text()))?);
        } else if name.starts_with(FILE_FIELD_PREFIX) {
            let file_name = field.file_name().unwrap_or(&name).to_string();
            let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();
            let data = field.bytes().await.map_err(|e| invalid(e.body_text()))?;

            debug!(file_name, mime_type, bytes = data.len(), "Received chat upload");
            files.push(Attachment {
                name: file_name,
                mime_type,
                data: data.to_vec(),
            });
        } else {
            debug!("Ignoring multipart field {:?}", name);
        }
    }

    let mut request = ChatRequest {
        messages,
        conversation_id,
    };
    request.attach_files(files);
    Ok(request)
}

fn invalid(detail: String) -> ChatError {
    warn!("Rejected chat payload: {}", detail);
    ChatError::InvalidRequest(MISSING_MESSAGES.to_string())
}

//! Request fingerprinting for cache keys.
//!
//! The key is the SHA-256 digest of the latest user turn and of every
//! attached file, so it stays bounded whatever the message length.

use sha2::{Digest, Sha256};

use crate::models::Attachment;

/// Namespace prepended to every chat cache key.
const KEY_NAMESPACE: &str = "chat:";

/// Derives the cache key for a user message and its attachments.
///
/// Surrounding whitespace of the message is ignored; everything else, case
/// included, is significant. Each part is length-prefixed so that moving
/// bytes between the message and an attachment changes the key.
pub fn fingerprint(content: &str, attachments: &[Attachment]) -> String {
    let mut hasher = Sha256::new();
    update_part(&mut hasher, content.trim().as_bytes());

    for attachment in attachments {
        update_part(&mut hasher, attachment.mime_type.as_bytes());
        update_part(&mut hasher, &attachment.data);
    }

    format!("{}{}", KEY_NAMESPACE, hex::encode(hasher.finalize()))
}

fn update_part(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

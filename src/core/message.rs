//! # Chat Data Model
//!
//! The records the chat room moves around. None of these know about
//! terminals or networks.
//!
//! ```text
//! Identity ──┐
//!            ├── ComposeForm::submit ──► OutgoingMessage ──► transport
//! DraftState ┘                                                  │
//!                                                               ▼
//!                          MessageListView ◄── MessageRecord (appended)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uid used when no identity has been resolved.
pub const DEFAULT_UID: &str = "abc";

/// Avatar reference shown for authors without a photo.
pub const DEFAULT_AVATAR_URL: &str = "https://api.adorable.io/avatars/23/abott@adorable.png";

/// A message that has been accepted by the transport.
///
/// Records are immutable once created. The core only ever appends them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: Uuid,
    pub text: String,
    pub author_uid: String,
    #[serde(default, rename = "avatarURL", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Avatar to display: the record's own URL, or `fallback` when absent or blank.
    pub fn avatar_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.avatar_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => fallback,
        }
    }

    /// Avatar to display, falling back to [`DEFAULT_AVATAR_URL`].
    pub fn avatar(&self) -> &str {
        self.avatar_or(DEFAULT_AVATAR_URL)
    }

    pub fn is_authored_by(&self, identity: &Identity) -> bool {
        self.author_uid == identity.uid
    }
}

/// The current user, as resolved by the identity provider. Read-only to the core.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(DEFAULT_UID, None)
    }
}

impl Identity {
    pub fn new(uid: impl Into<String>, avatar_url: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            avatar_url,
            display_name: None,
        }
    }

    /// Name shown in the title bar: display name if known, otherwise the uid.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.uid)
    }
}

/// Payload handed to the send callback when a draft is submitted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Client-side id so a late success or failure can be matched to its draft.
    #[serde(skip)]
    pub client_id: Uuid,
    pub text: String,
    pub author_uid: String,
    #[serde(rename = "authorAvatarURL")]
    pub author_avatar_url: String,
}

impl OutgoingMessage {
    pub fn new(text: String, identity: &Identity) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            text,
            author_uid: identity.uid.clone(),
            author_avatar_url: identity.avatar_url.clone().unwrap_or_default(),
        }
    }

    /// Turn an accepted message into the record the list will show.
    pub fn into_record(self, created_at: DateTime<Utc>) -> MessageRecord {
        let avatar_url = (!self.author_avatar_url.is_empty()).then_some(self.author_avatar_url);
        MessageRecord {
            id: Uuid::new_v4(),
            text: self.text,
            author_uid: self.author_uid,
            avatar_url,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(avatar_url: Option<&str>) -> MessageRecord {
        MessageRecord {
            id: Uuid::new_v4(),
            text: "hi".into(),
            author_uid: "abc".into(),
            avatar_url: avatar_url.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_avatar_falls_back_to_default() {
        assert_eq!(record(None).avatar(), DEFAULT_AVATAR_URL);
        assert_eq!(record(Some("")).avatar(), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn present_avatar_is_used_verbatim() {
        let url = "https://example.com/me.png?size=23";
        assert_eq!(record(Some(url)).avatar(), url);
    }

    #[test]
    fn default_identity_uses_default_uid() {
        let identity = Identity::default();
        assert_eq!(identity.uid, DEFAULT_UID);
        assert_eq!(identity.avatar_url, None);
        assert_eq!(identity.label(), "abc");
    }

    #[test]
    fn outgoing_message_carries_empty_avatar_when_identity_has_none() {
        let msg = OutgoingMessage::new("hello".into(), &Identity::default());
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.author_uid, "abc");
        assert_eq!(msg.author_avatar_url, "");
    }

    #[test]
    fn outgoing_message_serializes_with_camel_case_keys() {
        let msg = OutgoingMessage::new("hello".into(), &Identity::default());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hello", "authorUid": "abc", "authorAvatarURL": ""})
        );
    }

    #[test]
    fn into_record_drops_empty_avatar() {
        let msg = OutgoingMessage::new("hello".into(), &Identity::default());
        let rec = msg.into_record(Utc::now());
        assert_eq!(rec.avatar_url, None);
        assert_eq!(rec.text, "hello");
        assert!(rec.is_authored_by(&Identity::default()));
    }
}

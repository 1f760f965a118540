//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use chrono::Utc;
use ratatui::buffer::Buffer;

use crate::core::message::{Identity, MessageRecord, OutgoingMessage};
use crate::core::state::ChatRoom;
use crate::transport::{MessageCallback, MessageTransport, Subscription, TransportError};

/// A room for the default identity ("abc").
pub fn test_room() -> ChatRoom {
    ChatRoom::new(Identity::default())
}

/// A stored record written by `author` with no avatar.
pub fn record_from(author: &str, text: &str) -> MessageRecord {
    OutgoingMessage::new(text.to_string(), &Identity::new(author, None)).into_record(Utc::now())
}

/// Flatten a rendered buffer into lines of text.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// A transport whose sends always fail with the given error.
pub struct FailingTransport(pub TransportError);

#[async_trait]
impl MessageTransport for FailingTransport {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _message: OutgoingMessage) -> Result<MessageRecord, TransportError> {
        Err(self.0.clone())
    }

    fn subscribe(&self, _on_message: MessageCallback) -> Subscription {
        Subscription::inert()
    }

    fn close(&self) {}
}

//! In-process loopback transport.
//!
//! Accepted messages are stamped with an id and timestamp and broadcast to
//! every subscriber of the same `LocalTransport`. Nothing leaves the process
//! and nothing is stored; this is what the chat room runs on until a real
//! backend is wired in.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::{MessageCallback, MessageTransport, Subscription, TransportError};
use crate::core::message::{MessageRecord, OutgoingMessage};

/// Messages buffered per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 256;

pub struct LocalTransport {
    sender: broadcast::Sender<MessageRecord>,
    closed: AtomicBool,
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTransport {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MessageTransport for LocalTransport {
    fn name(&self) -> &str {
        "local"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<MessageRecord, TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        if message.text.trim().is_empty() {
            return Err(TransportError::Rejected("empty message".into()));
        }

        let record = message.into_record(Utc::now());
        // No receivers is fine: the sender still gets the record back.
        match self.sender.send(record.clone()) {
            Ok(n) => debug!("Broadcast message {} to {} subscriber(s)", record.id, n),
            Err(_) => debug!("Message {} accepted with no subscribers", record.id),
        }
        Ok(record)
    }

    fn subscribe(&self, on_message: MessageCallback) -> Subscription {
        let mut receiver = self.sender.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(record) => on_message(record),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Subscriber lagged, skipped {} message(s)", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Subscription::new(task.abort_handle())
    }

    fn close(&self) {
        info!("Local transport closed");
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Identity;
    use tokio::sync::mpsc;

    fn outgoing(text: &str) -> OutgoingMessage {
        OutgoingMessage::new(text.to_string(), &Identity::default())
    }

    #[tokio::test]
    async fn send_returns_record_with_fields() {
        let transport = LocalTransport::new();
        let record = transport.send(outgoing("hello")).await.unwrap();
        assert_eq!(record.text, "hello");
        assert_eq!(record.author_uid, "abc");
        assert_eq!(record.avatar_url, None);
    }

    #[tokio::test]
    async fn subscribers_receive_in_send_order() {
        let transport = LocalTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = transport.subscribe(Box::new(move |record| {
            let _ = tx.send(record.text);
        }));

        for text in ["one", "two", "three"] {
            transport.send(outgoing(text)).await.unwrap();
        }

        let mut received = Vec::new();
        for _ in 0..3 {
            received.push(rx.recv().await.unwrap());
        }
        assert_eq!(received, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn closed_transport_refuses_sends() {
        let transport = LocalTransport::new();
        transport.close();
        assert_eq!(
            transport.send(outgoing("late")).await,
            Err(TransportError::Closed)
        );
    }

    #[tokio::test]
    async fn whitespace_message_is_rejected() {
        let transport = LocalTransport::new();
        let result = transport.send(outgoing("  ")).await;
        assert!(matches!(result, Err(TransportError::Rejected(_))));
    }

    #[test]
    fn send_without_subscribers_still_succeeds() {
        let transport = LocalTransport::new();
        let record = tokio_test::block_on(transport.send(outgoing("alone"))).unwrap();
        assert_eq!(record.text, "alone");
    }
}

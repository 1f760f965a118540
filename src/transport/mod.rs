//! # Message Transport
//!
//! The seam between the chat room and whatever actually delivers messages.
//! The core never names a concrete transport; the event loop gets one
//! injected as `Arc<dyn MessageTransport>`.
//!
//! The trait makes no assumption about how new messages arrive (push,
//! polling, loopback); implementations decide, and report every record
//! through the callback given to [`MessageTransport::subscribe`].

pub mod local;

use std::fmt;

use async_trait::async_trait;
use tokio::task::AbortHandle;

use crate::core::message::{MessageRecord, OutgoingMessage};

pub use local::LocalTransport;

/// Errors that can occur while sending.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The transport has shut down and accepts nothing more.
    Closed,
    /// The message was refused (validation, permissions, ...).
    Rejected(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Closed => write!(f, "transport closed"),
            TransportError::Rejected(msg) => write!(f, "message rejected: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Called once per new record, from whatever task the transport runs on.
pub type MessageCallback = Box<dyn Fn(MessageRecord) + Send + Sync>;

/// Keeps a subscription alive. Dropping it stops delivery.
pub struct Subscription {
    handle: Option<AbortHandle>,
}

impl Subscription {
    pub fn new(handle: AbortHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A subscription that never delivers anything.
    pub fn inert() -> Self {
        Self { handle: None }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver a message. Resolves to the stored record on success.
    async fn send(&self, message: OutgoingMessage) -> Result<MessageRecord, TransportError>;

    /// Start receiving new records. Must be called inside a tokio runtime.
    fn subscribe(&self, on_message: MessageCallback) -> Subscription;

    /// Refuse every later send with `TransportError::Closed`.
    fn close(&self);
}

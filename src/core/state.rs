//! # Chat Room State
//!
//! Core state for the chat room. Domain data only; scroll offsets, cursor
//! positions and other presentation state live in the `tui` module.
//!
//! ```text
//! ChatRoom
//! ├── identity: Identity               // current user (read-only input)
//! ├── messages: Vec<MessageRecord>     // display order == insertion order
//! ├── compose: ComposeForm             // draft text + submit gating
//! ├── status_message: String           // status bar text
//! ├── pending_sends: HashMap           // client_id → text, sends in flight
//! ├── app_name: String                 // title bar
//! └── highlight_own_messages: bool     // sent/received styling switch
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::compose::ComposeForm;
use crate::core::config::ResolvedConfig;
use crate::core::message::{Identity, MessageRecord};

pub const WELCOME_STATUS: &str = "Welcome!";

pub struct ChatRoom {
    pub identity: Identity,
    pub messages: Vec<MessageRecord>,
    pub compose: ComposeForm,
    pub status_message: String,
    pub pending_sends: HashMap<Uuid, String>,
    pub app_name: String,
    /// When false every message renders as "sent", regardless of author.
    pub highlight_own_messages: bool,
    seen_ids: HashSet<Uuid>,
}

impl ChatRoom {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            messages: Vec::new(),
            compose: ComposeForm::new(),
            status_message: String::from(WELCOME_STATUS),
            pending_sends: HashMap::new(),
            app_name: String::from("Chat Room"),
            highlight_own_messages: true,
            seen_ids: HashSet::new(),
        }
    }

    pub fn from_config(identity: Identity, config: &ResolvedConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            highlight_own_messages: config.highlight_own_messages,
            ..Self::new(identity)
        }
    }

    /// Append a record unless one with the same id is already shown.
    ///
    /// Returns `true` if the list grew. A record can arrive twice: once as the
    /// result of our own send and once from the transport subscription.
    pub fn push_message(&mut self, record: MessageRecord) -> bool {
        if !self.seen_ids.insert(record.id) {
            return false;
        }
        self.messages.push(record);
        true
    }

    /// Whether `record` should use the "sent" style.
    pub fn is_own(&self, record: &MessageRecord) -> bool {
        !self.highlight_own_messages || record.is_authored_by(&self.identity)
    }

    pub fn is_sending(&self) -> bool {
        !self.pending_sends.is_empty()
    }
}

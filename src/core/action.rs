//! # Actions
//!
//! Everything that can happen in the chat room becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Transport delivers a message? That's `Action::MessageReceived(record)`.
//!
//! `update()` applies an action to the state and returns an [`Effect`] telling
//! the event loop what I/O to perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::message::{Identity, MessageRecord, OutgoingMessage};
use crate::core::state::ChatRoom;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The compose input changed; carries the full new text.
    UpdateDraft(String),
    Submit,
    SendSucceeded {
        client_id: Uuid,
        record: MessageRecord,
    },
    SendFailed {
        client_id: Uuid,
        error: String,
    },
    MessageReceived(MessageRecord),
    IdentityResolved(Identity),
    /// Identity lookup failed or found nobody; the configured identity stays.
    IdentityUnavailable(String),
    Quit,
}

/// I/O the event loop must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Hand the message to the transport.
    Send(OutgoingMessage),
    /// Bring the newest message into view.
    ScrollToLatest,
}

pub fn update(room: &mut ChatRoom, action: Action) -> Effect {
    match action {
        Action::UpdateDraft(text) => {
            room.compose.update_draft(text);
            Effect::None
        }
        Action::Submit => {
            let mut outgoing = None;
            if room
                .compose
                .submit(&room.identity, |msg| outgoing = Some(msg))
                .is_err()
            {
                return Effect::None;
            }
            match outgoing {
                Some(msg) => {
                    room.pending_sends.insert(msg.client_id, msg.text.clone());
                    room.status_message = String::from("Sending...");
                    Effect::Send(msg)
                }
                None => Effect::None,
            }
        }
        Action::SendSucceeded { client_id, record } => {
            room.pending_sends.remove(&client_id);
            debug!("Send {} accepted as message {}", client_id, record.id);
            room.push_message(record);
            if !room.is_sending() {
                room.status_message.clear();
            }
            Effect::ScrollToLatest
        }
        Action::SendFailed { client_id, error } => {
            warn!("Send {} failed: {}", client_id, error);
            room.status_message = format!("Send failed: {error}");
            // Give the text back for a retry, unless the user already started a new draft.
            if let Some(text) = room.pending_sends.remove(&client_id)
                && room.compose.draft().is_empty()
            {
                room.compose.update_draft(text);
            }
            Effect::None
        }
        Action::MessageReceived(record) => {
            if room.push_message(record) {
                debug!("Message list grew to {}", room.messages.len());
            }
            Effect::None
        }
        Action::IdentityResolved(identity) => {
            info!("Identity resolved: {}", identity.uid);
            room.status_message = format!("Signed in as {}", identity.label());
            room.identity = identity;
            Effect::None
        }
        Action::IdentityUnavailable(reason) => {
            warn!("Identity unavailable: {}", reason);
            room.status_message = format!(
                "Identity unavailable ({reason}), posting as {}",
                room.identity.label()
            );
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

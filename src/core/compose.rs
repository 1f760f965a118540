//! # Compose Form
//!
//! Owns the draft text and decides when it may be submitted.
//!
//! The form never talks to a transport. `submit` hands the finished
//! [`OutgoingMessage`] to whatever callback the caller injects, which keeps the
//! form testable without a backend.

use std::fmt;

use log::debug;

use crate::core::message::{Identity, OutgoingMessage};

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The draft is empty or whitespace only.
    EmptyDraft,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyDraft => write!(f, "draft is empty"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Draft text currently being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftState {
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ComposeForm {
    draft: DraftState,
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft.text
    }

    /// Replace the draft. No validation happens here.
    pub fn update_draft(&mut self, new_text: impl Into<String>) {
        self.draft.text = new_text.into();
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        !self.draft.text.trim().is_empty()
    }

    /// Submit the draft through `send`.
    ///
    /// On an empty draft `send` is not called and the draft is left as-is.
    /// Otherwise `send` runs exactly once and the draft is cleared afterwards.
    pub fn submit<F>(&mut self, identity: &Identity, send: F) -> Result<(), SubmitError>
    where
        F: FnOnce(OutgoingMessage),
    {
        if !self.can_submit() {
            debug!("Submit ignored: empty draft");
            return Err(SubmitError::EmptyDraft);
        }

        let message = OutgoingMessage::new(self.draft.text.clone(), identity);
        debug!(
            "Submitting draft (len={}, client_id={})",
            message.text.len(),
            message.client_id
        );
        send(message);
        self.draft.text.clear();
        Ok(())
    }
}

//! # Core Chat Room Logic
//!
//! The chat room's business logic. It knows nothing about any specific UI
//! technology or about how messages travel.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatRoom (state)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ Transport  │      │  Identity  │
//!     │  Adapter   │      │ (send /    │      │  Provider  │
//!     │ (ratatui)  │      │ subscribe) │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `MessageRecord`, `Identity` and the outgoing payload
//! - [`compose`]: `ComposeForm`, the draft and its submit gate
//! - [`state`]: `ChatRoom`, all chat state in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`config`]: layered configuration (file, env, CLI)

pub mod action;
pub mod compose;
pub mod config;
pub mod message;
pub mod state;

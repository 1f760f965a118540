//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chat room,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background Work
//!
//! Sends and identity lookups run as tokio tasks. They report back by
//! sending an `Action` over a std `mpsc` channel, which the event loop
//! drains between frames. The transport subscription uses the same channel.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws after an event or a background action.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::message::OutgoingMessage;
use crate::core::state::ChatRoom;
use crate::identity::{self, IdentityProvider};
use crate::transport::{LocalTransport, MessageTransport, Subscription};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Avatar reference for records without one
    pub default_avatar: String,
}

impl TuiState {
    pub fn new(placeholder: impl Into<String>, default_avatar: impl Into<String>) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(placeholder),
            default_avatar: default_avatar.into(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Run the chat room over the in-process transport.
pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport: Arc<dyn MessageTransport> = Arc::new(LocalTransport::new());
    let identity_provider = identity::build_provider(&config);
    run_with(config, transport, identity_provider)
}

pub fn run_with(
    config: ResolvedConfig,
    transport: Arc<dyn MessageTransport>,
    identity_provider: Box<dyn IdentityProvider>,
) -> std::io::Result<()> {
    let mut room = ChatRoom::from_config(identity::configured_identity(&config), &config);
    let mut tui = TuiState::new(config.placeholder.clone(), config.default_avatar_url.clone());
    info!(
        "Chat room starting: transport={}, identity={}, uid={}",
        transport.name(),
        identity_provider.name(),
        room.identity.uid
    );

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let subscription_tx = tx.clone();
    let subscription = transport.subscribe(Box::new(move |record| {
        if subscription_tx.send(Action::MessageReceived(record)).is_err() {
            warn!("Dropped incoming message: receiver gone");
        }
    }));
    spawn_identity_resolution(identity_provider, tx.clone());

    let mut terminal = ratatui::try_init()?;
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        // Sync InputBox props with the compose form
        tui.input_box.set_draft(room.compose.draft());
        tui.input_box.can_submit = room.compose.can_submit();

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &room, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_TIMEOUT);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = match event {
                TuiEvent::Resize => continue,
                TuiEvent::Quit => update(&mut room, Action::Quit),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToLatest => {
                    tui.message_list.handle_event(&event);
                    continue;
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::DraftChanged(text)) => {
                        update(&mut room, Action::UpdateDraft(text))
                    }
                    Some(InputEvent::Submit) => update(&mut room, Action::Submit),
                    Some(InputEvent::CursorMoved) | None => Effect::None,
                },
            };
            if apply_effect(effect, &mut tui, &transport, &tx) {
                break 'event_loop;
            }
            // Keep the input in step with the core between drained events
            tui.input_box.set_draft(room.compose.draft());
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut room, action);
            if apply_effect(effect, &mut tui, &transport, &tx) {
                break 'event_loop;
            }
        }
    }

    info!("Chat room shutting down ({} messages shown)", room.messages.len());
    shut_down(transport.as_ref(), subscription);
    ratatui::restore();
    Ok(())
}

/// Stop delivery and refuse sends still queued behind the loop.
fn shut_down(transport: &dyn MessageTransport, mut subscription: Subscription) {
    subscription.cancel();
    transport.close();
}

/// Perform the I/O an update asked for. Returns `true` when the loop should exit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    transport: &Arc<dyn MessageTransport>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::Send(message) => {
            spawn_send(transport.clone(), message, tx.clone());
            false
        }
        Effect::ScrollToLatest => {
            tui.message_list.scroll_to_latest();
            false
        }
    }
}

fn spawn_send(
    transport: Arc<dyn MessageTransport>,
    message: OutgoingMessage,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    let client_id = message.client_id;
    info!("Spawning send {} via {}", client_id, transport.name());
    tokio::spawn(async move {
        let action = match transport.send(message).await {
            Ok(record) => Action::SendSucceeded { client_id, record },
            Err(e) => {
                warn!("Transport rejected send {}: {}", client_id, e);
                Action::SendFailed {
                    client_id,
                    error: e.to_string(),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to report send {}: receiver dropped", client_id);
        }
    })
}

fn spawn_identity_resolution(
    provider: Box<dyn IdentityProvider>,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = match provider.current_identity().await {
            Ok(Some(identity)) => Action::IdentityResolved(identity),
            Ok(None) => Action::IdentityUnavailable("not signed in".to_string()),
            Err(e) => Action::IdentityUnavailable(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to report identity: receiver dropped");
        }
    })
}

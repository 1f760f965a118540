//! # InputBox Component
//!
//! Terminal rendering of the compose form.
//!
//! ## Controlled Input
//!
//! The draft text belongs to `ComposeForm` in the core. `InputBox` receives it
//! as a prop (`set_draft`), edits a local copy on each keystroke and reports
//! the full new text as `InputEvent::DraftChanged`; the event loop feeds that
//! back through `Action::UpdateDraft`. Enter emits `InputEvent::Submit` and
//! the core decides whether the draft may go out.
//!
//! The cursor is the only state the box owns.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, MAX_VISIBLE_LINES, cursor_cell, row_count, wrap_rows};

/// Borders (2) + horizontal padding (2)
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from the area edge to the first text column
const TEXT_OFFSET_X: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The draft text changed; carries the whole new text.
    DraftChanged(String),
    /// User pressed Enter.
    Submit,
    /// Only the cursor moved (redraw needed, draft unchanged).
    CursorMoved,
}

pub struct InputBox {
    /// Current draft (Prop, mirrored from ComposeForm)
    pub draft: String,
    /// Shown dimmed while the draft is empty (Prop)
    pub placeholder: String,
    /// Whether the send hint is active (Prop)
    pub can_submit: bool,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            draft: String::new(),
            placeholder: placeholder.into(),
            can_submit: false,
            cursor: CursorState::new(),
        }
    }

    /// Sync the draft prop from the core. An outside change (cleared after
    /// submit, restored after a failed send) puts the cursor at the end.
    pub fn set_draft(&mut self, draft: &str) {
        if self.draft != draft {
            self.draft = draft.to_string();
            self.cursor.to_end(&self.draft);
        }
    }

    /// Height for the current draft at `width`, clamped to the visible-line limit.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let rows = row_count(&self.draft, inner).min(MAX_VISIBLE_LINES as usize);
        rows as u16 + VERTICAL_OVERHEAD
    }

    fn edit(&mut self, apply: impl FnOnce(&mut String, &mut CursorState)) -> InputEvent {
        apply(&mut self.draft, &mut self.cursor);
        InputEvent::DraftChanged(self.draft.clone())
    }

    fn send_hint(&self) -> Line<'static> {
        let style = if self.can_submit {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };
        Line::styled(" send ⏎ ", style).right_aligned()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let (cursor_row, cursor_col) = cursor_cell(&self.draft, self.cursor.pos, inner);
        let max_rows = MAX_VISIBLE_LINES as usize;
        let first_row = (cursor_row + 1).saturating_sub(max_rows);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Message")
            .title(self.send_hint())
            .padding(Padding::horizontal(1));

        let body = if self.draft.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let visible = wrap_rows(&self.draft, inner)
                .into_iter()
                .skip(first_row)
                .take(max_rows)
                .collect::<Vec<_>>()
                .join("\n");
            Paragraph::new(visible).style(Style::default().fg(Color::Green))
        };

        frame.render_widget(body.block(block), area);

        let x = area.x + TEXT_OFFSET_X + cursor_col as u16;
        let y = area.y + 1 + (cursor_row - first_row) as u16;
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => Some(self.edit(|draft, cursor| {
                draft.insert(cursor.pos, *c);
                cursor.pos += c.len_utf8();
            })),
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                Some(self.edit(|draft, cursor| {
                    draft.insert_str(cursor.pos, &text);
                    cursor.pos += text.len();
                }))
            }
            TuiEvent::Backspace => {
                let range = self.cursor.prev_char(&self.draft)?;
                Some(self.edit(|draft, cursor| {
                    cursor.pos = range.start;
                    draft.replace_range(range, "");
                }))
            }
            TuiEvent::Delete => {
                let range = self.cursor.next_char(&self.draft)?;
                Some(self.edit(|draft, _| draft.replace_range(range, "")))
            }
            TuiEvent::CursorLeft => self
                .cursor
                .left(&self.draft)
                .then_some(InputEvent::CursorMoved),
            TuiEvent::CursorRight => self
                .cursor
                .right(&self.draft)
                .then_some(InputEvent::CursorMoved),
            TuiEvent::CursorHome => self
                .cursor
                .home(&self.draft)
                .then_some(InputEvent::CursorMoved),
            TuiEvent::CursorEnd => self
                .cursor
                .end(&self.draft)
                .then_some(InputEvent::CursorMoved),
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

//! # MessageList Component
//!
//! Scrollable view of the chat room's messages.
//!
//! ## Responsibilities
//!
//! - Render one `Message` per record, in the order the records were received
//! - Keep the newest message in view (`stick_to_bottom` / `scroll_to_latest`)
//! - Cache message heights so unchanged records are not re-measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `ChatRoom` (props).
//! Records are immutable, so a cached height stays valid until the width
//! changes.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::ChatRoom;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, follow new messages as they arrive
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the viewport (drives the "↓ New" indicator)
    pub has_unseen_content: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Bring the newest message into view and follow new ones from here on.
    ///
    /// Idempotent. On an empty list nothing moves.
    pub fn scroll_to_latest(&mut self) {
        self.stick_to_bottom = true;
        self.has_unseen_content = false;
        if self.layout.heights.is_empty() {
            return;
        }
        self.pin_to_bottom();
    }

    /// Move the offset to the last row of the measured content.
    /// Render re-measures first, so appended records are included.
    fn pin_to_bottom(&mut self) {
        let current = self.scroll_state.offset();
        self.scroll_state.set_offset(Position {
            x: current.x,
            y: self.max_offset(),
        });
    }

    /// Re-engage auto-scroll once the user has scrolled back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable chat view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub room: &'a ChatRoom,
    pub default_avatar: &'a str,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        room: &'a ChatRoom,
        default_avatar: &'a str,
    ) -> Self {
        Self {
            state,
            room,
            default_avatar,
        }
    }

    /// One renderer per record, in input order.
    pub fn entries(&self) -> Vec<Message<'a>> {
        let room = self.room;
        let default_avatar = self.default_avatar;
        room.messages
            .iter()
            .map(|record| Message::new(record, room.is_own(record), default_avatar))
            .collect()
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.room.messages.is_empty() {
            self.state.layout = LayoutCache::new();
            self.state.scroll_state = ScrollViewState::default();
            self.state.has_unseen_content = false;
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Measure new records (cached heights are reused when width is unchanged)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.room.messages.len(), content_width);
        layout.heights.truncate(reusable);
        for record in self.room.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(record, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.room.messages.len(), content_width);

        let total_height = self.state.layout.total_height();

        // 2. Follow the bottom of the new content, or stay within it
        if self.state.stick_to_bottom {
            self.state.pin_to_bottom();
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let entries = self.entries();
        let mut y_offset = self.state.layout.top_of(visible_range.start);
        for i in visible_range {
            let height = self.state.layout.heights[i];
            scroll_view.render_widget(entries[i], Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let current_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = current_offset < total_height.saturating_sub(area.height);
    }
}

/// Implemented on `MessageListState` because `MessageList` is rebuilt every
/// frame and cannot hold scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToLatest => self.scroll_to_latest(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running sum: `prefix_heights[i]` is the bottom edge of message `i`.
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for `message_count` records at `content_width`.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || message_count < self.message_count {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top edge of message `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights.get(index - 1).copied().unwrap_or(0)
        }
    }

    /// Indices worth rendering for the viewport, padded by half a screen each way.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{DEFAULT_AVATAR_URL, Identity};
    use crate::test_support::{buffer_text, record_from};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn room_with(texts: &[(&str, &str)]) -> ChatRoom {
        let mut room = ChatRoom::new(Identity::default());
        for (author, text) in texts {
            room.push_message(record_from(author, text));
        }
        room
    }

    fn draw(state: &mut MessageListState, room: &ChatRoom, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| MessageList::new(state, room, DEFAULT_AVATAR_URL).render(f, f.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn entries_preserve_count_and_order() {
        let room = room_with(&[("abc", "first"), ("xyz", "second"), ("abc", "third")]);
        let mut state = MessageListState::new();
        let list = MessageList::new(&mut state, &room, DEFAULT_AVATAR_URL);

        let entries = list.entries();
        let texts: Vec<_> = entries.iter().map(|m| m.record.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert_eq!(entries, list.entries(), "rendering twice gives the same entries");
    }

    #[test]
    fn entries_mark_own_messages_as_sent() {
        use crate::tui::components::message::Variant;

        let room = room_with(&[("abc", "mine"), ("xyz", "theirs")]);
        let mut state = MessageListState::new();
        let entries = MessageList::new(&mut state, &room, DEFAULT_AVATAR_URL).entries();
        assert_eq!(entries[0].variant, Variant::Sent);
        assert_eq!(entries[1].variant, Variant::Received);
    }

    #[test]
    fn render_draws_messages_in_input_order() {
        let room = room_with(&[("abc", "alpha"), ("xyz", "bravo"), ("abc", "charlie")]);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &room, 60, 20);

        let a = text.find("alpha").expect("alpha rendered");
        let b = text.find("bravo").expect("bravo rendered");
        let c = text.find("charlie").expect("charlie rendered");
        assert!(a < b && b < c);
        assert_eq!(state.layout.heights.len(), 3);
    }

    #[test]
    fn empty_list_renders_without_error() {
        let room = room_with(&[]);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &room, 40, 10);
        assert!(text.trim().is_empty());
        assert!(state.layout.heights.is_empty());
    }

    #[test]
    fn scroll_to_latest_on_empty_list_is_noop() {
        let mut state = MessageListState::new();
        state.scroll_to_latest();
        state.scroll_to_latest();
        assert!(state.stick_to_bottom);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn scroll_to_latest_shows_newest_after_scrolling_away() {
        let texts: Vec<String> = (0..30).map(|i| format!("message number {i}")).collect();
        let pairs: Vec<(&str, &str)> = texts.iter().map(|t| ("abc", t.as_str())).collect();
        let room = room_with(&pairs);
        let mut state = MessageListState::new();

        let text = draw(&mut state, &room, 40, 12);
        assert!(text.contains("message number 29"));

        for _ in 0..20 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        assert!(!state.stick_to_bottom);
        let text = draw(&mut state, &room, 40, 12);
        assert!(!text.contains("message number 29"));
        assert!(state.has_unseen_content);

        state.scroll_to_latest();
        let text = draw(&mut state, &room, 40, 12);
        assert!(text.contains("message number 29"));
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn appended_records_visible_after_one_render() {
        let mut room = room_with(&[("xyz", "m0")]);
        let mut state = MessageListState::new();
        draw(&mut state, &room, 40, 12);

        for i in 1..20 {
            room.push_message(record_from("xyz", &format!("m{i}")));
        }
        state.scroll_to_latest();
        let text = draw(&mut state, &room, 40, 12);

        assert!(state.stick_to_bottom);
        assert!(text.contains("m19"), "newest message should be on screen");
        assert_eq!(state.scroll_state.offset().y, state.layout.total_height() - 12);
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn pinned_list_follows_incoming_records() {
        let mut room = room_with(&[("xyz", "first")]);
        let mut state = MessageListState::new();
        draw(&mut state, &room, 40, 12);

        for i in 0..10 {
            room.push_message(record_from("xyz", &format!("incoming {i}")));
        }
        let text = draw(&mut state, &room, 40, 12);
        assert!(text.contains("incoming 9"));
    }

    #[test]
    fn layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.update_metadata(5, 80);

        // Same everything -> all reusable
        assert_eq!(cache.reusable_count(5, 80), 5);
        // New message appended -> existing 5 reusable
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Width changed -> nothing reusable
        assert_eq!(cache.reusable_count(5, 40), 0);
        // List shrank (room reset) -> nothing reusable
        assert_eq!(cache.reusable_count(2, 80), 0);
    }

    #[test]
    fn layout_cache_prefix_and_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 4, 5, 3, 3];
        cache.rebuild_prefix_heights();

        assert_eq!(cache.prefix_heights, [3, 7, 12, 15, 18]);
        assert_eq!(cache.total_height(), 18);
        assert_eq!(cache.top_of(0), 0);
        assert_eq!(cache.top_of(2), 7);

        // Viewport of 4 rows at offset 8, padded by 2 → rows 6..14
        assert_eq!(cache.visible_range(8, 4), 1..4);
    }
}

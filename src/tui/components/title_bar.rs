//! # TitleBar Component
//!
//! One-line status bar at the top of the chat room.
//!
//! Shows the app name and the current user, then (when present) the status
//! message, a sending indicator and "↓ New" when messages are waiting below
//! the viewport. The line is cut to the terminal width by display columns,
//! so wide characters in names never spill past the edge.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Stateless status bar. Every field is a prop set by the parent.
pub struct TitleBar {
    pub app_name: String,
    pub user_label: String,
    pub status_message: String,
    pub is_sending: bool,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(app_name: String, user_label: String, status_message: String) -> Self {
        Self {
            app_name,
            user_label,
            status_message,
            is_sending: false,
            has_unseen_content: false,
        }
    }

    pub fn text(&self) -> String {
        let mut parts = vec![format!("{} ({})", self.app_name, self.user_label)];
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        if self.is_sending && !self.status_message.starts_with("Sending") {
            parts.push("Sending...".to_string());
        }
        if self.has_unseen_content {
            parts.push("↓ New".to_string());
        }
        parts.join(" | ")
    }
}

/// Cut `text` to at most `max_width` display columns, ending in `…` when cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = truncate_to_width(&self.text(), area.width as usize);
        frame.render_widget(Span::raw(text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(title_bar: &mut TitleBar, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("Chat".into(), "abc".into(), String::new());
        let text = render(&mut title_bar, 40);
        assert!(text.contains("Chat (abc)"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_title_bar_with_status_and_unseen() {
        let mut title_bar = TitleBar::new("Chat".into(), "abc".into(), "Send failed".into());
        title_bar.has_unseen_content = true;
        let text = render(&mut title_bar, 60);
        assert!(text.contains("Chat (abc) | Send failed | ↓ New"));
    }

    #[test]
    fn test_sending_indicator_not_duplicated() {
        let mut title_bar = TitleBar::new("Chat".into(), "abc".into(), "Sending...".into());
        title_bar.is_sending = true;
        assert_eq!(title_bar.text(), "Chat (abc) | Sending...");

        title_bar.status_message = "Signed in as abc".into();
        assert_eq!(title_bar.text(), "Chat (abc) | Signed in as abc | Sending...");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        // Each CJK character is two columns wide
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::MessageRecord;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Which side of the conversation a message is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Written by the current user.
    Sent,
    /// Written by someone else.
    Received,
}

impl Variant {
    pub fn from_own(is_own_message: bool) -> Self {
        if is_own_message {
            Variant::Sent
        } else {
            Variant::Received
        }
    }

    pub fn style(self) -> Style {
        match self {
            Variant::Sent => Style::default().fg(Color::Green),
            Variant::Received => Style::default().fg(Color::Blue),
        }
    }
}

/// A stateless component that renders one chat message: author, text and
/// avatar reference.
///
/// `Message` is created fresh each frame by `MessageList`. It never fails:
/// a record without an avatar shows `default_avatar`, and empty text renders
/// as an empty body.
///
/// Sent messages put the author title on the right; received ones on the left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message<'a> {
    pub record: &'a MessageRecord,
    pub variant: Variant,
    pub default_avatar: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(record: &'a MessageRecord, is_own_message: bool, default_avatar: &'a str) -> Self {
        Self {
            record,
            variant: Variant::from_own(is_own_message),
            default_avatar,
        }
    }

    /// Avatar reference this message displays.
    pub fn avatar(&self) -> &'a str {
        self.record.avatar_or(self.default_avatar)
    }

    /// Predict the rendered height at `width` without rendering.
    ///
    /// The textwrap options must match ratatui's `Paragraph` wrapping so the
    /// list can lay out scroll positions from these numbers alone.
    pub fn calculate_height(record: &MessageRecord, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = record.text.trim();
        if content.is_empty() {
            return 1 + VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn footer(&self) -> String {
        format!(
            "{} · {}",
            self.record.created_at.format("%H:%M"),
            self.avatar()
        )
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.variant.style();
        let border_style = style.add_modifier(Modifier::DIM);
        let meta_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        let author = Line::from(self.record.author_uid.as_str());
        let footer = Line::from(self.footer()).style(meta_style);
        let (author, footer) = match self.variant {
            Variant::Sent => (author.right_aligned(), footer.right_aligned()),
            Variant::Received => (author.left_aligned(), footer.left_aligned()),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(author)
            .title_style(style.add_modifier(Modifier::BOLD))
            .title_bottom(footer)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.record.text.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::DEFAULT_AVATAR_URL;
    use crate::test_support::{buffer_text, record_from};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(message: Message<'_>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(message, f.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn missing_avatar_uses_default() {
        let record = record_from("abc", "hi");
        let message = Message::new(&record, true, DEFAULT_AVATAR_URL);
        assert_eq!(message.avatar(), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn configured_default_avatar_is_respected() {
        let record = record_from("abc", "hi");
        let message = Message::new(&record, true, "placeholder.png");
        assert_eq!(message.avatar(), "placeholder.png");
    }

    #[test]
    fn present_avatar_used_verbatim() {
        let mut record = record_from("abc", "hi");
        record.avatar_url = Some("https://example.com/a.png".into());
        let message = Message::new(&record, false, DEFAULT_AVATAR_URL);
        assert_eq!(message.avatar(), "https://example.com/a.png");
    }

    #[test]
    fn own_flag_selects_variant() {
        let record = record_from("abc", "hi");
        assert_eq!(Message::new(&record, true, "").variant, Variant::Sent);
        assert_eq!(Message::new(&record, false, "").variant, Variant::Received);
        assert_eq!(Variant::Sent.style().fg, Some(Color::Green));
        assert_eq!(Variant::Received.style().fg, Some(Color::Blue));
    }

    #[test]
    fn render_shows_author_text_and_avatar() {
        let mut record = record_from("alice", "hello there");
        record.avatar_url = Some("a.png".into());
        let text = render_to_text(Message::new(&record, false, DEFAULT_AVATAR_URL), 40, 3);
        assert!(text.contains("alice"));
        assert!(text.contains("hello there"));
        assert!(text.contains("a.png"));
    }

    #[test]
    fn empty_text_renders_without_panic() {
        let record = record_from("alice", "");
        let text = render_to_text(Message::new(&record, true, DEFAULT_AVATAR_URL), 40, 3);
        assert!(text.contains("alice"));
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_keeps_one_body_row() {
        let record = record_from("abc", "   ");
        assert_eq!(Message::calculate_height(&record, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let record = record_from("abc", "Hello world");
        assert_eq!(Message::calculate_height(&record, 0), 1);
        assert_eq!(Message::calculate_height(&record, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let record = record_from("abc", "Hello");
        assert_eq!(Message::calculate_height(&record, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let record = record_from("abc", "Hello world");
        // width 9 → content_width 5: "Hello" | "world"
        assert_eq!(Message::calculate_height(&record, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        let record = record_from("abc", "abcdefghij");
        // width 8 → content_width 4: "abcd" | "efgh" | "ij"
        assert_eq!(Message::calculate_height(&record, 8), 3 + VERTICAL_OVERHEAD);
    }
}

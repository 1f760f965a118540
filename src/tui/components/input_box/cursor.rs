//! Cursor movement and row layout for the compose input.
//!
//! The draft is hard-wrapped by display columns (`unicode-width`), and the
//! same walk places the cursor, so the drawn text and the terminal cursor
//! always agree. `pos` is a byte offset that always sits on a char boundary.

use unicode_width::UnicodeWidthChar;

/// Draft rows shown before the input starts scrolling internally.
pub(super) const MAX_VISIBLE_LINES: u16 = 5;

pub(super) struct CursorState {
    /// Byte offset into the draft (0..=draft.len())
    pub pos: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self { pos: 0 }
    }

    pub fn to_end(&mut self, text: &str) {
        self.pos = text.len();
    }

    /// Returns `true` if the cursor moved.
    pub fn left(&mut self, text: &str) -> bool {
        match text[..self.pos].char_indices().next_back() {
            Some((i, _)) => {
                self.pos = i;
                true
            }
            None => false,
        }
    }

    pub fn right(&mut self, text: &str) -> bool {
        match text[self.pos..].chars().next() {
            Some(c) => {
                self.pos += c.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Start of the current logical line.
    pub fn home(&mut self, text: &str) -> bool {
        let start = text[..self.pos].rfind('\n').map_or(0, |i| i + 1);
        let moved = start != self.pos;
        self.pos = start;
        moved
    }

    /// End of the current logical line.
    pub fn end(&mut self, text: &str) -> bool {
        let end = text[self.pos..]
            .find('\n')
            .map_or(text.len(), |i| self.pos + i);
        let moved = end != self.pos;
        self.pos = end;
        moved
    }

    /// Byte range of the char before the cursor, for backspace.
    pub fn prev_char(&self, text: &str) -> Option<std::ops::Range<usize>> {
        text[..self.pos]
            .char_indices()
            .next_back()
            .map(|(i, _)| i..self.pos)
    }

    /// Byte range of the char under the cursor, for delete.
    pub fn next_char(&self, text: &str) -> Option<std::ops::Range<usize>> {
        text[self.pos..]
            .chars()
            .next()
            .map(|c| self.pos..self.pos + c.len_utf8())
    }
}

/// Walk `text` placing each char into (row, column) cells `width` columns wide.
/// Calls `place(byte_index, char, row)` for every non-newline char.
fn walk<F>(text: &str, width: usize, mut place: F) -> (usize, usize)
where
    F: FnMut(usize, char, usize),
{
    let (mut row, mut col) = (0, 0);
    for (i, c) in text.char_indices() {
        if c == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            row += 1;
            col = 0;
        }
        place(i, c, row);
        col += w;
    }
    (row, col)
}

/// Split `text` into display rows at most `width` columns wide.
/// Always returns at least one (possibly empty) row.
pub(super) fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let (last_row, _) = walk(text, width, |_, c, row| {
        while rows.len() <= row {
            rows.push(String::new());
        }
        rows[row].push(c);
    });
    // Trailing newlines produce empty rows the walk never placed a char in.
    while rows.len() <= last_row {
        rows.push(String::new());
    }
    rows
}

/// (row, column) where the cursor at byte `pos` is drawn.
pub(super) fn cursor_cell(text: &str, pos: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let (row, col) = walk(&text[..pos], width, |_, _, _| {});
    // A full row pushes the cursor onto the next one.
    if col >= width { (row + 1, 0) } else { (row, col) }
}

/// Rows the input needs: the wrapped text, plus one if the cursor sits past a full row.
pub(super) fn row_count(text: &str, width: usize) -> usize {
    let rows = wrap_rows(text, width).len();
    let (cursor_row, _) = cursor_cell(text, text.len(), width);
    rows.max(cursor_row + 1)
}

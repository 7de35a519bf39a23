//! Cursor for reading finished transcripts.

use crate::line::LogLine;

/// Direction of the last cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards later lines
    Forward,
    /// Towards earlier lines
    Backward,
}

/// Positional reader over captured lines
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [LogLine],
    position: usize,
    direction: Direction,
}

impl<'a> LineCursor<'a> {
    /// Cursor at the first line
    #[must_use]
    pub fn new(lines: &'a [LogLine]) -> Self {
        Self {
            lines,
            position: 0,
            direction: Direction::Forward,
        }
    }

    /// Read the current line and advance
    pub fn next(&mut self) -> Option<&'a LogLine> {
        let line = self.lines.get(self.position)?;
        self.position += 1;
        self.direction = Direction::Forward;
        Some(line)
    }

    /// Step back one line and read it
    pub fn prev(&mut self) -> Option<&'a LogLine> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.direction = Direction::Backward;
        self.lines.get(self.position)
    }

    /// Read the current line without moving
    #[must_use]
    pub fn peek(&self) -> Option<&'a LogLine> {
        self.lines.get(self.position)
    }

    /// Move to an absolute position, clamped to the end
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.lines.len());
    }

    /// Advance until a line with this text is found; the cursor stops after it.
    pub fn find(&mut self, text: &str) -> Option<&'a LogLine> {
        while let Some(line) = self.next() {
            if line.text() == text {
                return Some(line);
            }
        }
        None
    }

    /// Whether `expected` occurs in order (not necessarily adjacent) from here
    pub fn contains_in_order<S: AsRef<str>>(&mut self, expected: &[S]) -> bool {
        expected.iter().all(|text| self.find(text.as_ref()).is_some())
    }

    /// Current position
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.position
    }

    /// Direction of the last move
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Lines left to read
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.position)
    }

    /// Whether every line has been read
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// Back to the first line
    pub fn reset(&mut self) {
        self.position = 0;
        self.direction = Direction::Forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Origin;
    use lantern_core::Offset;

    fn make_lines(texts: &[&str]) -> Vec<LogLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LogLine::new(i as u64, *t, Offset::zero(), Origin::Sync))
            .collect()
    }

    #[test]
    fn test_cursor_next_prev() {
        let lines = make_lines(&["a", "b"]);
        let mut cursor = LineCursor::new(&lines);
        assert_eq!(cursor.next().unwrap().text(), "a");
        assert_eq!(cursor.next().unwrap().text(), "b");
        assert!(cursor.next().is_none());

        assert_eq!(cursor.prev().unwrap().text(), "b");
        assert_eq!(cursor.direction(), Direction::Backward);
    }

    #[test]
    fn test_cursor_prev_at_start() {
        let lines = make_lines(&["a"]);
        let mut cursor = LineCursor::new(&lines);
        assert!(cursor.prev().is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_cursor_peek() {
        let lines = make_lines(&["a"]);
        let cursor = LineCursor::new(&lines);
        assert_eq!(cursor.peek().unwrap().text(), "a");
        assert_eq!(cursor.peek().unwrap().text(), "a");
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_cursor_seek_clamps() {
        let lines = make_lines(&["a", "b"]);
        let mut cursor = LineCursor::new(&lines);
        cursor.seek(100);
        assert_eq!(cursor.pos(), 2);
        assert!(cursor.is_end());

        cursor.reset();
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_contains_in_order() {
        let lines = make_lines(&["start", "x", "middle", "y", "end"]);
        assert!(LineCursor::new(&lines).contains_in_order(&["start", "middle", "end"]));
        assert!(!LineCursor::new(&lines).contains_in_order(&["end", "start"]));
    }
}

/// Single-line text input with a cursor, used by the add/edit popups.
///
/// The cursor is a char offset, so multi-byte input is handled without
/// splitting code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    content: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        LineEditor { content, cursor }
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and put the cursor at the end.
    pub fn set(&mut self, content: impl Into<String>) {
        *self = LineEditor::new(content);
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace: remove the char before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.content.remove(at);
        self.cursor -= 1;
    }

    /// Delete: remove the char under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start_of_line(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end_of_line(&mut self) {
        self.cursor = self.content.chars().count();
    }

    /// Text before the cursor, the char under it (if any), and the rest.
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_offset(self.cursor);
        let (before, rest) = self.content.split_at(at);
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) => (before, Some(c), chars.as_str()),
            None => (before, None, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_puts_cursor_at_end() {
        let ed = LineEditor::new("héllo");
        assert_eq!(ed.cursor(), 5);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut ed = LineEditor::new("ac");
        ed.move_cursor_left();
        ed.insert_char('b');
        assert_eq!(ed.value(), "abc");
        assert_eq!(ed.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut ed = LineEditor::new("añb");
        ed.delete_char();
        assert_eq!(ed.value(), "añ");
        ed.move_to_start_of_line();
        ed.delete_char();
        assert_eq!(ed.value(), "añ");
        ed.delete_forward();
        assert_eq!(ed.value(), "ñ");
        ed.move_to_end_of_line();
        ed.delete_forward();
        assert_eq!(ed.value(), "ñ");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut ed = LineEditor::new("ab");
        ed.move_cursor_right();
        assert_eq!(ed.cursor(), 2);
        ed.move_to_start_of_line();
        ed.move_cursor_left();
        assert_eq!(ed.cursor(), 0);
    }

    #[test]
    fn test_split_at_cursor() {
        let mut ed = LineEditor::new("abc");
        assert_eq!(ed.split_at_cursor(), ("abc", None, ""));
        ed.move_cursor_left();
        ed.move_cursor_left();
        assert_eq!(ed.split_at_cursor(), ("a", Some('b'), "c"));
    }

    #[test]
    fn test_set_and_clear() {
        let mut ed = LineEditor::default();
        ed.set("xyz");
        assert_eq!(ed.cursor(), 3);
        ed.clear();
        assert_eq!(ed.value(), "");
        assert_eq!(ed.cursor(), 0);
    }
}

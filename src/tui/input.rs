// Input line editing
//
// A single-line text buffer with a cursor. The cursor is a char index, so
// editing never splits a multi-byte character.

/// Single-line editable text with a cursor
#[derive(Debug, Default, Clone)]
pub struct InputLine {
    text: String,
    /// Cursor position in chars, 0..=char count
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the line empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputLine {
        let mut line = InputLine::new();
        s.chars().for_each(|c| line.insert(c));
        line
    }

    #[test]
    fn test_insert_and_take() {
        let mut line = typed("/3 hi");
        assert_eq!(line.text(), "/3 hi");
        assert_eq!(line.cursor(), 5);
        assert_eq!(line.take(), "/3 hi");
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut line = typed("hllo");
        line.move_home();
        line.move_right();
        line.insert('e');
        assert_eq!(line.text(), "hello");

        line.move_end();
        line.backspace();
        assert_eq!(line.text(), "hell");

        line.move_home();
        line.delete();
        assert_eq!(line.text(), "ell");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut line = typed("日本語");
        line.move_left();
        line.backspace();
        assert_eq!(line.text(), "日語");
        line.insert('→');
        assert_eq!(line.text(), "日→語");
        assert_eq!(line.cursor(), 2);
    }

    #[test]
    fn test_edges_are_noops() {
        let mut line = InputLine::new();
        line.backspace();
        line.delete();
        line.move_left();
        line.move_right();
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }
}

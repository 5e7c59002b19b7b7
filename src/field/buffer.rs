use super::{SelectionRange, TextField};

/// An in-memory single-line field with the editing primitives of a plain
/// text input. Typing replaces the selection; positions are in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferField {
    value: String,
    selection: SelectionRange,
}

impl BufferField {
    /// Creates a field holding `value` with the caret at its end.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = char_count(value.as_str());
        Self {
            value,
            selection: SelectionRange::caret(end),
        }
    }

    pub fn caret(&self) -> usize {
        self.selection.end
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut chars: Vec<char> = self.value.chars().collect();
        let range = self.clamped_selection(chars.len());
        chars.splice(range.start..range.end, [ch]);
        self.value = chars.into_iter().collect();
        self.selection = SelectionRange::caret(range.start + 1);
    }

    pub fn backspace(&mut self) -> bool {
        let range = self.clamped_selection(char_count(self.value.as_str()));
        if !range.is_empty() {
            return self.delete_range(range);
        }
        if range.start == 0 {
            return false;
        }
        self.delete_range(SelectionRange::new(range.start - 1, range.start))
    }

    pub fn delete(&mut self) -> bool {
        let len = char_count(self.value.as_str());
        let range = self.clamped_selection(len);
        if !range.is_empty() {
            return self.delete_range(range);
        }
        if range.end >= len {
            return false;
        }
        self.delete_range(SelectionRange::new(range.end, range.end + 1))
    }

    pub fn move_left(&mut self) -> bool {
        let pos = self.caret().min(char_count(self.value.as_str()));
        if pos == 0 {
            return false;
        }
        self.selection = SelectionRange::caret(pos - 1);
        true
    }

    pub fn move_right(&mut self) -> bool {
        let len = char_count(self.value.as_str());
        let pos = self.caret().min(len);
        if pos >= len {
            return false;
        }
        self.selection = SelectionRange::caret(pos + 1);
        true
    }

    pub fn move_home(&mut self) {
        self.selection = SelectionRange::caret(0);
    }

    pub fn move_end(&mut self) {
        self.selection = SelectionRange::caret(char_count(self.value.as_str()));
    }

    pub fn select_all(&mut self) {
        self.selection = SelectionRange::new(0, char_count(self.value.as_str()));
    }

    fn delete_range(&mut self, range: SelectionRange) -> bool {
        let mut chars: Vec<char> = self.value.chars().collect();
        chars.drain(range.start..range.end);
        self.value = chars.into_iter().collect();
        self.selection = SelectionRange::caret(range.start);
        true
    }

    fn clamped_selection(&self, len: usize) -> SelectionRange {
        SelectionRange::new(self.selection.start.min(len), self.selection.end.min(len))
    }
}

impl TextField for BufferField {
    fn value(&self) -> &str {
        self.value.as_str()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        let len = char_count(value);
        self.selection = self.clamped_selection(len);
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        let len = char_count(self.value.as_str());
        self.selection = SelectionRange::new(selection.start.min(len), selection.end.min(len));
    }
}

pub(crate) fn char_count(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::BufferField;
    use crate::field::{SelectionRange, TextField};

    #[test]
    fn new_field_puts_caret_at_end() {
        let field = BufferField::new("123");
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut field = BufferField::new("123-45");
        field.set_selection(SelectionRange::new(1, 3));
        field.insert_char('9');
        assert_eq!(field.value(), "19-45");
        assert_eq!(field.selection(), SelectionRange::caret(2));
    }

    #[test]
    fn backspace_and_delete_remove_around_caret() {
        let mut field = BufferField::new("abc");
        field.set_selection(SelectionRange::caret(1));
        assert!(field.backspace());
        assert_eq!(field.value(), "bc");
        assert!(!field.backspace());
        assert!(field.delete());
        assert_eq!(field.value(), "c");
        field.move_end();
        assert!(!field.delete());
    }

    #[test]
    fn movement_stays_in_bounds() {
        let mut field = BufferField::new("ab");
        assert!(!field.move_right());
        assert!(field.move_left());
        assert!(field.move_left());
        assert!(!field.move_left());
        field.move_end();
        assert_eq!(field.caret(), 2);
        field.move_home();
        assert_eq!(field.caret(), 0);
    }

    #[test]
    fn set_value_clamps_selection() {
        let mut field = BufferField::new("123-45");
        field.select_all();
        field.set_value("12");
        assert_eq!(field.selection(), SelectionRange::new(0, 2));
    }

    #[test]
    fn counts_positions_in_chars() {
        let mut field = BufferField::new("é");
        field.insert_char('x');
        assert_eq!(field.value(), "éx");
        assert_eq!(field.caret(), 2);
    }
}

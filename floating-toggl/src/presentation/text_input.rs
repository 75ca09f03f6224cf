/// A single-line text input with a cursor and an optional selection.
///
/// `anchor` is the fixed end of the selection; the cursor is the moving end.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
    pub anchor: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
            anchor: None,
        }
    }

    /// Byte range of the selection, if any characters are selected.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let (start, end) = if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        };
        (start != end).then_some((start, end))
    }

    /// More than one character selected.
    pub fn has_multi_char_selection(&self) -> bool {
        self.selection()
            .is_some_and(|(start, end)| self.value[start..end].chars().count() > 1)
    }

    /// Insert a character at the cursor, replacing the selection.
    pub fn insert(&mut self, c: char) {
        self.delete_selection();
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the selection, or the character before the cursor.
    pub fn backspace(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.selection() {
            self.cursor = start;
        } else if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
        self.anchor = None;
    }

    pub fn move_right(&mut self) {
        if let Some((_, end)) = self.selection() {
            self.cursor = end;
        } else if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
        self.anchor = None;
    }

    pub fn select_left(&mut self) {
        self.anchor.get_or_insert(self.cursor);
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn select_right(&mut self) {
        self.anchor.get_or_insert(self.cursor);
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.value.len();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
        self.anchor = None;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
        self.anchor = None;
    }

    fn delete_selection(&mut self) -> bool {
        let selection = self.selection();
        self.anchor = None;
        match selection {
            Some((start, end)) => {
                self.value.drain(start..end);
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        debug_assert!(pos > 0, "prev_boundary called with pos == 0");
        let mut p = pos;
        loop {
            p -= 1;
            if self.value.is_char_boundary(p) {
                return p;
            }
        }
    }

    fn next_boundary(&self, pos: usize) -> usize {
        debug_assert!(
            pos < self.value.len(),
            "next_boundary called at end of string"
        );
        let mut p = pos + 1;
        while p <= self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_handle_multibyte_chars() {
        let mut input = TextInput::new();
        for c in "häj".chars() {
            input.insert(c);
        }
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "hj");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn shift_selection_is_replaced_by_typing() {
        let mut input = TextInput::from_str("hello");
        input.select_left();
        input.select_left();
        assert_eq!(input.selection(), Some((3, 5)));
        assert!(input.has_multi_char_selection());

        input.insert('p');
        assert_eq!(input.value, "help");
        assert_eq!(input.selection(), None);
    }

    #[test]
    fn single_char_selection_is_not_multi() {
        let mut input = TextInput::from_str("hello");
        input.select_left();
        assert!(!input.has_multi_char_selection());
    }

    #[test]
    fn select_all_then_backspace_clears() {
        let mut input = TextInput::from_str("hello");
        input.select_all();
        input.backspace();
        assert_eq!(input.value, "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn moving_collapses_selection() {
        let mut input = TextInput::from_str("hello");
        input.select_all();
        input.move_left();
        assert_eq!(input.cursor, 0);
        assert_eq!(input.selection(), None);
    }
}

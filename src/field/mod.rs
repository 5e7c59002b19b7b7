//! Text fields a mask can be bound to.
//!
//! The mask core never touches a field directly. [`TextField`] is the small
//! surface an adapter needs (value and selection, both read and write), and
//! [`MaskedField`] wires a field to a [`crate::mask::MaskHandle`].

mod binding;
mod buffer;

pub use binding::MaskedField;
pub use buffer::BufferField;

/// A selection as a char range, normalized so `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed selection: just a caret.
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

pub trait TextField {
    fn value(&self) -> &str;

    fn set_value(&mut self, value: &str);

    fn selection(&self) -> SelectionRange;

    fn set_selection(&mut self, selection: SelectionRange);

    /// Whether the field holds free text a mask can apply to.
    fn is_text_capable(&self) -> bool {
        true
    }
}

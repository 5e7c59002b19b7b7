/// Per-field state kept between edits: the last value the mask accepted,
/// which every later edit is diffed against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskState {
    last_good: String,
}

impl MaskState {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            last_good: initial.into(),
        }
    }

    pub fn last_good(&self) -> &str {
        self.last_good.as_str()
    }

    pub(super) fn commit(&mut self, value: impl Into<String>) {
        self.last_good = value.into();
    }
}

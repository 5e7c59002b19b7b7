use super::engine::{KeystrokeOutcome, Reformat, Reformatter, splice_chars};
use super::error::{MaskError, Rejection};
use super::pattern::CompiledPattern;
use super::state::MaskState;
use crate::field::SelectionRange;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// Auto-complete literal separators while typing. When off, only slot
    /// content is checked and the user has to type literals themselves.
    pub insert_static_characters: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            insert_static_characters: true,
        }
    }
}

/// What a field should show after a raw edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value did not change.
    Unchanged,
    /// Keep (or write) this value and move the caret here.
    Accepted { value: String, caret: usize },
    /// Restore this value, the last one accepted, and move the caret here.
    Rejected {
        value: String,
        caret: usize,
        reason: Rejection,
    },
}

/// A mask attached to a single field.
#[derive(Debug, Clone)]
pub struct MaskHandle {
    pattern: CompiledPattern,
    options: MaskOptions,
    state: Option<MaskState>,
}

impl MaskHandle {
    pub fn attach(
        pattern: &str,
        options: MaskOptions,
        initial: impl Into<String>,
    ) -> Result<Self, MaskError> {
        if pattern.is_empty() {
            return Err(MaskError::MissingPattern);
        }

        let pattern = CompiledPattern::compile(pattern)?;
        let initial = initial.into();
        if !pattern.validate(initial.as_str()) {
            warn!(
                mask = pattern.mask(),
                initial = initial.as_str(),
                "initial value does not fit the mask; masking waits until it does"
            );
        }

        Ok(Self {
            pattern,
            options,
            state: Some(MaskState::new(initial)),
        })
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn options(&self) -> MaskOptions {
        self.options
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&MaskState> {
        self.state.as_ref()
    }

    pub fn last_good(&self) -> Option<&str> {
        self.state.as_ref().map(MaskState::last_good)
    }

    /// The entered characters of the last accepted value without literals,
    /// e.g. `5551234567` for `(555) 123-4567`.
    pub fn unmasked_value(&self) -> Option<String> {
        let last_good = self.last_good()?;
        let buffer = self.pattern.dynamic_buffer(last_good)?;
        Some(buffer.into_iter().collect())
    }

    /// Reactive entry point: `value` already holds the edit and `caret` is
    /// where the field put the caret afterwards.
    pub fn handle_raw_edit(&mut self, value: &str, caret: usize) -> EditOutcome {
        let Some(state) = self.state.as_mut() else {
            return EditOutcome::Accepted {
                value: value.to_string(),
                caret,
            };
        };
        if value == state.last_good() {
            return EditOutcome::Unchanged;
        }

        let engine = Reformatter::new(&self.pattern, self.options.insert_static_characters);
        match engine.reformat(state.last_good(), value, caret) {
            Reformat::Accepted { value, caret } => {
                state.commit(value.as_str());
                EditOutcome::Accepted { value, caret }
            }
            Reformat::Rejected { caret, reason } => EditOutcome::Rejected {
                value: state.last_good().to_string(),
                caret,
                reason,
            },
            Reformat::Resync => {
                state.commit(value);
                EditOutcome::Accepted {
                    value: value.to_string(),
                    caret,
                }
            }
        }
    }

    /// Preventive entry point: decides on `key` before it reaches `value`.
    pub fn handle_keystroke(
        &mut self,
        value: &str,
        selection: SelectionRange,
        key: char,
    ) -> KeystrokeOutcome {
        let Some(state) = self.state.as_mut() else {
            return KeystrokeOutcome::Allow;
        };

        let engine = Reformatter::new(&self.pattern, self.options.insert_static_characters);
        let outcome = engine.keystroke(value, selection, key);
        match &outcome {
            KeystrokeOutcome::Allow => {
                let chars: Vec<char> = value.chars().collect();
                let start = selection.start.min(chars.len());
                let end = selection.end.clamp(start, chars.len());
                state.commit(splice_chars(&chars, start, end, &[key]));
            }
            KeystrokeOutcome::Replace { value, .. } => state.commit(value.as_str()),
            KeystrokeOutcome::Drop => debug!(key = %key, "keystroke dropped"),
        }
        outcome
    }

    /// Releases the per-field state. Later edits pass through unmasked.
    pub fn detach(&mut self) {
        if self.state.take().is_some() {
            debug!(mask = self.pattern.mask(), "mask detached");
        }
    }
}

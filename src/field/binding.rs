use super::{SelectionRange, TextField};
use crate::config::{MaskConfig, Mode};
use crate::mask::{EditOutcome, KeystrokeOutcome, MaskError, MaskHandle};
use tracing::warn;

/// A text field with a mask bound to it.
///
/// The host edits the field as usual, then reports each edit through
/// [`MaskedField::on_input`] (and, in preventive mode, each typed key through
/// [`MaskedField::on_key`] first). Caret moves that follow a value write are
/// held back until the next [`MaskedField::tick`], since some hosts drop a
/// selection set in the same turn as the value.
pub struct MaskedField<F: TextField> {
    field: F,
    handle: Option<MaskHandle>,
    mode: Mode,
    pending_caret: Option<usize>,
    change_pending: bool,
    diagnostic: Option<MaskError>,
}

impl<F: TextField> MaskedField<F> {
    /// Binds `config` to `field`. A configuration problem leaves the field
    /// unmasked and is kept in [`MaskedField::diagnostic`].
    pub fn bind(field: F, config: &MaskConfig) -> Self {
        let attached = if field.is_text_capable() {
            config.attach(field.value())
        } else {
            Err(MaskError::UnsupportedField)
        };

        let (handle, diagnostic) = match attached {
            Ok(handle) => (Some(handle), None),
            Err(err) => {
                warn!(error = %err, "mask not attached; field stays unmasked");
                (None, Some(err))
            }
        };

        Self {
            field,
            handle,
            mode: config.mode,
            pending_caret: None,
            change_pending: false,
            diagnostic,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    /// Direct access for applying raw edits; report them with `on_input`.
    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub fn handle(&self) -> Option<&MaskHandle> {
        self.handle.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_masked(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.is_attached())
    }

    pub fn diagnostic(&self) -> Option<&MaskError> {
        self.diagnostic.as_ref()
    }

    /// Runs the field's current value through the mask after an edit.
    pub fn on_input(&mut self) -> EditOutcome {
        let value = self.field.value().to_string();
        let caret = self.field.selection().end;
        let Some(handle) = self.handle.as_mut() else {
            return EditOutcome::Accepted { value, caret };
        };

        let outcome = handle.handle_raw_edit(value.as_str(), caret);
        match &outcome {
            EditOutcome::Accepted {
                value: accepted,
                caret,
            } if *accepted != value => self.sync(accepted.as_str(), *caret),
            EditOutcome::Rejected { value, caret, .. } => self.sync(value.as_str(), *caret),
            _ => {}
        }
        outcome
    }

    /// Vets a typed key before it is applied. Returns whether the host should
    /// still apply the key itself.
    pub fn on_key(&mut self, key: char) -> bool {
        if self.mode != Mode::Preventive {
            return true;
        }
        let Some(handle) = self.handle.as_mut() else {
            return true;
        };

        let value = self.field.value().to_string();
        match handle.handle_keystroke(value.as_str(), self.field.selection(), key) {
            KeystrokeOutcome::Allow => true,
            KeystrokeOutcome::Replace { value, caret } => {
                self.sync(value.as_str(), caret);
                false
            }
            KeystrokeOutcome::Drop => false,
        }
    }

    /// Applies a caret move deferred by the last value write.
    pub fn tick(&mut self) -> bool {
        match self.pending_caret.take() {
            Some(caret) => {
                self.field.set_selection(SelectionRange::caret(caret));
                true
            }
            None => false,
        }
    }

    /// Reports, once, whether the mask rewrote the value since the last blur.
    /// Hosts that do not emit change events for programmatic writes can use
    /// this to raise one themselves.
    pub fn on_blur(&mut self) -> bool {
        std::mem::take(&mut self.change_pending)
    }

    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.detach();
        }
        self.pending_caret = None;
    }

    pub fn into_inner(self) -> F {
        self.field
    }

    fn sync(&mut self, value: &str, caret: usize) {
        self.field.set_value(value);
        self.pending_caret = Some(caret);
        self.change_pending = true;
    }
}

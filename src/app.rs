use crate::config::MaskConfig;
use crate::field::{BufferField, MaskedField, TextField};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, Span, Terminal};
use std::io;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Submit,
    Abort,
}

/// One labelled masked field driven by terminal key events.
pub struct MaskApp {
    label: String,
    field: MaskedField<BufferField>,
}

impl MaskApp {
    pub fn new(label: impl Into<String>, config: &MaskConfig, initial: &str) -> Self {
        Self {
            label: label.into(),
            field: MaskedField::bind(BufferField::new(initial), config),
        }
    }

    pub fn field(&self) -> &MaskedField<BufferField> {
        &self.field
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> AppControl {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return match key_event.code {
                KeyCode::Char('c') => AppControl::Abort,
                KeyCode::Char('a') => {
                    self.field.field_mut().select_all();
                    AppControl::Continue
                }
                _ => AppControl::Continue,
            };
        }
        // Alt chords are terminal shortcuts, not text.
        if key_event.modifiers.contains(KeyModifiers::ALT) {
            return AppControl::Continue;
        }

        match key_event.code {
            KeyCode::Esc => return AppControl::Abort,
            KeyCode::Enter => return AppControl::Submit,
            KeyCode::Char(ch) => {
                if self.field.on_key(ch) {
                    self.field.field_mut().insert_char(ch);
                    self.after_edit();
                }
            }
            KeyCode::Backspace => {
                if self.field.field_mut().backspace() {
                    self.after_edit();
                }
            }
            KeyCode::Delete => {
                if self.field.field_mut().delete() {
                    self.after_edit();
                }
            }
            KeyCode::Left => {
                self.field.field_mut().move_left();
            }
            KeyCode::Right => {
                self.field.field_mut().move_right();
            }
            KeyCode::Home => self.field.field_mut().move_home(),
            KeyCode::End => self.field.field_mut().move_end(),
            KeyCode::Other => {}
        }
        AppControl::Continue
    }

    /// Applies deferred caret moves. Returns true when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.field.tick()
    }

    pub fn value(&self) -> &str {
        self.field.field().value()
    }

    /// The typed characters without mask literals, or the raw value when no
    /// mask is bound.
    pub fn unmasked(&self) -> String {
        self.field
            .handle()
            .and_then(|handle| handle.unmasked_value())
            .unwrap_or_else(|| self.value().to_string())
    }

    pub fn spans(&self) -> Vec<Span> {
        let value = self.value();
        let mut spans = vec![Span::new(self.label.as_str()), Span::new(value)];
        if let Some(handle) = self.field.handle().filter(|handle| handle.is_attached()) {
            let tail = handle.pattern().placeholder_tail(value.chars().count());
            if !tail.is_empty() {
                spans.push(Span::dim(tail));
            }
        }
        spans
    }

    pub fn cursor_col(&self) -> u16 {
        let caret = self.field.field().caret();
        let before: String = self.value().chars().take(caret).collect();
        let width = self.label.width() + before.width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    pub fn render(&self, terminal: &mut Terminal) -> io::Result<()> {
        terminal.redraw_line(&self.spans(), self.cursor_col())
    }

    fn after_edit(&mut self) {
        self.field.on_input();
    }
}

use super::diff::{EditDelta, diff};
use super::error::Rejection;
use super::model::{Run, Segment};
use super::pattern::{CompiledPattern, Rebuilt};
use crate::field::SelectionRange;
use tracing::{debug, warn};

/// Result of running a raw edit through the reactive formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reformat {
    /// The value to keep and where the caret goes.
    Accepted { value: String, caret: usize },
    /// The edit cannot be kept; restore the baseline with the caret here.
    Rejected { caret: usize, reason: Rejection },
    /// The baseline no longer decomposes; adopt the raw value as the new
    /// baseline instead of failing the edit.
    Resync,
}

/// Decision for a single keystroke intercepted before it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// Let the keystroke land unmodified.
    Allow,
    /// Cancel the keystroke and write this value instead.
    Replace { value: String, caret: usize },
    /// Cancel the keystroke; the value stays as it is.
    Drop,
}

/// The reformatting state transitions for one compiled pattern.
///
/// Both entry points share the same validator and segment walk: the reactive
/// [`Reformatter::reformat`] repairs an edit after it has landed, while
/// [`Reformatter::keystroke`] vets a single key before it is applied.
pub struct Reformatter<'a> {
    pattern: &'a CompiledPattern,
    insert_static: bool,
}

impl<'a> Reformatter<'a> {
    pub fn new(pattern: &'a CompiledPattern, insert_static: bool) -> Self {
        Self {
            pattern,
            insert_static,
        }
    }

    pub fn reformat(&self, baseline: &str, raw: &str, caret: usize) -> Reformat {
        if self.pattern.validate(raw) {
            return Reformat::Accepted {
                value: raw.to_string(),
                caret,
            };
        }

        // Masking stays dormant until the field first holds a conforming value.
        if !self.pattern.validate(baseline) {
            debug!(baseline, "baseline does not conform; passing edit through");
            return Reformat::Accepted {
                value: raw.to_string(),
                caret,
            };
        }

        let delta = diff(baseline, raw);
        // The caret follows the inserted text, so the edit began this far back.
        let edit_start = caret.saturating_sub(delta.inserted_len());
        let revert_caret = edit_start.min(baseline.chars().count());

        if delta.is_noop() {
            return Reformat::Accepted {
                value: raw.to_string(),
                caret,
            };
        }

        if !self.insert_static {
            return Reformat::Rejected {
                caret: revert_caret,
                reason: Rejection::Unreformattable,
            };
        }

        let Some(runs) = self.pattern.decompose(baseline) else {
            warn!(
                mask = self.pattern.mask(),
                baseline, "last accepted value no longer decomposes; resyncing"
            );
            return Reformat::Resync;
        };

        match self.splice(&runs, &delta, edit_start) {
            Ok(rebuilt) => {
                if self.pattern.validate(rebuilt.value.as_str()) {
                    debug!(raw, value = %rebuilt.value, caret = rebuilt.caret, "edit reformatted");
                    Reformat::Accepted {
                        value: rebuilt.value,
                        caret: rebuilt.caret,
                    }
                } else {
                    debug!(raw, candidate = %rebuilt.value, "reformatted edit still invalid");
                    Reformat::Rejected {
                        caret: revert_caret,
                        reason: Rejection::Unreformattable,
                    }
                }
            }
            Err(reason) => {
                debug!(raw, %reason, "edit rejected");
                Reformat::Rejected {
                    caret: revert_caret,
                    reason,
                }
            }
        }
    }

    pub fn keystroke(&self, value: &str, selection: SelectionRange, key: char) -> KeystrokeOutcome {
        let chars: Vec<char> = value.chars().collect();
        let start = selection.start.min(chars.len());
        let end = selection.end.clamp(start, chars.len());

        if !self.pattern.validate(value) {
            debug!(value, "value does not conform; passing keystroke through");
            return KeystrokeOutcome::Allow;
        }

        let candidate = splice_chars(&chars, start, end, &[key]);
        if self.pattern.validate(candidate.as_str()) {
            return KeystrokeOutcome::Allow;
        }
        if !self.insert_static {
            return KeystrokeOutcome::Drop;
        }

        let mut expansion: Vec<char> = self
            .pattern
            .segments()
            .iter()
            .skip(start)
            .map_while(Segment::literal)
            .collect();
        if expansion.is_empty() {
            return KeystrokeOutcome::Drop;
        }
        expansion.push(key);

        let candidate = splice_chars(&chars, start, end, &expansion);
        if self.pattern.validate(candidate.as_str()) {
            debug!(key = %key, value = %candidate, "keystroke expanded with literals");
            return KeystrokeOutcome::Replace {
                value: candidate,
                caret: start + expansion.len(),
            };
        }

        KeystrokeOutcome::Drop
    }

    fn splice(
        &self,
        runs: &[Run],
        delta: &EditDelta,
        edit_start: usize,
    ) -> Result<Rebuilt, Rejection> {
        let mut buffer: Vec<char> = runs
            .iter()
            .filter(|run| run.is_dynamic())
            .flat_map(|run| run.text.chars())
            .collect();

        let removed_slots = self
            .pattern
            .segments()
            .iter()
            .skip(delta.prefix_len)
            .take(delta.removed_len())
            .filter(|segment| segment.is_dynamic())
            .count();

        let insert_at = buffer_index(runs, edit_start).min(buffer.len());
        let remove_end = (insert_at + removed_slots).min(buffer.len());
        let inserted: Vec<char> = delta.inserted.chars().collect();
        buffer.splice(insert_at..remove_end, inserted.iter().copied());

        let capacity = self.pattern.slot_count();
        if buffer.len() > capacity {
            return Err(Rejection::Overflow {
                capacity,
                attempted: buffer.len(),
            });
        }

        Ok(self.pattern.rebuild(&buffer, insert_at, inserted.len()))
    }
}

/// Maps a position in a decomposed value to an index in its dynamic buffer
/// by discounting the literal characters that precede it.
fn buffer_index(runs: &[Run], position: usize) -> usize {
    let mut index = position;
    let mut offset = 0usize;
    for run in runs {
        let len = run.char_len();
        if !run.is_dynamic() {
            let before = position.saturating_sub(offset).min(len);
            index -= before;
        }
        offset += len;
        if offset >= position {
            break;
        }
    }
    index
}

pub(super) fn splice_chars(chars: &[char], start: usize, end: usize, insert: &[char]) -> String {
    chars[..start]
        .iter()
        .chain(insert.iter())
        .chain(chars[end..].iter())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{KeystrokeOutcome, Reformat, Reformatter, buffer_index};
    use crate::field::SelectionRange;
    use crate::mask::error::Rejection;
    use crate::mask::pattern::CompiledPattern;

    fn pattern(mask: &str) -> CompiledPattern {
        CompiledPattern::compile(mask).expect("pattern should compile")
    }

    fn accepted(value: &str, caret: usize) -> Reformat {
        Reformat::Accepted {
            value: value.to_string(),
            caret,
        }
    }

    #[test]
    fn valid_raw_value_is_kept_as_is() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("12", "123", 3), accepted("123", 3));
    }

    #[test]
    fn inserts_literal_before_next_slot() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("123", "1234", 4), accepted("123-4", 5));
    }

    #[test]
    fn deleting_a_literal_is_repaired() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("123-45", "12345", 3), accepted("123-45", 4));
    }

    #[test]
    fn deleting_a_range_across_a_literal_resplices_buffer() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("123-45", "1245", 2), accepted("124-5", 2));
    }

    #[test]
    fn inserting_in_the_middle_shifts_following_slots() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("123-4", "1293-4", 3), accepted("129-34", 3));
    }

    #[test]
    fn repeated_characters_are_inserted_at_the_caret() {
        let pattern = pattern("AA-AA");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("aa-a", "aaa-a", 2), accepted("aa-aa", 2));
    }

    #[test]
    fn overflowing_edit_is_rejected() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.reformat("123-45", "123-456", 7),
            Reformat::Rejected {
                caret: 6,
                reason: Rejection::Overflow {
                    capacity: 5,
                    attempted: 6,
                },
            }
        );
    }

    #[test]
    fn character_outside_class_is_rejected() {
        let pattern = pattern("AAA");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.reformat("ab", "a5b", 2),
            Reformat::Rejected {
                caret: 1,
                reason: Rejection::Unreformattable,
            }
        );
    }

    #[test]
    fn without_static_insertion_invalid_edits_are_rejected() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, false);
        assert_eq!(
            engine.reformat("123", "1234", 4),
            Reformat::Rejected {
                caret: 3,
                reason: Rejection::Unreformattable,
            }
        );
        assert_eq!(engine.reformat("123", "123-", 4), accepted("123-", 4));
    }

    #[test]
    fn nonconforming_baseline_passes_edits_through() {
        let pattern = pattern("999");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(engine.reformat("abc", "abcd", 4), accepted("abcd", 4));
    }

    #[test]
    fn empty_delta_returns_value_unchanged() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        for value in ["", "1", "123-", "123-45"] {
            let caret = value.chars().count();
            assert_eq!(engine.reformat(value, value, caret), accepted(value, caret));
        }
    }

    #[test]
    fn pure_insertion_never_moves_caret_backwards() {
        let pattern = pattern("(999) 999-9999");
        let engine = Reformatter::new(&pattern, true);
        let mut value = String::new();
        for digit in "5551234567".chars() {
            let position = value.chars().count();
            let raw = format!("{value}{digit}");
            match engine.reformat(&value, &raw, position + 1) {
                Reformat::Accepted {
                    value: next,
                    caret,
                } => {
                    assert!(caret >= position + 1, "{next:?} caret {caret}");
                    value = next;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(value, "(555) 123-4567");
    }

    #[test]
    fn buffer_index_skips_preceding_literals() {
        let pattern = pattern("(999) 999");
        let runs = pattern.decompose("(555) 12").expect("decomposes");
        assert_eq!(buffer_index(&runs, 0), 0);
        assert_eq!(buffer_index(&runs, 1), 0);
        assert_eq!(buffer_index(&runs, 4), 3);
        assert_eq!(buffer_index(&runs, 6), 3);
        assert_eq!(buffer_index(&runs, 8), 5);
    }

    #[test]
    fn keystroke_that_validates_is_allowed() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("12", SelectionRange::caret(2), '3'),
            KeystrokeOutcome::Allow
        );
    }

    #[test]
    fn keystroke_skips_forward_over_literals() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("123", SelectionRange::caret(3), '4'),
            KeystrokeOutcome::Replace {
                value: "123-4".to_string(),
                caret: 5,
            }
        );
    }

    #[test]
    fn keystroke_skips_forward_over_leading_literal_run() {
        let pattern = pattern("(999) 999");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("", SelectionRange::caret(0), '5'),
            KeystrokeOutcome::Replace {
                value: "(5".to_string(),
                caret: 2,
            }
        );
        assert_eq!(
            engine.keystroke("(555", SelectionRange::caret(4), '1'),
            KeystrokeOutcome::Replace {
                value: "(555) 1".to_string(),
                caret: 7,
            }
        );
    }

    #[test]
    fn keystroke_on_nonconforming_value_is_allowed() {
        let pattern = pattern("999");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("ab", SelectionRange::caret(2), 'c'),
            KeystrokeOutcome::Allow
        );
    }

    #[test]
    fn keystroke_replaces_selection() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("123-45", SelectionRange::new(4, 6), '9'),
            KeystrokeOutcome::Allow
        );
    }

    #[test]
    fn keystroke_outside_class_is_dropped() {
        let pattern = pattern("AAA");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("", SelectionRange::caret(0), '5'),
            KeystrokeOutcome::Drop
        );
    }

    #[test]
    fn keystroke_into_full_value_is_dropped() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, true);
        assert_eq!(
            engine.keystroke("123-45", SelectionRange::caret(6), '6'),
            KeystrokeOutcome::Drop
        );
    }

    #[test]
    fn keystroke_without_static_insertion_never_expands() {
        let pattern = pattern("999-99");
        let engine = Reformatter::new(&pattern, false);
        assert_eq!(
            engine.keystroke("123", SelectionRange::caret(3), '4'),
            KeystrokeOutcome::Drop
        );
    }
}

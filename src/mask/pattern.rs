use super::error::MaskError;
use super::matcher::PatternMatcher;
use super::model::{Run, Segment};
use super::parser;

/// A mask string compiled once into segments and matchers.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    mask: String,
    segments: Vec<Segment>,
    matcher: PatternMatcher,
    slot_count: usize,
}

/// A value rebuilt from a dynamic buffer, with the caret placed after the
/// characters that were just spliced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Rebuilt {
    pub value: String,
    pub caret: usize,
}

impl CompiledPattern {
    pub fn compile(mask: &str) -> Result<Self, MaskError> {
        let segments = parser::compile(mask);
        let matcher = PatternMatcher::new(segments.as_slice())?;
        let slot_count = segments.iter().filter(|segment| segment.is_dynamic()).count();
        Ok(Self {
            mask: mask.to_string(),
            segments,
            matcher,
            slot_count,
        })
    }

    pub fn mask(&self) -> &str {
        self.mask.as_str()
    }

    pub fn segments(&self) -> &[Segment] {
        self.segments.as_slice()
    }

    /// Maximum number of user-entered characters a filled value holds.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// An empty pattern masks nothing, so every value passes.
    pub fn validate(&self, value: &str) -> bool {
        self.segments.is_empty() || self.matcher.validate(value)
    }

    pub fn decompose(&self, value: &str) -> Option<Vec<Run>> {
        self.matcher.decompose(value)
    }

    /// Characters of `value` that occupy dynamic slots, in pattern order.
    pub fn dynamic_buffer(&self, value: &str) -> Option<Vec<char>> {
        let runs = self.decompose(value)?;
        Some(
            runs.iter()
                .filter(|run| run.is_dynamic())
                .flat_map(|run| run.text.chars())
                .collect(),
        )
    }

    /// Lays buffer characters into the slots, emitting literals in between.
    /// Literals after the last buffered character are not emitted.
    pub fn render(&self, buffer: &[char]) -> String {
        self.rebuild(buffer, buffer.len(), 0).value
    }

    /// The not-yet-filled remainder of the mask after `filled` characters,
    /// with `_` standing in for each open slot.
    pub fn placeholder_tail(&self, filled: usize) -> String {
        self.segments
            .iter()
            .skip(filled)
            .map(|segment| segment.literal().unwrap_or('_'))
            .collect()
    }

    pub(super) fn rebuild(&self, buffer: &[char], insert_at: usize, inserted: usize) -> Rebuilt {
        let insert_end = insert_at + inserted;
        let mut value = String::new();
        let mut rendered = 0usize;
        let mut consumed = 0usize;
        let mut caret = None;

        for segment in &self.segments {
            if consumed >= buffer.len() {
                break;
            }
            match segment {
                Segment::Static(ch) => value.push(*ch),
                Segment::Dynamic(_) => {
                    if inserted == 0 && consumed == insert_at {
                        caret = Some(rendered);
                    }
                    value.push(buffer[consumed]);
                    consumed += 1;
                    if inserted > 0 && consumed == insert_end {
                        caret = Some(rendered + 1);
                    }
                }
            }
            rendered += 1;
        }

        Rebuilt {
            value,
            caret: caret.unwrap_or(rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CompiledPattern;

    fn pattern(mask: &str) -> CompiledPattern {
        CompiledPattern::compile(mask).expect("pattern should compile")
    }

    #[test]
    fn counts_dynamic_slots() {
        assert_eq!(pattern("999-99").slot_count(), 5);
        assert_eq!(pattern("(999) 999-9999").slot_count(), 10);
        assert_eq!(pattern("--").slot_count(), 0);
    }

    #[test]
    fn empty_pattern_accepts_anything() {
        let pattern = pattern("");
        assert!(pattern.is_empty());
        assert!(pattern.validate("whatever"));
    }

    #[test]
    fn extracts_dynamic_buffer() {
        let pattern = pattern("(999) 999-9999");
        assert_eq!(
            pattern.dynamic_buffer("(555) 12"),
            Some("55512".chars().collect())
        );
    }

    #[test]
    fn renders_without_trailing_literals() {
        let pattern = pattern("999-99");
        let buffer: Vec<char> = "123".chars().collect();
        assert_eq!(pattern.render(&buffer), "123");
        let buffer: Vec<char> = "1234".chars().collect();
        assert_eq!(pattern.render(&buffer), "123-4");
    }

    #[test]
    fn renders_leading_literals_once_content_exists() {
        let pattern = pattern("(999)");
        assert_eq!(pattern.render(&[]), "");
        assert_eq!(pattern.render(&['5']), "(5");
    }

    #[test]
    fn buffer_round_trips_through_render_and_decompose() {
        for mask in ["999-99", "(999) 999-9999", "UU 99", "A-A-A"] {
            let pattern = pattern(mask);
            let samples = ["", "1", "12", "123", "1234", "12345"];
            for sample in samples {
                let buffer: Vec<char> = pattern
                    .segments()
                    .iter()
                    .filter(|segment| segment.is_dynamic())
                    .zip(sample.chars())
                    .map(|(segment, digit)| match segment {
                        crate::mask::Segment::Dynamic(crate::mask::CharClass::Digit) => digit,
                        _ => 'Q',
                    })
                    .collect();
                let rendered = pattern.render(&buffer);
                assert!(pattern.validate(&rendered), "{mask}: {rendered:?}");
                assert_eq!(
                    pattern.dynamic_buffer(&rendered),
                    Some(buffer),
                    "{mask}: {rendered:?}"
                );
            }
        }
    }

    #[test]
    fn rebuild_places_caret_after_inserted_run() {
        let pattern = pattern("999-99");
        let buffer: Vec<char> = "1234".chars().collect();
        let rebuilt = pattern.rebuild(&buffer, 3, 1);
        assert_eq!(rebuilt.value, "123-4");
        assert_eq!(rebuilt.caret, 5);
    }

    #[test]
    fn rebuild_counts_literals_inside_inserted_run() {
        let pattern = pattern("99-99");
        let buffer: Vec<char> = "1234".chars().collect();
        let rebuilt = pattern.rebuild(&buffer, 1, 2);
        assert_eq!(rebuilt.value, "12-34");
        assert_eq!(rebuilt.caret, 4);
    }

    #[test]
    fn rebuild_after_deletion_places_caret_at_next_slot() {
        let pattern = pattern("999-99");
        let buffer: Vec<char> = "12345".chars().collect();
        let rebuilt = pattern.rebuild(&buffer, 3, 0);
        assert_eq!(rebuilt.value, "123-45");
        assert_eq!(rebuilt.caret, 4);

        let rebuilt = pattern.rebuild(&buffer[..3], 3, 0);
        assert_eq!(rebuilt.value, "123");
        assert_eq!(rebuilt.caret, 3);
    }

    #[test]
    fn placeholder_tail_shows_remaining_mask() {
        let pattern = pattern("(999) 999");
        assert_eq!(pattern.placeholder_tail(0), "(___) ___");
        assert_eq!(pattern.placeholder_tail(3), "_) ___");
        assert_eq!(pattern.placeholder_tail(9), "");
    }
}

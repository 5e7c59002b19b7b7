use super::model::{Run, Segment, SegmentKind};
use super::parser::group_runs;
use regex::Regex;

/// Validator and decomposer synthesized from a segment sequence.
///
/// The validator accepts any prefix of a conforming value: every position
/// also accepts end-of-input, so `12` passes `999-99` while `12x` does not.
/// The decomposer applies the same per-segment tests, with one capture group
/// per maximal run of same-kind segments, so it splits exactly the values the
/// validator accepts.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    validator: Regex,
    decomposer: Regex,
    run_kinds: Vec<SegmentKind>,
}

impl PatternMatcher {
    pub fn new(segments: &[Segment]) -> Result<Self, regex::Error> {
        let validator = Regex::new(validator_source(segments).as_str())?;
        let (source, run_kinds) = decomposer_source(segments);
        let decomposer = Regex::new(source.as_str())?;
        Ok(Self {
            validator,
            decomposer,
            run_kinds,
        })
    }

    pub fn validate(&self, value: &str) -> bool {
        self.validator.is_match(value)
    }

    pub fn decompose(&self, value: &str) -> Option<Vec<Run>> {
        let captures = self.decomposer.captures(value)?;
        let runs = self
            .run_kinds
            .iter()
            .enumerate()
            .map(|(idx, kind)| Run {
                kind: *kind,
                text: captures
                    .get(idx + 1)
                    .map(|capture| capture.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect();
        Some(runs)
    }

    pub fn run_kinds(&self) -> &[SegmentKind] {
        self.run_kinds.as_slice()
    }
}

fn validator_source(segments: &[Segment]) -> String {
    let mut source = String::from("^");
    for segment in segments {
        source.push_str(format!("(?:{}|$)", segment_test(segment)).as_str());
    }
    source.push('$');
    source
}

fn decomposer_source(segments: &[Segment]) -> (String, Vec<SegmentKind>) {
    let mut source = String::from("^");
    let mut kinds = Vec::new();

    for run in group_runs(segments) {
        kinds.push(run[0].kind());
        source.push('(');
        for segment in run {
            source.push_str(format!("(?:{}|$)", segment_test(segment)).as_str());
        }
        source.push(')');
    }

    source.push('$');
    (source, kinds)
}

fn segment_test(segment: &Segment) -> String {
    match segment {
        Segment::Static(ch) => regex::escape(ch.to_string().as_str()),
        Segment::Dynamic(class) => class.regex_class().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::PatternMatcher;
    use crate::mask::model::SegmentKind;
    use crate::mask::parser::compile;

    fn matcher(mask: &str) -> PatternMatcher {
        PatternMatcher::new(&compile(mask)).expect("matcher should build")
    }

    fn run_texts(matcher: &PatternMatcher, value: &str) -> Option<Vec<String>> {
        matcher
            .decompose(value)
            .map(|runs| runs.into_iter().map(|run| run.text).collect())
    }

    #[test]
    fn validator_accepts_partial_values() {
        let matcher = matcher("999-99");
        for value in ["", "1", "12", "123", "123-", "123-4", "123-45"] {
            assert!(matcher.validate(value), "{value:?} should validate");
        }
    }

    #[test]
    fn validator_rejects_deviations_and_overlong_values() {
        let matcher = matcher("999-99");
        for value in ["a", "1234", "12-", "123-456", "123-4a", "123 45"] {
            assert!(!matcher.validate(value), "{value:?} should not validate");
        }
    }

    #[test]
    fn validator_treats_metacharacters_literally() {
        let matcher = matcher("9.9");
        assert!(matcher.validate("1.2"));
        assert!(!matcher.validate("1x2"));
    }

    #[test]
    fn validator_respects_class_predicates() {
        let matcher = matcher("AU9");
        assert!(matcher.validate("aB1"));
        assert!(!matcher.validate("ab1"));
        assert!(!matcher.validate("5"));
    }

    #[test]
    fn decomposes_into_alternating_runs() {
        let matcher = matcher("(999) 999-9999");
        assert_eq!(
            matcher.run_kinds(),
            &[
                SegmentKind::Static,
                SegmentKind::Dynamic,
                SegmentKind::Static,
                SegmentKind::Dynamic,
                SegmentKind::Static,
                SegmentKind::Dynamic,
            ]
        );
        assert_eq!(
            run_texts(&matcher, "(555) 123-4567"),
            Some(
                ["(", "555", ") ", "123", "-", "4567"]
                    .map(String::from)
                    .to_vec()
            )
        );
    }

    #[test]
    fn decomposes_truncated_values() {
        let matcher = matcher("999-99");
        assert_eq!(
            run_texts(&matcher, "12"),
            Some(["12", "", ""].map(String::from).to_vec())
        );
        assert_eq!(
            run_texts(&matcher, "123-"),
            Some(["123", "-", ""].map(String::from).to_vec())
        );
    }

    #[test]
    fn decomposition_keeps_slot_text_aligned_when_literal_is_a_valid_slot_char() {
        let matcher = matcher("AxA");
        assert_eq!(
            run_texts(&matcher, "xxx"),
            Some(["x", "x", "x"].map(String::from).to_vec())
        );
    }

    #[test]
    fn decomposition_fails_for_misplaced_literals() {
        let matcher = matcher("(99)");
        assert_eq!(run_texts(&matcher, "x(12)"), None);
    }

    #[test]
    fn decomposition_agrees_with_validation() {
        let matcher = matcher("999-99");
        for value in ["", "12", "123-", "123-45", "12x-45", "123x45", "123-4a", "1234"] {
            assert_eq!(
                matcher.decompose(value).is_some(),
                matcher.validate(value),
                "{value:?}"
            );
        }
    }
}

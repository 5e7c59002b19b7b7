use super::model::{CharClass, Segment};

/// Compiles a mask string into its segment sequence.
///
/// Class identifiers (`9`, `A`, `U`) become dynamic slots; every other
/// character, whitespace and punctuation included, is a literal. There is no
/// escape syntax, so identifiers can never appear as literals.
pub fn compile(mask: &str) -> Vec<Segment> {
    mask.chars()
        .map(|ch| match CharClass::from_identifier(ch) {
            Some(class) => Segment::Dynamic(class),
            None => Segment::Static(ch),
        })
        .collect()
}

/// Splits segments into maximal runs of the same kind.
pub(super) fn group_runs(segments: &[Segment]) -> Vec<&[Segment]> {
    segments
        .chunk_by(|left, right| left.kind() == right.kind())
        .collect()
}

/// Character classes a mask slot can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `9`: any ASCII digit.
    Digit,
    /// `A`: any ASCII letter.
    Letter,
    /// `U`: any ASCII uppercase letter.
    Upper,
}

impl CharClass {
    pub fn from_identifier(ch: char) -> Option<Self> {
        match ch {
            '9' => Some(Self::Digit),
            'A' => Some(Self::Letter),
            'U' => Some(Self::Upper),
            _ => None,
        }
    }

    pub fn identifier(self) -> char {
        match self {
            Self::Digit => '9',
            Self::Letter => 'A',
            Self::Upper => 'U',
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Letter => ch.is_ascii_alphabetic(),
            Self::Upper => ch.is_ascii_uppercase(),
        }
    }

    pub(super) fn regex_class(self) -> &'static str {
        match self {
            Self::Digit => "[0-9]",
            Self::Letter => "[A-Za-z]",
            Self::Upper => "[A-Z]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Static,
    Dynamic,
}

/// One compiled position of a mask pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Static(char),
    Dynamic(CharClass),
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Static(_) => SegmentKind::Static,
            Self::Dynamic(_) => SegmentKind::Dynamic,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    pub fn literal(&self) -> Option<char> {
        match self {
            Self::Static(ch) => Some(*ch),
            Self::Dynamic(_) => None,
        }
    }

    /// Whether `ch` may occupy this position in a conforming value.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Static(literal) => *literal == ch,
            Self::Dynamic(class) => class.accepts(ch),
        }
    }
}

/// A captured run of a decomposed value: consecutive characters that all sit
/// in segments of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: SegmentKind,
    pub text: String,
}

impl Run {
    pub fn is_dynamic(&self) -> bool {
        self.kind == SegmentKind::Dynamic
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

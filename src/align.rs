//! Alignment of the oracle's and the simulator's segmentation of one word.
//!
//! Both annotated strings are walked in step. Letters must agree; each
//! marker becomes a tag saying which side placed it. The oracle is the left
//! side, the simulator the right.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::MARKER;
use crate::classify::BugCategory;
use crate::error::AlignError;

/// The producer of an annotated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Oracle,
    Simulator,
}

/// The two kinds of disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorType {
    /// The oracle has a boundary the simulator missed.
    One,
    /// The simulator has a boundary the oracle does not.
    Two,
}

impl ErrorType {
    pub const ALL: [ErrorType; 2] = [ErrorType::One, ErrorType::Two];

    /// The side that carries the boundary.
    pub fn side(self) -> Side {
        match self {
            Self::One => Side::Oracle,
            Self::Two => Side::Simulator,
        }
    }

    /// The plain disagreement tag for this type.
    pub fn tag(self) -> Tag {
        match self {
            Self::One => Tag::LeftOnly,
            Self::Two => Tag::RightOnly,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "type1"),
            Self::Two => write!(f, "type2"),
        }
    }
}

/// One aligned position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A letter, no boundary on either side.
    AgreeNone(char),
    /// Both sides put a boundary here.
    AgreeBoundary,
    /// Only the oracle put a boundary here.
    LeftOnly,
    /// Only the simulator put a boundary here.
    RightOnly,
    /// A disagreement matching a registered known bug.
    KnownBug(BugCategory),
}

impl Tag {
    pub fn letter(&self) -> Option<char> {
        match self {
            Self::AgreeNone(c) => Some(*c),
            _ => None,
        }
    }

    /// The disagreement this tag records, if any.
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Self::AgreeNone(_) | Self::AgreeBoundary => None,
            Self::LeftOnly => Some(ErrorType::One),
            Self::RightOnly => Some(ErrorType::Two),
            Self::KnownBug(category) => Some(category.error_type()),
        }
    }

    /// True if `side` put a boundary at this position.
    pub fn has_boundary(&self, side: Side) -> bool {
        match self {
            Self::AgreeNone(_) => false,
            Self::AgreeBoundary => true,
            _ => self.error_type().map(ErrorType::side) == Some(side),
        }
    }

    /// The same position seen with oracle and simulator exchanged.
    ///
    /// Known bugs are tied to one side and come back unchanged.
    pub fn swapped(self) -> Tag {
        match self {
            Self::LeftOnly => Self::RightOnly,
            Self::RightOnly => Self::LeftOnly,
            other => other,
        }
    }
}

/// The aligned form of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub(crate) tags: Vec<Tag>,
}

impl Alignment {
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The word with every boundary removed.
    pub fn word(&self) -> String {
        self.tags.iter().filter_map(Tag::letter).collect()
    }

    /// Number of positions where the sides disagree.
    pub fn disagreements(&self) -> usize {
        self.tags.iter().filter(|t| t.error_type().is_some()).count()
    }

    /// Rebuild the annotated string `side` produced.
    pub fn annotated(&self, side: Side) -> String {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                Tag::AgreeNone(c) => Some(*c),
                t if t.has_boundary(side) => Some(MARKER),
                _ => None,
            })
            .collect()
    }

    pub fn swapped(&self) -> Alignment {
        Alignment {
            tags: self.tags.iter().map(|t| t.swapped()).collect(),
        }
    }
}

/// Align the oracle's and the simulator's annotation of `word`.
///
/// Fails if the two strings, once markers are removed, are not both the
/// letters of `word`; that means one of the producers is broken.
pub fn align(word: &str, oracle: &str, simulator: &str) -> Result<Alignment, AlignError> {
    let alignment = Aligner {
        oracle: oracle.chars().peekable(),
        simulator: simulator.chars().peekable(),
        letters: 0,
    }
    .run()
    .map_err(|fault| fault.into_error(word, oracle, simulator))?;

    if alignment.word() != word {
        return Err(Fault::Word.into_error(word, oracle, simulator));
    }
    Ok(alignment)
}

struct Aligner<'a> {
    oracle: Peekable<Chars<'a>>,
    simulator: Peekable<Chars<'a>>,
    letters: usize,
}

enum Fault {
    /// Letter index, markers not counted.
    Letters(usize),
    Exhausted(Side),
    Word,
}

impl Fault {
    fn into_error(self, word: &str, oracle: &str, simulator: &str) -> AlignError {
        let (word, oracle, simulator) = (word.to_string(), oracle.to_string(), simulator.to_string());
        match self {
            Fault::Letters(position) => AlignError::LetterMismatch {
                word,
                oracle,
                simulator,
                position,
            },
            Fault::Exhausted(side) => AlignError::LengthMismatch {
                word,
                oracle,
                simulator,
                side: match side {
                    Side::Oracle => "oracle",
                    Side::Simulator => "simulator",
                },
            },
            Fault::Word => AlignError::WordMismatch {
                word,
                oracle,
                simulator,
            },
        }
    }
}

impl Aligner<'_> {
    fn run(mut self) -> Result<Alignment, Fault> {
        let mut tags = Vec::new();
        loop {
            let tag = match (self.oracle.peek().copied(), self.simulator.peek().copied()) {
                (None, None) => break,
                (Some(MARKER), Some(MARKER)) => {
                    self.oracle.next();
                    self.simulator.next();
                    Tag::AgreeBoundary
                }
                (Some(MARKER), _) => {
                    self.oracle.next();
                    Tag::LeftOnly
                }
                (_, Some(MARKER)) => {
                    self.simulator.next();
                    Tag::RightOnly
                }
                (Some(a), Some(b)) if a == b => {
                    self.oracle.next();
                    self.simulator.next();
                    self.letters += 1;
                    Tag::AgreeNone(a)
                }
                (Some(_), Some(_)) => return Err(Fault::Letters(self.letters)),
                (None, Some(_)) => return Err(Fault::Exhausted(Side::Oracle)),
                (Some(_), None) => return Err(Fault::Exhausted(Side::Simulator)),
            };
            tags.push(tag);
        }
        Ok(Alignment { tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(alignment: &Alignment, tag: Tag) -> usize {
        alignment.tags().iter().filter(|t| **t == tag).count()
    }

    #[test]
    fn crossed_boundaries() {
        let a = align("Reithalfter", "Reit|halfter", "Reithalf|ter").unwrap();
        assert_eq!(count(&a, Tag::LeftOnly), 1);
        assert_eq!(count(&a, Tag::RightOnly), 1);
        assert_eq!(count(&a, Tag::AgreeBoundary), 0);
        assert_eq!(a.tags()[4], Tag::LeftOnly);
        assert_eq!(a.tags()[9], Tag::RightOnly);
        assert_eq!(a.disagreements(), 2);
        assert_eq!(a.word(), "Reithalfter");
    }

    #[test]
    fn agreed_boundary() {
        let a = align("Hofhund", "Hof|hund", "Hof|hund").unwrap();
        assert_eq!(a.tags()[3], Tag::AgreeBoundary);
        assert_eq!(a.disagreements(), 0);
    }

    #[test]
    fn no_boundaries_at_all() {
        let a = align("Haus", "Haus", "Haus").unwrap();
        assert_eq!(
            a.tags(),
            &[
                Tag::AgreeNone('H'),
                Tag::AgreeNone('a'),
                Tag::AgreeNone('u'),
                Tag::AgreeNone('s')
            ]
        );
    }

    #[test]
    fn boundary_at_the_end() {
        let a = align("auf", "auf|", "auf").unwrap();
        assert_eq!(a.tags().last(), Some(&Tag::LeftOnly));
    }

    #[test]
    fn annotated_round_trip() {
        let a = align("Schifffahrt", "Schiff|fahrt", "Schif|f|fahrt").unwrap();
        assert_eq!(a.annotated(Side::Oracle), "Schiff|fahrt");
        assert_eq!(a.annotated(Side::Simulator), "Schif|f|fahrt");
    }

    #[test]
    fn swapping_inputs_swaps_tags() {
        let pairs = [
            ("Reit|halfter", "Reithalf|ter"),
            ("Hof|hund", "Hof|hund"),
            ("auf|l|age", "aufl|age"),
            ("Kaufleute", "Kauf|leute"),
        ];
        for (oracle, simulator) in pairs {
            let word = oracle.replace('|', "");
            let forward = align(&word, oracle, simulator).unwrap();
            let backward = align(&word, simulator, oracle).unwrap();
            assert_eq!(forward.swapped(), backward, "{oracle} / {simulator}");
        }
    }

    #[test]
    fn different_letters_are_fatal() {
        let err = align("Hof", "Hof", "Huf").unwrap_err();
        assert!(matches!(err, AlignError::LetterMismatch { position: 1, .. }));
        assert!(err.to_string().contains("\"Hof\""));
    }

    #[test]
    fn mismatch_position_counts_letters_only() {
        let err = align("Hofhund", "Hof|hund", "Hof|hand").unwrap_err();
        assert!(matches!(err, AlignError::LetterMismatch { position: 4, .. }));
    }

    #[test]
    fn annotations_must_spell_the_word() {
        let err = align("Hof", "Huf", "Huf").unwrap_err();
        assert!(matches!(err, AlignError::WordMismatch { .. }));
        assert!(align("Hof", "H|of", "Ho|f").is_ok());
    }

    #[test]
    fn different_lengths_are_fatal() {
        assert!(matches!(
            align("Hofe", "Hof", "Hofe").unwrap_err(),
            AlignError::LengthMismatch { side: "oracle", .. }
        ));
        assert!(matches!(
            align("Hofe", "Hof|e", "Hof|"),
            Err(AlignError::LengthMismatch { side: "simulator", .. })
        ));
    }

    #[test]
    fn error_type_sides() {
        assert_eq!(ErrorType::One.side(), Side::Oracle);
        assert_eq!(ErrorType::Two.tag(), Tag::RightOnly);
        assert_eq!(ErrorType::Two.to_string(), "type2");
        assert!(Tag::LeftOnly.has_boundary(Side::Oracle));
        assert!(!Tag::LeftOnly.has_boundary(Side::Simulator));
        assert!(Tag::AgreeBoundary.has_boundary(Side::Simulator));
    }
}

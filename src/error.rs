//! Error types shared across the crate.
//!
//! Only conditions that stop a directive or a run are errors. Advisory
//! findings about the rule set are [`Diagnostic`](crate::rules::Diagnostic)
//! values instead.

use thiserror::Error;

/// Structural errors in a single pattern-language directive.
///
/// The directive is skipped; the rest of the source is still parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("more than one bracket group in pattern {0:?}")]
    SecondBracket(String),

    #[error("closing bracket without opening one in pattern {0:?}")]
    UnmatchedClose(String),

    #[error("unclosed bracket in pattern {0:?}")]
    UnclosedBracket(String),

    #[error("empty bracket group in pattern {0:?}")]
    EmptyBracket(String),

    #[error("unclosed argument in directive \\{directive}{{...")]
    UnclosedArgument { directive: &'static str },

    #[error("missing second argument for \\nolig{{{key}}}")]
    MissingValue { key: String },

    #[error("bracketed key {key:?} cannot have more than two parts ({value:?})")]
    MultiPartWithAlternation { key: String, value: String },
}

/// The two annotated strings of one line do not describe the same word.
///
/// This means an upstream producer is broken, so the whole run stops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error(
        "letters differ at letter {position} of {word:?}: oracle {oracle:?}, simulator {simulator:?}"
    )]
    LetterMismatch {
        word: String,
        oracle: String,
        simulator: String,
        position: usize,
    },

    #[error("{side} string of {word:?} ends early: oracle {oracle:?}, simulator {simulator:?}")]
    LengthMismatch {
        word: String,
        oracle: String,
        simulator: String,
        side: &'static str,
    },

    #[error("annotations do not spell {word:?}: oracle {oracle:?}, simulator {simulator:?}")]
    WordMismatch {
        word: String,
        oracle: String,
        simulator: String,
    },
}

/// A line of the disagreement report that cannot be split into its fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("line {line_no}: expected at least 3 fields separated by \" --- \", found {found}")]
    TooFewFields { line_no: usize, found: usize },

    #[error("line {line_no}: {source}")]
    Align {
        line_no: usize,
        #[source]
        source: AlignError,
    },
}

//! Bracket-alternation expansion.
//!
//! `Sch[aä]ft` expands to `Schaft` and `Schäft`. The bracket body lists one
//! alternative per character, or comma-separated alternatives when it
//! contains a comma (`auf[f,ff]`). At most one group is allowed per pattern.

use itertools::Itertools;

use crate::error::PatternError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpandState {
    /// Before any bracket group.
    Literal,
    /// Inside the one bracket group.
    InBracket,
    /// After the group has been closed; another `[` is an error.
    AfterBracket,
}

/// Expand `pattern` into the concrete strings it denotes.
///
/// A pattern without brackets expands to itself.
pub fn expand(pattern: &str) -> Result<Vec<String>, PatternError> {
    let mut prefix = String::new();
    let mut body = String::new();
    let mut suffix = String::new();
    let mut state = ExpandState::Literal;

    for ch in pattern.chars() {
        state = match (state, ch) {
            (ExpandState::Literal, '[') => ExpandState::InBracket,
            (ExpandState::InBracket | ExpandState::AfterBracket, '[') => {
                return Err(PatternError::SecondBracket(pattern.to_string()));
            }
            (ExpandState::Literal | ExpandState::AfterBracket, ']') => {
                return Err(PatternError::UnmatchedClose(pattern.to_string()));
            }
            (ExpandState::InBracket, ']') => {
                if body.is_empty() {
                    return Err(PatternError::EmptyBracket(pattern.to_string()));
                }
                ExpandState::AfterBracket
            }
            (ExpandState::Literal, c) => {
                prefix.push(c);
                ExpandState::Literal
            }
            (ExpandState::InBracket, c) => {
                body.push(c);
                ExpandState::InBracket
            }
            (ExpandState::AfterBracket, c) => {
                suffix.push(c);
                ExpandState::AfterBracket
            }
        };
    }

    match state {
        ExpandState::Literal => Ok(vec![prefix]),
        ExpandState::InBracket => Err(PatternError::UnclosedBracket(pattern.to_string())),
        ExpandState::AfterBracket => Ok(alternatives(&body)
            .map(|alt| format!("{prefix}{alt}{suffix}"))
            .unique()
            .collect()),
    }
}

/// Test whether `pattern` contains a bracket group at all.
pub fn has_alternation(pattern: &str) -> bool {
    pattern.contains('[')
}

fn alternatives(body: &str) -> Box<dyn Iterator<Item = String> + '_> {
    if body.contains(',') {
        Box::new(body.split(',').map(str::to_string))
    } else {
        Box::new(body.chars().map(String::from))
    }
}

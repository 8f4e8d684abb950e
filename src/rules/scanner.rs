//! Line scanner for the pattern-definition language.
//!
//! Recognises `\nolig{KEY}{VALUE}` and `\keeplig{PATTERN}` anywhere on a
//! line; everything else is ignored, and `%` outside an argument ends the
//! line. Arguments must close on the line they open on.

use crate::error::PatternError;

const NOLIG: &str = "\\nolig{";
const KEEPLIG: &str = "\\keeplig{";

/// One directive found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `\nolig{key}{value}`
    Suppress { key: String, value: String },
    /// `\keeplig{pattern}`
    Preserve { pattern: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ScanningLiteral,
    InKeyArg,
    BetweenArgs,
    InValueArg,
    InPreserveArg,
}

/// Scan one line, returning its directives (and broken ones) in order.
pub fn scan_line(line: &str) -> Vec<Result<Directive, PatternError>> {
    let mut found = Vec::new();
    let mut state = ScanState::ScanningLiteral;
    let mut key = String::new();
    let mut arg = String::new();
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        match state {
            ScanState::ScanningLiteral => {
                if ch == '%' {
                    break;
                }
                if let Some(after) = rest.strip_prefix(NOLIG) {
                    state = ScanState::InKeyArg;
                    rest = after;
                    continue;
                }
                if let Some(after) = rest.strip_prefix(KEEPLIG) {
                    state = ScanState::InPreserveArg;
                    rest = after;
                    continue;
                }
            }
            ScanState::InKeyArg => {
                if ch == '}' {
                    state = ScanState::BetweenArgs;
                } else {
                    key.push(ch);
                }
            }
            ScanState::BetweenArgs => match ch {
                '{' => state = ScanState::InValueArg,
                ' ' | '\t' => {}
                _ => {
                    // Rescan this character as ordinary text.
                    found.push(Err(PatternError::MissingValue {
                        key: std::mem::take(&mut key),
                    }));
                    state = ScanState::ScanningLiteral;
                    continue;
                }
            },
            ScanState::InValueArg => {
                if ch == '}' {
                    found.push(Ok(Directive::Suppress {
                        key: std::mem::take(&mut key),
                        value: std::mem::take(&mut arg),
                    }));
                    state = ScanState::ScanningLiteral;
                } else {
                    arg.push(ch);
                }
            }
            ScanState::InPreserveArg => {
                if ch == '}' {
                    found.push(Ok(Directive::Preserve {
                        pattern: std::mem::take(&mut arg),
                    }));
                    state = ScanState::ScanningLiteral;
                } else {
                    arg.push(ch);
                }
            }
        }
        rest = &rest[ch.len_utf8()..];
    }

    match state {
        ScanState::ScanningLiteral => {}
        ScanState::InKeyArg | ScanState::InValueArg => {
            found.push(Err(PatternError::UnclosedArgument { directive: "nolig" }));
        }
        ScanState::BetweenArgs => found.push(Err(PatternError::MissingValue { key })),
        ScanState::InPreserveArg => {
            found.push(Err(PatternError::UnclosedArgument {
                directive: "keeplig",
            }));
        }
    }
    found
}

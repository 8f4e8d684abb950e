//! Rule store for selnolig patterns.
//!
//! A pattern file holds two kinds of directives:
//!
//! | Directive               | Meaning                                            |
//! |-------------------------|----------------------------------------------------|
//! | `\nolig{KEY}{VALUE}`    | Suppress: break the ligature where `VALUE` has `\|` |
//! | `\keeplig{PATTERN}`     | Preserve: never break inside `PATTERN`             |
//! | `%`                     | Comment to end of line                             |
//! | `[...]`                 | One bracket alternation per argument               |
//!
//! Parsing never fails as a whole. Broken directives are skipped and
//! reported as [`Diagnostic`]s together with the store built from the rest.

pub mod expand;
pub mod scanner;
mod validate;

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::MARKER;
use crate::error::PatternError;

use expand::{expand, has_alternation};
use scanner::{Directive, scan_line};

/// Which collection a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Suppress,
    Preserve,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suppress => write!(f, "nolig"),
            Self::Preserve => write!(f, "keeplig"),
        }
    }
}

/// A concrete suppress rule: a key and the parts it is broken into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    key: String,
    parts: Vec<String>,
}

impl Rule {
    pub fn new(key: impl Into<String>, parts: Vec<String>) -> Self {
        Self {
            key: key.into(),
            parts,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The key with a boundary marker at every part junction.
    pub fn annotated(&self) -> String {
        self.parts.iter().join(&MARKER.to_string())
    }

    /// True if the parts concatenate to the key.
    pub fn is_consistent(&self) -> bool {
        self.parts.concat() == self.key
    }

    /// Byte offsets into the key at which boundaries are inserted.
    pub fn cut_offsets(&self) -> Vec<usize> {
        let inner = self.parts.len().saturating_sub(1);
        self.parts
            .iter()
            .take(inner)
            .scan(0, |offset, part| {
                *offset += part.len();
                Some(*offset)
            })
            .collect()
    }
}

/// A problem with the rule set. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("line {line_no}: {source}")]
    Structural {
        line_no: usize,
        #[source]
        source: PatternError,
    },

    #[error("line {line_no}: nolig rule without a bar: \\nolig{{{key}}}{{{value}}}")]
    MissingMarker {
        line_no: usize,
        key: String,
        value: String,
    },

    #[error("line {line_no}: empty part in \\nolig{{{key}}}{{{value}}}")]
    EmptyPart {
        line_no: usize,
        key: String,
        value: String,
    },

    #[error("line {line_no}: key {key:?} does not match value {value:?}")]
    ParityMismatch {
        line_no: usize,
        key: String,
        value: String,
    },

    #[error("invalid rule {key} <--> [{}]", .parts.join(", "))]
    InvalidRule { key: String, parts: Vec<String> },

    #[error("invalid rule {key}: {pair:?} at a part junction is no ligature")]
    NonGlyphJunction { key: String, pair: String },

    #[error("conflicting {kind} rules: {outer} contains {inner}")]
    Conflict {
        kind: RuleKind,
        outer: String,
        inner: String,
    },
}

/// The parsed, immutable rule set.
///
/// Suppress rules keep their order of definition; the simulator depends on it.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    suppress: Vec<Rule>,
    preserve: Vec<String>,
}

impl RuleStore {
    /// Parse a pattern file. Returns the store and everything that was skipped.
    pub fn parse(source: &str) -> (RuleStore, Vec<Diagnostic>) {
        let mut store = RuleStore::default();
        let mut diagnostics = Vec::new();

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            for directive in scan_line(line) {
                let added = match directive {
                    Ok(Directive::Suppress { key, value }) => {
                        suppress_rules(line_no, &key, &value).map(|rules| {
                            rules.into_iter().for_each(|rule| store.push_suppress(rule));
                        })
                    }
                    Ok(Directive::Preserve { pattern }) => expand(&pattern)
                        .map(|patterns| patterns.into_iter().for_each(|p| store.push_preserve(p)))
                        .map_err(|source| Diagnostic::Structural { line_no, source }),
                    Err(source) => Err(Diagnostic::Structural { line_no, source }),
                };
                if let Err(diagnostic) = added {
                    log::warn!("{diagnostic}");
                    diagnostics.push(diagnostic);
                }
            }
        }

        log::info!(
            "{} nolig patterns, {} keeplig patterns",
            store.suppress.len(),
            store.preserve.len()
        );
        (store, diagnostics)
    }

    /// Build a store directly from rules, bypassing the pattern language.
    pub fn from_rules(suppress: Vec<Rule>, preserve: Vec<String>) -> Self {
        let mut store = RuleStore::default();
        suppress.into_iter().for_each(|rule| store.push_suppress(rule));
        preserve.into_iter().for_each(|p| store.push_preserve(p));
        store
    }

    pub fn suppress(&self) -> &[Rule] {
        &self.suppress
    }

    pub fn preserve(&self) -> &[String] {
        &self.preserve
    }

    pub fn is_empty(&self) -> bool {
        self.suppress.is_empty() && self.preserve.is_empty()
    }

    /// A redefined key replaces the earlier rule but keeps its position.
    fn push_suppress(&mut self, rule: Rule) {
        match self.suppress.iter_mut().find(|r| r.key == rule.key) {
            Some(existing) => {
                log::debug!("nolig {} redefined as {}", existing.key, rule.annotated());
                *existing = rule;
            }
            None => self.suppress.push(rule),
        }
    }

    fn push_preserve(&mut self, pattern: String) {
        if !self.preserve.contains(&pattern) {
            self.preserve.push(pattern);
        }
    }
}

/// Turn one `\nolig{key}{value}` into concrete rules.
fn suppress_rules(line_no: usize, key: &str, value: &str) -> Result<Vec<Rule>, Diagnostic> {
    let rules = split_rules(line_no, key, value)?;
    if rules.iter().any(|r| r.parts.iter().any(String::is_empty)) {
        return Err(Diagnostic::EmptyPart {
            line_no,
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(rules)
}

fn split_rules(line_no: usize, key: &str, value: &str) -> Result<Vec<Rule>, Diagnostic> {
    let structural = |source| Diagnostic::Structural { line_no, source };
    let missing_marker = || Diagnostic::MissingMarker {
        line_no,
        key: key.to_string(),
        value: value.to_string(),
    };
    let parity = || Diagnostic::ParityMismatch {
        line_no,
        key: key.to_string(),
        value: value.to_string(),
    };

    let keys = expand(key).map_err(structural)?;
    match value.matches(MARKER).count() {
        0 => Err(missing_marker()),
        1 => {
            let values = expand(value).map_err(structural)?;
            if values.len() == keys.len() {
                // Both arguments carry the same alternation, or neither does.
                keys.into_iter()
                    .zip(values)
                    .map(|(k, v)| {
                        let (left, right) = v.split_once(MARKER).ok_or_else(missing_marker)?;
                        if format!("{left}{right}") != k {
                            return Err(parity());
                        }
                        Ok(Rule::new(k, vec![left.to_string(), right.to_string()]))
                    })
                    .collect()
            } else if let [single] = values.as_slice() {
                // Only the key alternates: the marker offset applies to every expansion.
                let (left, _) = single.split_once(MARKER).ok_or_else(missing_marker)?;
                keys.into_iter()
                    .map(|k| match k.strip_prefix(left) {
                        Some(right) => {
                            let parts = vec![left.to_string(), right.to_string()];
                            Ok(Rule::new(k, parts))
                        }
                        None => Err(parity()),
                    })
                    .collect()
            } else {
                Err(parity())
            }
        }
        _ => {
            if has_alternation(key) {
                return Err(structural(PatternError::MultiPartWithAlternation {
                    key: key.to_string(),
                    value: value.to_string(),
                }));
            }
            let parts = value.split(MARKER).map(str::to_string).collect();
            Ok(vec![Rule::new(key, parts)])
        }
    }
}

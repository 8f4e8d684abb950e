//! Simulates selnolig on a single word.

use std::fmt;

use crate::rules::{Rule, RuleStore};

/// A rule that took effect on a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FiredRule {
    /// A suppress rule inserted its boundaries. Holds the key.
    Suppress(String),
    /// A preserve pattern blocked a suppress rule. Holds the pattern.
    Preserve(String),
}

impl FiredRule {
    pub fn text(&self) -> &str {
        match self {
            Self::Suppress(key) => key,
            Self::Preserve(pattern) => pattern,
        }
    }
}

impl fmt::Display for FiredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// The simulator's view of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub annotated: String,
    pub fired: Vec<FiredRule>,
}

/// Apply every suppress rule in order to `word`.
///
/// Each rule sees the result of the rules before it, so a boundary inserted
/// early can stop a later key from matching.
pub fn apply(rules: &RuleStore, word: &str) -> Simulation {
    let mut annotated = word.to_string();
    let mut fired = Vec::new();

    for rule in rules.suppress() {
        if !annotated.contains(rule.key()) {
            continue;
        }
        let blockers = blocking_patterns(rules, rule, &annotated);
        if blockers.is_empty() {
            annotated = annotated.replace(rule.key(), &rule.annotated());
            log::trace!("{word}: nolig {} fired", rule.annotated());
            fired.push(FiredRule::Suppress(rule.key().to_string()));
        } else {
            log::trace!("{word}: nolig {} kept by {blockers:?}", rule.annotated());
            fired.extend(blockers.into_iter().map(|p| FiredRule::Preserve(p.to_string())));
        }
    }

    Simulation { annotated, fired }
}

/// Preserve patterns with an occurrence in `text` that one of `rule`'s
/// boundaries would fall strictly inside.
///
/// A pattern that contains the key always blocks it; so does a pattern
/// that overlaps the key across one of its cuts.
fn blocking_patterns<'a>(rules: &'a RuleStore, rule: &Rule, text: &str) -> Vec<&'a str> {
    let offsets = rule.cut_offsets();
    let cuts: Vec<usize> = text
        .match_indices(rule.key())
        .flat_map(|(start, _)| offsets.iter().map(move |offset| start + offset))
        .collect();

    rules
        .preserve()
        .iter()
        .map(String::as_str)
        .filter(|pattern| {
            text.match_indices(pattern).any(|(start, _)| {
                let end = start + pattern.len();
                cuts.iter().any(|&cut| start < cut && cut < end)
            })
        })
        .collect()
}

//! Consistency checks over a parsed rule store.

use itertools::Itertools;

use crate::glyph;

use super::{Diagnostic, RuleKind, RuleStore};

impl RuleStore {
    /// Check every rule and every pair of rules. Findings are advisory.
    ///
    /// - a suppress rule's parts must concatenate to its key;
    /// - each part junction must be a registered glyph;
    /// - when one key contains another, some rule of the opposite kind must
    ///   sit between them, otherwise the two conflict.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        for rule in &self.suppress {
            if !rule.is_consistent() {
                found.push(Diagnostic::InvalidRule {
                    key: rule.key.clone(),
                    parts: rule.parts.clone(),
                });
            }
            for (left, right) in rule.parts.iter().tuple_windows() {
                match (left.chars().last(), right.chars().next()) {
                    (Some(l), Some(r)) if glyph::is_junction(l, r) => {}
                    (l, r) => found.push(Diagnostic::NonGlyphJunction {
                        key: rule.key.clone(),
                        pair: l.into_iter().chain(r).collect(),
                    }),
                }
            }
        }

        let keys: Vec<&str> = self.suppress.iter().map(|r| r.key.as_str()).collect();
        let patterns: Vec<&str> = self.preserve.iter().map(String::as_str).collect();
        conflicts(RuleKind::Suppress, &keys, &patterns, &mut found);
        conflicts(RuleKind::Preserve, &patterns, &keys, &mut found);

        for diagnostic in &found {
            log::warn!("{diagnostic}");
        }
        found
    }
}

/// Report pairs in `rules` where one contains the other and no rule in
/// `mediators` lies between them.
fn conflicts(kind: RuleKind, rules: &[&str], mediators: &[&str], found: &mut Vec<Diagnostic>) {
    for (outer, inner) in rules.iter().cartesian_product(rules) {
        if outer == inner || !outer.contains(inner) {
            continue;
        }
        let mediated = mediators
            .iter()
            .any(|m| m.contains(inner) && outer.contains(m));
        if !mediated {
            found.push(Diagnostic::Conflict {
                kind,
                outer: outer.to_string(),
                inner: inner.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn rule(key: &str, parts: &[&str]) -> Rule {
        Rule::new(key, parts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn clean_store_has_no_findings() {
        let (store, _) = RuleStore::parse("\\nolig{beauftragen}{beauf|tragen}\n\\nolig{Hofh}{Hof|h}");
        assert!(store.validate().is_empty());
    }

    #[test]
    fn parts_must_join_to_key() {
        let store = RuleStore::from_rules(vec![rule("Schifffahrt", &["Schif", "f", "fart"])], vec![]);
        let found = store.validate();
        assert!(found.contains(&Diagnostic::InvalidRule {
            key: "Schifffahrt".into(),
            parts: vec!["Schif".into(), "f".into(), "fart".into()],
        }));
    }

    #[test]
    fn junction_must_be_a_glyph() {
        let store = RuleStore::from_rules(vec![rule("Haustür", &["Haus", "tür"])], vec![]);
        assert_eq!(
            store.validate(),
            vec![Diagnostic::NonGlyphJunction {
                key: "Haustür".into(),
                pair: "st".into(),
            }]
        );
    }

    #[test]
    fn every_junction_of_a_multi_part_rule_is_checked() {
        let store = RuleStore::from_rules(vec![rule("Schifffahrt", &["Schif", "f", "fahrt"])], vec![]);
        assert!(store.validate().is_empty());
    }

    #[test]
    fn empty_part_is_not_a_glyph() {
        let store = RuleStore::from_rules(vec![rule("auft", &["auft", ""])], vec![]);
        assert!(matches!(
            &store.validate()[..],
            [Diagnostic::NonGlyphJunction { pair, .. }] if pair == "t"
        ));
    }

    #[test]
    fn nested_keys_without_mediator_conflict() {
        let (store, _) = RuleStore::parse("\\nolig{auft}{auf|t}\n\\nolig{aufta}{auf|ta}");
        assert_eq!(
            store.validate(),
            vec![Diagnostic::Conflict {
                kind: RuleKind::Suppress,
                outer: "aufta".into(),
                inner: "auft".into(),
            }]
        );
    }

    #[test]
    fn preserve_rule_mediates_nested_keys() {
        let (store, _) = RuleStore::parse(
            "\\nolig{auft}{auf|t}\n\\nolig{auftakt}{auf|takt}\n\\keeplig{aufta}",
        );
        let found = store.validate();
        assert!(
            !found.iter().any(|d| matches!(d, Diagnostic::Conflict { kind: RuleKind::Suppress, .. })),
            "got: {found:?}"
        );
    }

    #[test]
    fn nested_preserve_rules_need_a_suppress_rule_between() {
        let (store, _) = RuleStore::parse("\\keeplig{aufl}\n\\keeplig{auflage}");
        assert_eq!(
            store.validate(),
            vec![Diagnostic::Conflict {
                kind: RuleKind::Preserve,
                outer: "auflage".into(),
                inner: "aufl".into(),
            }]
        );

        let (store, _) =
            RuleStore::parse("\\keeplig{aufl}\n\\keeplig{auflage}\n\\nolig{aufla}{auf|la}");
        assert!(store.validate().is_empty());
    }
}

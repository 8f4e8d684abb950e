//! Known-bug classification.
//!
//! Some disagreements are so frequent and so systematic that they would bury
//! everything else in the glyph buckets: oracle boundaries before the
//! adjective suffixes `-ig`/`-isch`, the `-innen` plural, `-t` verb endings
//! after `f`, and simulator breaks in `Pflicht` and `Hälfte`. Each such
//! pattern is a [`Signature`]; a matching disagreement is relabelled to
//! [`Tag::KnownBug`] and filed under its own category.

use std::fmt;

use crate::align::{Alignment, ErrorType, Tag};

/// A registered category of known bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BugCategory {
    Innen,
    Ig,
    Isch,
    TEnding,
    Pflicht,
    Haelfte,
}

impl BugCategory {
    /// Registry order; reports list categories in this order.
    pub const ALL: [BugCategory; 6] = [
        BugCategory::Innen,
        BugCategory::Ig,
        BugCategory::Isch,
        BugCategory::TEnding,
        BugCategory::Pflicht,
        BugCategory::Haelfte,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Innen => "innen",
            Self::Ig => "ig",
            Self::Isch => "isch",
            Self::TEnding => "t-Endung",
            Self::Pflicht => "pflicht",
            Self::Haelfte => "hälfte",
        }
    }

    pub fn error_type(self) -> ErrorType {
        match self {
            Self::Innen | Self::Ig | Self::Isch | Self::TEnding => ErrorType::One,
            Self::Pflicht | Self::Haelfte => ErrorType::Two,
        }
    }
}

impl fmt::Display for BugCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a signature's right context has to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Anywhere in the word.
    Interior,
    /// At the end of the word.
    Suffix,
}

/// Letters around a disagreement that identify a known bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub left: &'static str,
    pub right: &'static str,
    pub anchor: Anchor,
    pub category: BugCategory,
}

struct SignatureGroup {
    category: BugCategory,
    anchor: Anchor,
    left: &'static str,
    rights: &'static [&'static str],
}

const REGISTRY: &[SignatureGroup] = &[
    SignatureGroup {
        category: BugCategory::Pflicht,
        anchor: Anchor::Interior,
        left: "pf",
        rights: &["licht"],
    },
    SignatureGroup {
        category: BugCategory::Pflicht,
        anchor: Anchor::Interior,
        left: "Pf",
        rights: &["licht"],
    },
    SignatureGroup {
        category: BugCategory::Haelfte,
        anchor: Anchor::Interior,
        left: "hälf",
        rights: &["te"],
    },
    SignatureGroup {
        category: BugCategory::Haelfte,
        anchor: Anchor::Interior,
        left: "Hälf",
        rights: &["te"],
    },
    SignatureGroup {
        category: BugCategory::Innen,
        anchor: Anchor::Suffix,
        left: "",
        rights: &["in", "innen", "innenschaft", "innenschaften"],
    },
    SignatureGroup {
        category: BugCategory::Ig,
        anchor: Anchor::Suffix,
        left: "",
        rights: &[
            "ig", "iger", "igen", "igem", "iges", "ige", // positive
            "igerer", "igeren", "igerem", "igeres", "igere", // comparative
            "igst", "igster", "igsten", "igstem", "igste", // superlative
            "igkeit", "igkeiten",
        ],
    },
    SignatureGroup {
        category: BugCategory::Isch,
        anchor: Anchor::Suffix,
        left: "",
        rights: &[
            "isch", "ischer", "ischen", "ischem", "isches", "ische", // positive
            "ischerer", "ischeren", "ischerem", "ischeres", "ischere", // comparative
            "ischst", "ischster", "ischsten", "ischstem", "ischstes", "ischste", // superlative
        ],
    },
    SignatureGroup {
        category: BugCategory::TEnding,
        anchor: Anchor::Suffix,
        left: "f",
        rights: &[
            "t", "te", "test", "ten", "tet", // present and preterite
            "ter", "tem", "tes", // participle
            "terer", "teren", "terem", "teres", "tere", // comparative
            "tester", "testen", "testem", "testes", "teste", // superlative
        ],
    },
];

/// Every registered signature, interior ones first.
pub fn signatures() -> impl Iterator<Item = Signature> {
    let interior = REGISTRY.iter().filter(|g| g.anchor == Anchor::Interior);
    let suffix = REGISTRY.iter().filter(|g| g.anchor == Anchor::Suffix);
    interior.chain(suffix).flat_map(|group| {
        group.rights.iter().copied().map(move |right| Signature {
            left: group.left,
            right,
            anchor: group.anchor,
            category: group.category,
        })
    })
}

impl Signature {
    /// Test whether the signature matches at the disagreement `tags[pos]`.
    fn matches_at(&self, tags: &[Tag], pos: usize) -> bool {
        if tags[pos] != self.category.error_type().tag() {
            return false;
        }
        let left_len = self.left.chars().count();
        let right_len = self.right.chars().count();
        let Some(start) = pos.checked_sub(left_len) else {
            return false;
        };
        let end = pos + 1 + right_len;
        if end > tags.len() || (self.anchor == Anchor::Suffix && end != tags.len()) {
            return false;
        }
        spells(&tags[start..pos], self.left) && spells(&tags[pos + 1..end], self.right)
    }
}

fn spells(tags: &[Tag], letters: &str) -> bool {
    tags.iter().map(Tag::letter).eq(letters.chars().map(Some))
}

/// Relabel every disagreement that matches a known bug.
///
/// Returns the number of relabelled positions. Running it again on the
/// result relabels nothing.
pub fn classify(alignment: &mut Alignment) -> usize {
    let mut relabelled = 0;
    for signature in signatures() {
        for pos in 0..alignment.tags.len() {
            if signature.matches_at(&alignment.tags, pos) {
                alignment.tags[pos] = Tag::KnownBug(signature.category);
                relabelled += 1;
            }
        }
    }
    if relabelled > 0 {
        log::debug!("{}: {relabelled} known bug(s)", alignment.word());
    }
    relabelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;

    fn classified(oracle: &str, simulator: &str) -> Alignment {
        let word = oracle.replace('|', "");
        let mut a = align(&word, oracle, simulator).unwrap();
        classify(&mut a);
        a
    }

    fn known_bugs(a: &Alignment) -> Vec<BugCategory> {
        a.tags()
            .iter()
            .filter_map(|t| match t {
                Tag::KnownBug(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pflicht_is_relabelled() {
        let a = classified("Pflichtgefühl", "Pf|lichtgefühl");
        assert_eq!(known_bugs(&a), vec![BugCategory::Pflicht]);
        assert!(!a.tags().contains(&Tag::RightOnly));
    }

    #[test]
    fn pflicht_inside_a_compound() {
        let a = classified("Reit|helmpflicht", "Reithelmpf|licht");
        assert_eq!(known_bugs(&a), vec![BugCategory::Pflicht]);
        assert!(a.tags().contains(&Tag::LeftOnly));
    }

    #[test]
    fn every_occurrence_is_relabelled() {
        let a = classified("Pflichtpflicht", "Pf|lichtpf|licht");
        assert_eq!(known_bugs(&a), vec![BugCategory::Pflicht, BugCategory::Pflicht]);
    }

    #[test]
    fn interior_signature_needs_the_right_side() {
        // The oracle's boundary is a type 1 disagreement, not the pflicht bug.
        let a = classified("Pf|licht", "Pflicht");
        assert!(known_bugs(&a).is_empty());
    }

    #[test]
    fn haelfte() {
        let a = classified("Hälfte", "Hälf|te");
        assert_eq!(known_bugs(&a), vec![BugCategory::Haelfte]);
    }

    #[test]
    fn suffix_signatures_are_anchored() {
        let a = classified("Genoss|innen", "Genossinnen");
        assert_eq!(known_bugs(&a), vec![BugCategory::Innen]);

        let a = classified("Genoss|innenhaus", "Genossinnenhaus");
        assert!(known_bugs(&a).is_empty());
    }

    #[test]
    fn t_ending_needs_the_f() {
        let a = classified("hoff|test", "hofftest");
        assert_eq!(known_bugs(&a), vec![BugCategory::TEnding]);

        let a = classified("hass|test", "hasstest");
        assert!(known_bugs(&a).is_empty());
    }

    #[test]
    fn ig_and_isch() {
        assert_eq!(known_bugs(&classified("lust|iger", "lustiger")), vec![BugCategory::Ig]);
        assert_eq!(known_bugs(&classified("tier|ische", "tierische")), vec![BugCategory::Isch]);
    }

    #[test]
    fn agreement_is_untouched() {
        let a = classified("Pf|licht", "Pf|licht");
        assert_eq!(a.tags()[2], Tag::AgreeBoundary);
        assert!(known_bugs(&a).is_empty());
    }

    #[test]
    fn word_without_boundaries_has_nothing_to_classify() {
        let mut a = align("Pflicht", "Pflicht", "Pflicht").unwrap();
        assert_eq!(classify(&mut a), 0);
        assert!(a.tags().iter().all(|t| matches!(t, Tag::AgreeNone(_))));
    }

    #[test]
    fn classify_is_idempotent() {
        let mut a = align("Pflichthälfte", "Pflichthälfte", "Pf|lichthälf|te").unwrap();
        assert_eq!(classify(&mut a), 2);
        let once = a.clone();
        assert_eq!(classify(&mut a), 0);
        assert_eq!(a, once);
    }

    #[test]
    fn registry_is_consistent() {
        for signature in signatures() {
            assert!(!signature.right.is_empty());
            if signature.anchor == Anchor::Interior {
                assert_eq!(signature.category.error_type(), ErrorType::Two);
            }
        }
        let first_suffix = signatures().position(|s| s.anchor == Anchor::Suffix).unwrap();
        assert!(signatures().skip(first_suffix).all(|s| s.anchor == Anchor::Suffix));
    }

    #[test]
    fn category_names() {
        let names: Vec<_> = BugCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["innen", "ig", "isch", "t-Endung", "pflicht", "hälfte"]);
    }
}

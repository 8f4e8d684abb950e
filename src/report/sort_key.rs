//! Sort keys for report buckets.
//!
//! Lines are compared on the context around the current boundary. Keys are
//! normalised so that umlaut spellings sort next to their base vowels and
//! the other boundary symbols do not get in the way.

use phf::{Map, phf_map};

/// Replacements applied after lowercasing. An empty string drops the char.
const ALPHAPURE: Map<char, &'static str> = phf_map! {
    'ä' => "ae",
    'ö' => "oe",
    'ü' => "ue",
    'ß' => "ss",
    '-' => "",
    '\'' => "",
    '.' => "",
};

/// Lowercase `text` and apply the [`ALPHAPURE`] replacements.
pub fn alphapure(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match ALPHAPURE.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

/// Key for glyph buckets: left context read backwards, then right context.
pub fn context_key(left: &str, right: &str) -> (String, String) {
    let reversed: String = left.chars().rev().collect();
    (alphapure(&reversed), alphapure(right))
}

/// Key for known-bug buckets: fired rules first, then the right context
/// without a final inflection letter, the full right context, and the left
/// context read backwards.
pub fn rule_key(fired: &str, left: &str, right: &str) -> (String, String, String, String) {
    let stem = right.strip_suffix(['m', 'n', 's']).unwrap_or(right);
    let (left, full) = context_key(left, right);
    (fired.to_lowercase(), alphapure(stem), full, left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphapure_normalises() {
        assert_eq!(alphapure("Hälfte"), "haelfte");
        assert_eq!(alphapure("Größe"), "groesse");
        assert_eq!(alphapure("Ü-Wagen"), "uewagen");
        assert_eq!(alphapure("auf'la.ge"), "auflage");
    }

    #[test]
    fn context_key_reverses_left() {
        assert_eq!(
            context_key("Reit", "halfter"),
            ("tier".to_string(), "halfter".to_string())
        );
    }

    #[test]
    fn context_key_ignores_other_boundaries() {
        assert_eq!(context_key("Pf.licht'ge", "fühl").0, "egthcilfp");
        assert_eq!(context_key("a", "b'c.d").1, "bcd");
    }

    #[test]
    fn rule_key_drops_one_inflection_letter() {
        let (fired, stem, full, left) = rule_key("St|her", "drauf'lost", "herapieren");
        assert_eq!(fired, "st|her");
        assert_eq!(stem, "herapiere");
        assert_eq!(full, "herapieren");
        assert_eq!(left, "tsolfuard");
    }

    #[test]
    fn rule_key_keeps_other_endings() {
        let (_, stem, full, _) = rule_key("", "Pf", "lichtgefühl");
        assert_eq!(stem, full);
        assert_eq!(stem, "lichtgefuehl");

        let (_, stem, _, _) = rule_key("", "x", "");
        assert_eq!(stem, "");
    }

    #[test]
    fn umlauts_sort_next_to_their_vowels() {
        let mut words = vec!["Zug", "Hälfte", "Halt", "Haendel"];
        words.sort_by_cached_key(|w| alphapure(w));
        assert_eq!(words, vec!["Hälfte", "Haendel", "Halt", "Zug"]);
    }
}

//! The fixed catalogue of ligature glyphs.

use phf::{Set, phf_set};

/// A ligature glyph: two or three letters that a font may draw as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph(&'static str);

impl Glyph {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Number of letters in the glyph.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Every glyph known to the pattern language, in catalogue order.
pub const GLYPHS: [Glyph; 12] = [
    Glyph("ff"),
    Glyph("fi"),
    Glyph("fl"),
    Glyph("ffi"),
    Glyph("ffl"),
    Glyph("ft"),
    Glyph("fb"),
    Glyph("fh"),
    Glyph("fk"),
    Glyph("fj"),
    Glyph("fff"),
    Glyph("th"),
];

/// The glyphs that get their own report bucket.
///
/// The triple glyphs are left out: every break inside one of them is also a
/// break inside one of its two-letter constituents.
pub const REPORT_GLYPHS: [Glyph; 9] = [
    Glyph("ff"),
    Glyph("fi"),
    Glyph("fl"),
    Glyph("ft"),
    Glyph("fb"),
    Glyph("fh"),
    Glyph("fk"),
    Glyph("fj"),
    Glyph("th"),
];

const GLYPH_SET: Set<&'static str> = phf_set! {
    "ff", "fi", "fl", "ffi", "ffl", "ft", "fb", "fh", "fk", "fj", "fff", "th",
};

/// Look up a glyph by its letters.
pub fn lookup(letters: &str) -> Option<Glyph> {
    GLYPH_SET.get_key(letters).map(|s| Glyph(*s))
}

/// Test whether the letters pair `(left, right)` forms a registered glyph.
pub fn is_junction(left: char, right: char) -> bool {
    let pair: String = [left, right].iter().collect();
    GLYPH_SET.contains(pair.as_str())
}

/// Position of `glyph` in [`REPORT_GLYPHS`], if it has a bucket.
pub fn report_index(glyph: Glyph) -> Option<usize> {
    REPORT_GLYPHS.iter().position(|g| *g == glyph)
}

//! Checks selnolig ligature-suppression patterns against an external
//! morphological analyzer.
//!
//! The pipeline has two halves:
//!
//! 1. [`analysis`] parses a pattern file into a [`RuleStore`], simulates
//!    selnolig on every word of a morpheme list and splits the list into
//!    words where the simulator agrees with the analyzer and words where
//!    it does not.
//! 2. [`report`] takes the disagreements, aligns both segmentations
//!    position by position, moves known bugs into their own categories and
//!    files every disagreement under the ligature it concerns.
//!
//! # Example
//!
//! ```rust
//! use selnolig_check::{RuleStore, simulator};
//!
//! let (rules, diagnostics) = RuleStore::parse(r"\nolig{beauftragen}{beauf|tragen}");
//! assert!(diagnostics.is_empty());
//!
//! let sim = simulator::apply(&rules, "beauftragen");
//! assert_eq!(sim.annotated, "beauf|tragen");
//! assert_eq!(sim.fired[0].text(), "beauftragen");
//! ```

pub mod align;
pub mod analysis;
pub mod classify;
mod error;
pub mod glyph;
pub mod report;
pub mod rules;
pub mod simulator;

pub use align::{Alignment, ErrorType, Side, Tag, align};
pub use classify::{BugCategory, classify};
pub use error::{AlignError, PatternError, ReportError};
pub use glyph::Glyph;
pub use report::Report;
pub use rules::{Diagnostic, Rule, RuleKind, RuleStore};
pub use simulator::{FiredRule, Simulation};

/// Morpheme boundary in annotated strings.
pub const MARKER: char = '|';

/// Separator between the fields of report lines.
pub const FIELD_SEPARATOR: &str = " --- ";

//! Classification of a disagreement report into buckets.
//!
//! Every line of the report describes one word on which the oracle and the
//! simulator disagree. A word is filed once per disagreeing position: under
//! the glyph formed by the letters around it, or under its known-bug
//! category. In the filed copy of the line, the position being looked at is
//! [`CURRENT`], the word's other disagreements are [`OTHER`], and boundaries
//! both sides agree on are [`AGREED`].

pub mod sort_key;
pub mod writer;

use std::fmt;

use crate::FIELD_SEPARATOR;
use crate::align::{Alignment, ErrorType, Side, Tag, align};
use crate::classify::{BugCategory, classify};
use crate::error::ReportError;
use crate::glyph::{self, Glyph, REPORT_GLYPHS};

use sort_key::{context_key, rule_key};

pub use writer::Summary;

pub const CURRENT: char = '|';
pub const OTHER: char = '\'';
pub const AGREED: char = '.';

/// What a bucket collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Glyph(Glyph),
    KnownBug(BugCategory),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glyph(g) => f.write_str(g.as_str()),
            Self::KnownBug(c) => f.write_str(c.name()),
        }
    }
}

/// One line filed under one disagreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledLine {
    text: String,
    left: String,
    right: String,
    fired: String,
}

impl FiledLine {
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct Bucket {
    error_type: ErrorType,
    category: Category,
    lines: Vec<FiledLine>,
}

impl Bucket {
    fn new(error_type: ErrorType, category: Category) -> Self {
        Self {
            error_type,
            category,
            lines: Vec::new(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn lines(&self) -> &[FiledLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn sort(&mut self) {
        match self.category {
            Category::Glyph(_) => self
                .lines
                .sort_by_cached_key(|l| context_key(&l.left, &l.right)),
            Category::KnownBug(_) => self
                .lines
                .sort_by_cached_key(|l| rule_key(&l.fired, &l.left, &l.right)),
        }
    }
}

/// State of one classification run.
#[derive(Debug, Clone)]
pub struct Report {
    buckets: Vec<Bucket>,
    lines_read: usize,
    lines_processed: usize,
    ligatures_found: usize,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    /// An empty report with every bucket in output order: per error type,
    /// the glyph buckets and then that type's known-bug categories.
    pub fn new() -> Self {
        let mut buckets = Vec::new();
        for error_type in ErrorType::ALL {
            buckets.extend(
                REPORT_GLYPHS
                    .iter()
                    .map(|g| Bucket::new(error_type, Category::Glyph(*g))),
            );
            buckets.extend(
                BugCategory::ALL
                    .iter()
                    .filter(|c| c.error_type() == error_type)
                    .map(|c| Bucket::new(error_type, Category::KnownBug(*c))),
            );
        }
        Self {
            buckets,
            lines_read: 0,
            lines_processed: 0,
            ligatures_found: 0,
        }
    }

    /// Align, classify and file one report line.
    ///
    /// Blank lines and lines with too few fields are logged and skipped; they
    /// count as read but not processed. A line that cannot be aligned is an
    /// error and the caller should stop.
    pub fn process_line(&mut self, line_no: usize, line: &str) -> Result<(), ReportError> {
        self.lines_read += 1;
        if line.trim().is_empty() {
            log::warn!("line {line_no}: empty line skipped");
            return Ok(());
        }

        let fields: Vec<&str> = line.splitn(4, FIELD_SEPARATOR).collect();
        let [word, oracle, simulator, rest @ ..] = fields.as_slice() else {
            let skipped = ReportError::TooFewFields {
                line_no,
                found: fields.len(),
            };
            log::warn!("{skipped}, skipped");
            return Ok(());
        };
        let fired = rest.first().copied().unwrap_or_default();

        let mut alignment =
            align(word, oracle, simulator).map_err(|source| ReportError::Align { line_no, source })?;
        classify(&mut alignment);

        self.ligatures_found += alignment.disagreements();
        self.file(line_no, word, fired, &alignment);
        self.lines_processed += 1;
        Ok(())
    }

    /// File a copy of the line for every disagreeing position.
    fn file(&mut self, line_no: usize, word: &str, fired: &str, alignment: &Alignment) {
        let tags = alignment.tags();
        for (pos, tag) in tags.iter().enumerate() {
            let Some(error_type) = tag.error_type() else {
                continue;
            };
            let category = match tag {
                Tag::KnownBug(c) => Category::KnownBug(*c),
                _ => match neighbour_glyph(tags, pos) {
                    Some(g) => Category::Glyph(g),
                    None => {
                        log::warn!(
                            "line {line_no}: {error_type} boundary at {pos} in {word:?} is not inside a ligature"
                        );
                        continue;
                    }
                },
            };

            let filed = render(word, fired, tags, pos, error_type.side());
            log::trace!("{error_type}.{category}: {}", filed.text);
            match self
                .buckets
                .iter_mut()
                .find(|b| b.error_type == error_type && b.category == category)
            {
                Some(bucket) => bucket.lines.push(filed),
                None => log::warn!("line {line_no}: no {error_type} bucket for {category}"),
            }
        }
    }

    /// Sort the lines of every bucket.
    pub fn sort(&mut self) {
        self.buckets.iter_mut().for_each(Bucket::sort);
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn buckets_of(&self, error_type: ErrorType) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(move |b| b.error_type == error_type)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            lines_read: self.lines_read,
            lines_processed: self.lines_processed,
            ligatures_found: self.ligatures_found,
            ligatures_filed: self.buckets.iter().map(Bucket::len).sum(),
        }
    }
}

/// The report glyph formed by the letters on both sides of `tags[pos]`.
fn neighbour_glyph(tags: &[Tag], pos: usize) -> Option<Glyph> {
    let left = pos.checked_sub(1).and_then(|i| tags.get(i))?.letter()?;
    let right = tags.get(pos + 1)?.letter()?;
    let pair: String = [left, right].iter().flat_map(|c| c.to_lowercase()).collect();
    glyph::lookup(&pair).filter(|g| glyph::report_index(*g).is_some())
}

/// Build the filed line for the disagreement at `pos`, carried by `side`.
fn render(word: &str, fired: &str, tags: &[Tag], pos: usize, side: Side) -> FiledLine {
    let (before, after) = (&tags[..pos], &tags[pos + 1..]);
    let left = render_field(before, side);
    let right = render_field(after, side);
    let field = |s: Side| {
        if s == side {
            format!("{left}{CURRENT}{right}")
        } else {
            format!("{}{}", render_field(before, s), render_field(after, s))
        }
    };
    let (oracle, simulator) = (field(Side::Oracle), field(Side::Simulator));
    let text = [word, oracle.as_str(), simulator.as_str(), fired].join(FIELD_SEPARATOR);
    FiledLine {
        text,
        left,
        right,
        fired: fired.to_string(),
    }
}

/// One side's annotated string, with boundaries rendered as report symbols.
fn render_field(tags: &[Tag], side: Side) -> String {
    tags.iter()
        .filter_map(|tag| match tag {
            Tag::AgreeNone(c) => Some(*c),
            Tag::AgreeBoundary => Some(AGREED),
            t if t.has_boundary(side) => Some(OTHER),
            _ => None,
        })
        .collect()
}

//! Comparison of the simulator against the oracle's segmentation.
//!
//! Input lines have the form `WORD -> MORPHEMES`, where `MORPHEMES` is the
//! oracle's annotation of `WORD`. Every word is simulated; words on which
//! both agree go to the good stream, the rest to the bad stream in the
//! format the report classifier reads.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use itertools::Itertools;

use crate::FIELD_SEPARATOR;
use crate::rules::RuleStore;
use crate::simulator::{self, FiredRule, Simulation};

pub const GOOD_FILE: &str = "analyses.good";
pub const BAD_FILE: &str = "analyses.bad";

const ARROW: &str = " -> ";

/// Split a `WORD -> MORPHEMES` line.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(ARROW)
}

/// One word, seen by both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub word: String,
    pub oracle: String,
    pub simulation: Simulation,
}

impl Comparison {
    pub fn agrees(&self) -> bool {
        self.oracle == self.simulation.annotated
    }

    fn fired(&self) -> String {
        self.simulation.fired.iter().map(FiredRule::text).join(",")
    }

    /// `WORD --- FIRED`
    pub fn good_line(&self) -> String {
        format!("{}{FIELD_SEPARATOR}{}", self.word, self.fired())
    }

    /// `WORD --- ORACLE --- SIMULATOR --- FIRED`
    pub fn bad_line(&self) -> String {
        [
            self.word.as_str(),
            self.oracle.as_str(),
            self.simulation.annotated.as_str(),
            self.fired().as_str(),
        ]
        .join(FIELD_SEPARATOR)
    }
}

pub fn compare(rules: &RuleStore, word: &str, oracle: &str) -> Comparison {
    Comparison {
        word: word.to_string(),
        oracle: oracle.to_string(),
        simulation: simulator::apply(rules, word),
    }
}

/// The three per-rule statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// Fired on a word both sides agree on.
    Good,
    /// The only rule fired on a word they disagree on.
    Single,
    /// One of several rules fired on a word they disagree on.
    Multiple,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Good, Stat::Single, Stat::Multiple];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Good => "stats.analyses.good",
            Self::Single => "stats.analyses.type2single",
            Self::Multiple => "stats.analyses.type2multiple",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Counters for every rule of a store, in parse order.
#[derive(Debug, Clone, Default)]
pub struct RuleStats {
    names: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<[usize; 3]>,
}

impl RuleStats {
    /// Every suppress key and preserve pattern, each starting at zero.
    pub fn new(rules: &RuleStore) -> Self {
        let mut stats = Self::default();
        let keys = rules.suppress().iter().map(|r| r.key());
        let patterns = rules.preserve().iter().map(String::as_str);
        for name in keys.chain(patterns) {
            stats.slot(name);
        }
        stats
    }

    fn slot(&mut self, name: &str) -> &mut [usize; 3] {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.names.len();
                self.names.push(name.to_string());
                self.index.insert(name.to_string(), idx);
                self.counts.push([0; 3]);
                idx
            }
        };
        &mut self.counts[idx]
    }

    pub fn record(&mut self, comparison: &Comparison) {
        let fired = &comparison.simulation.fired;
        let stat = match (comparison.agrees(), fired.len()) {
            (true, _) => Stat::Good,
            (false, 1) => Stat::Single,
            (false, _) => Stat::Multiple,
        };
        for rule in fired {
            self.slot(rule.text())[stat.index()] += 1;
        }
    }

    pub fn count(&self, name: &str, stat: Stat) -> usize {
        self.index
            .get(name)
            .map_or(0, |&idx| self.counts[idx][stat.index()])
    }

    /// Rules by descending count; equal counts keep parse order.
    pub fn ranked(&self, stat: Stat) -> Vec<(&str, usize)> {
        self.names
            .iter()
            .zip(&self.counts)
            .map(|(name, counts)| (name.as_str(), counts[stat.index()]))
            .sorted_by_key(|(_, count)| Reverse(*count))
            .collect()
    }

    /// Write `RULE : COUNT` lines for `stat`.
    pub fn write(&self, out: &mut impl Write, stat: Stat) -> io::Result<()> {
        for (name, count) in self.ranked(stat) {
            writeln!(out, "{name} : {count}")?;
        }
        Ok(())
    }
}

/// Totals of one comparison run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub stats: RuleStats,
    pub lines_read: usize,
    pub agreed: usize,
    pub disagreed: usize,
    pub skipped: usize,
}

/// Compare every line of `input`, writing agreeing words to `good` and the
/// rest to `bad`.
pub fn run(
    rules: &RuleStore,
    input: impl BufRead,
    good: &mut impl Write,
    bad: &mut impl Write,
) -> io::Result<Analysis> {
    let mut analysis = Analysis {
        stats: RuleStats::new(rules),
        lines_read: 0,
        agreed: 0,
        disagreed: 0,
        skipped: 0,
    };

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        analysis.lines_read += 1;
        let Some((word, oracle)) = parse_line(line.trim_end()) else {
            log::warn!("line {}: expected WORD{ARROW}MORPHEMES, skipped", idx + 1);
            analysis.skipped += 1;
            continue;
        };

        let comparison = compare(rules, word, oracle);
        analysis.stats.record(&comparison);
        if comparison.agrees() {
            writeln!(good, "{}", comparison.good_line())?;
            analysis.agreed += 1;
        } else {
            log::debug!("{word}: oracle {oracle}, simulator {}", comparison.simulation.annotated);
            writeln!(bad, "{}", comparison.bad_line())?;
            analysis.disagreed += 1;
        }
    }

    log::info!(
        "{} lines: {} agreed, {} disagreed, {} skipped",
        analysis.lines_read,
        analysis.agreed,
        analysis.disagreed,
        analysis.skipped
    );
    Ok(analysis)
}

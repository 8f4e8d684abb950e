//! Output of a classification run.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::align::ErrorType;

use super::{AGREED, Bucket, CURRENT, OTHER, Report};

const RULER: &str = "--------------------------------------------------------------------------------";

/// Header written at the top of every bucket file.
pub fn legend() -> String {
    format!(
        "{RULER}\n\
         Pattern:\n\
         word --- oracle --- simulator --- nolig patterns applied (if any)\n\
         \n\
         Key:\n\
         {CURRENT} = current morpheme boundary, the one this line is filed for\n\
         {OTHER} = another disagreeing boundary, filed on its own elsewhere\n\
         {AGREED} = boundary both sides agree on\n\
         {RULER}\n\n"
    )
}

/// `errors.type1.ff`, `errors.type2.pflicht`, ...
pub fn file_name(bucket: &Bucket) -> String {
    format!("errors.{}.{}", bucket.error_type(), bucket.category())
}

pub fn write_bucket(out: &mut impl Write, bucket: &Bucket) -> io::Result<()> {
    out.write_all(legend().as_bytes())?;
    for line in bucket.lines() {
        writeln!(out, "{}", line.text())?;
    }
    Ok(())
}

/// Write one file per bucket into `dir`, which must exist.
pub fn write_all(report: &Report, dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(report.buckets().len());
    for bucket in report.buckets() {
        let path = dir.join(file_name(bucket));
        let mut out = BufWriter::new(File::create(&path)?);
        write_bucket(&mut out, bucket)?;
        out.flush()?;
        log::debug!("wrote {} lines to {}", bucket.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// Print the line count of every bucket, grouped by error type.
pub fn write_counts(out: &mut impl Write, report: &Report) -> io::Result<()> {
    for error_type in ErrorType::ALL {
        writeln!(out, "\n--- {error_type} ---")?;
        for bucket in report.buckets_of(error_type) {
            writeln!(out, "{}: {}", bucket.category(), bucket.len())?;
        }
    }
    Ok(())
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub lines_read: usize,
    pub lines_processed: usize,
    pub ligatures_found: usize,
    pub ligatures_filed: usize,
}

impl Summary {
    /// True if every line was processed and every disagreement was filed.
    pub fn is_consistent(&self) -> bool {
        self.lines_read == self.lines_processed && self.ligatures_found == self.ligatures_filed
    }
}

fn check(expected: usize, actual: usize) -> String {
    if expected == actual {
        "-- none missed".to_string()
    } else {
        format!("-- integrity warning: {} missed", expected.abs_diff(actual))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- summary ---")?;
        writeln!(f, "input lines read:      {}", self.lines_read)?;
        writeln!(
            f,
            "input lines processed: {} {}",
            self.lines_processed,
            check(self.lines_read, self.lines_processed)
        )?;
        writeln!(f, "ligatures detected:    {}", self.ligatures_found)?;
        writeln!(
            f,
            "ligatures filed:       {} {}",
            self.ligatures_filed,
            check(self.ligatures_found, self.ligatures_filed)
        )?;
        write!(
            f,
            "   ({} lines had more than one disagreement)",
            self.ligatures_filed.saturating_sub(self.lines_processed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> Report {
        let mut report = Report::new();
        report
            .process_line(1, "Reithalfter --- Reit|halfter --- Reithalf|ter --- lf|te")
            .unwrap();
        report.sort();
        report
    }

    #[test]
    fn legend_explains_every_symbol() {
        let legend = legend();
        assert!(legend.starts_with(RULER));
        assert!(legend.ends_with("\n\n"));
        for symbol in [CURRENT, OTHER, AGREED] {
            assert!(legend.contains(&format!("\n{symbol} = ")), "missing {symbol}");
        }
    }

    #[test]
    fn file_names() {
        let report = Report::new();
        let names: Vec<_> = report.buckets().iter().map(file_name).collect();
        assert!(names.contains(&"errors.type1.ff".to_string()));
        assert!(names.contains(&"errors.type1.t-Endung".to_string()));
        assert!(names.contains(&"errors.type2.hälfte".to_string()));
    }

    #[test]
    fn bucket_file_has_legend_then_lines() {
        let report = sample();
        let bucket = report
            .buckets_of(ErrorType::One)
            .find(|b| b.category().to_string() == "th")
            .unwrap();
        let mut out = Vec::new();
        write_bucket(&mut out, bucket).unwrap();
        let text = String::from_utf8(out).unwrap();
        let body = text.strip_prefix(&legend()).unwrap();
        assert_eq!(body, "Reithalfter --- Reit|halfter --- Reithalf'ter --- lf|te\n");
    }

    #[test]
    fn write_all_creates_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();
        let written = write_all(&report, dir.path()).unwrap();
        assert_eq!(written.len(), report.buckets().len());
        let ft = fs::read_to_string(dir.path().join("errors.type2.ft")).unwrap();
        assert!(ft.ends_with("Reithalfter --- Reit'halfter --- Reithalf|ter --- lf|te\n"));
        let empty = fs::read_to_string(dir.path().join("errors.type2.pflicht")).unwrap();
        assert_eq!(empty, legend());
    }

    #[test]
    fn counts_per_type() {
        let mut out = Vec::new();
        write_counts(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let type2 = text.find("--- type2 ---").unwrap();
        assert!(text[..type2].contains("\nth: 1\n"));
        assert!(text[type2..].contains("\nft: 1\n"));
        assert!(text[type2..].contains("\npflicht: 0\n"));
    }

    #[test]
    fn summary_flags_missing_ligatures() {
        let ok = sample().summary();
        assert!(ok.is_consistent());
        assert!(!ok.to_string().contains("integrity warning"));

        let missed = Summary {
            lines_read: 3,
            lines_processed: 3,
            ligatures_found: 5,
            ligatures_filed: 4,
        };
        assert!(!missed.is_consistent());
        assert!(missed.to_string().contains("ligatures filed:       4 -- integrity warning: 1 missed"));
    }
}

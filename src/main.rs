use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use selnolig_check::analysis::{self, Stat};
use selnolig_check::report::writer;
use selnolig_check::{Diagnostic, FIELD_SEPARATOR, FiredRule, Report, RuleStore, simulator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a pattern file
    Check {
        /// selnolig pattern file
        #[arg(short, long, value_name = "FILE")]
        patterns: PathBuf,
    },

    /// Apply the patterns to words and print the result
    Simulate {
        /// selnolig pattern file
        #[arg(short, long, value_name = "FILE")]
        patterns: PathBuf,

        #[arg(value_name = "WORD", required = true)]
        words: Vec<String>,
    },

    /// Compare the patterns against a morpheme list (WORD -> MORPHEMES)
    Analyze {
        /// selnolig pattern file
        #[arg(short, long, value_name = "FILE")]
        patterns: PathBuf,

        /// Morpheme list
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Directory for the analyses and stats files
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,
    },

    /// Sort a disagreement report into one file per error type and category
    Classify {
        /// Disagreement report (analyses.bad)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Directory for the errors files
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Check { patterns } => check(&patterns),
        Command::Simulate { patterns, words } => simulate(&patterns, &words),
        Command::Analyze {
            patterns,
            input,
            output_dir,
        } => analyze(&patterns, &input, &output_dir),
        Command::Classify { input, output_dir } => classify(&input, &output_dir),
    }
}

fn load_rules(path: &Path) -> Result<(RuleStore, Vec<Diagnostic>)> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (rules, diagnostics) = RuleStore::parse(&source);
    if rules.is_empty() {
        bail!("no patterns found in {}", path.display());
    }
    Ok((rules, diagnostics))
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn check(patterns: &Path) -> Result<()> {
    let (rules, mut diagnostics) = load_rules(patterns)?;
    diagnostics.extend(rules.validate());

    let mut out = io::stdout().lock();
    for diagnostic in &diagnostics {
        writeln!(out, "{diagnostic}")?;
    }
    writeln!(
        out,
        "{} nolig rules, {} keeplig patterns, {} findings",
        rules.suppress().len(),
        rules.preserve().len(),
        diagnostics.len()
    )?;
    Ok(())
}

fn simulate(patterns: &Path, words: &[String]) -> Result<()> {
    let (rules, _) = load_rules(patterns)?;
    let mut out = io::stdout().lock();
    for word in words {
        let sim = simulator::apply(&rules, word);
        let fired: Vec<&str> = sim.fired.iter().map(FiredRule::text).collect();
        writeln!(out, "{}{FIELD_SEPARATOR}{}", sim.annotated, fired.join(","))?;
    }
    Ok(())
}

fn analyze(patterns: &Path, input: &Path, output_dir: &Path) -> Result<()> {
    let (rules, _) = load_rules(patterns)?;
    let reader = open_input(input)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut good = create_output(output_dir, analysis::GOOD_FILE)?;
    let mut bad = create_output(output_dir, analysis::BAD_FILE)?;
    let result = analysis::run(&rules, reader, &mut good, &mut bad)
        .with_context(|| format!("failed to analyze {}", input.display()))?;
    good.flush()?;
    bad.flush()?;

    for stat in Stat::ALL {
        let mut out = create_output(output_dir, stat.file_name())?;
        result.stats.write(&mut out, stat)?;
        out.flush()?;
    }

    println!(
        "{} lines: {} agreed, {} disagreed, {} skipped",
        result.lines_read, result.agreed, result.disagreed, result.skipped
    );
    Ok(())
}

fn classify(input: &Path, output_dir: &Path) -> Result<()> {
    let reader = open_input(input)?;
    let mut report = Report::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", input.display()))?;
        report
            .process_line(idx + 1, &line)
            .with_context(|| format!("cannot classify {}", input.display()))?;
    }
    report.sort();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    writer::write_all(&report, output_dir)
        .with_context(|| format!("failed to write to {}", output_dir.display()))?;

    let summary = report.summary();
    let mut out = io::stdout().lock();
    writer::write_counts(&mut out, &report)?;
    writeln!(out, "{summary}")?;
    if !summary.is_consistent() {
        log::warn!("not every line or ligature made it into a bucket");
    }
    Ok(())
}

//! `class-transitions`: build class transition matrices and honors mobility
//! rates from an enrollment survey export.
//!
//! **Usage:**
//! ```text
//! class-transitions [--data-dir <dir>] [--survey <csv>] [--output-dir <dir>] [-v]
//! ```
//!
//! Writes `science_matrix.csv` and `math_matrix.csv` and prints a per-subject
//! summary. Exits non-zero without writing anything if any input is invalid.

#![deny(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use class_transitions::logging::init_tracing;
use class_transitions::{run, write_outputs, RunConfig, SurveyReport};

/// Build class transition matrices from a student enrollment survey.
#[derive(Parser, Debug)]
#[command(name = "class-transitions", version, about)]
struct Args {
    /// Directory holding the default-named inputs; outputs go here too unless
    /// `--output-dir` is given.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Survey export CSV (default: <data-dir>/responses.csv).
    #[arg(long)]
    survey: Option<PathBuf>,

    /// Synonym mapping (default: <data-dir>/mapping.txt).
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Math class list (default: <data-dir>/math_classes.txt).
    #[arg(long)]
    math_classes: Option<PathBuf>,

    /// Science class list (default: <data-dir>/science_classes.txt).
    #[arg(long)]
    science_classes: Option<PathBuf>,

    /// Output directory for the matrix CSVs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write raw integer counts to <subject>_counts.csv.
    #[arg(long)]
    raw_counts: bool,

    /// Answer token that is dropped after mapping.
    #[arg(long)]
    ignore_token: Option<String>,

    /// Answer meaning "not enrolled at this school".
    #[arg(long)]
    no_class_token: Option<String>,

    /// Class-list level marker that flags a class as honors (repeatable).
    #[arg(long = "honors-marker")]
    honors_markers: Vec<String>,

    /// Skip printing the full matrices.
    #[arg(long, short)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::in_dir(&self.data_dir);
        if let Some(p) = self.survey {
            config.survey_path = p;
        }
        if let Some(p) = self.mapping {
            config.mapping_path = p;
        }
        if let Some(p) = self.math_classes {
            config.math_classes_path = p;
        }
        if let Some(p) = self.science_classes {
            config.science_classes_path = p;
        }
        if let Some(p) = self.output_dir {
            config.output_dir = p;
        }
        if let Some(t) = self.ignore_token {
            config.ignore_token = t;
        }
        if let Some(t) = self.no_class_token {
            config.no_class_token = t;
        }
        if !self.honors_markers.is_empty() {
            config.honors_markers = self.honors_markers;
        }
        config.write_raw_counts = self.raw_counts;
        config
    }
}

fn print_report(report: &SurveyReport, show_matrices: bool) {
    println!("Class Transition Report");
    println!("=======================");
    println!("{} responses", report.respondents);

    for subject in &report.subjects {
        println!();
        if show_matrices {
            println!("{} transition matrix", subject.subject());
            print!("{}", subject.matrix);
            println!();
        }
        println!("{}", subject.summary);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let quiet = args.quiet;
    let config = args.into_config();

    let report = run(&config).context("survey analysis failed")?;
    print_report(&report, !quiet);

    let written = write_outputs(&report, &config)
        .with_context(|| format!("writing outputs to {}", config.output_dir.display()))?;
    println!();
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

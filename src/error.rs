//! Error taxonomy for a survey run.
//!
//! - [`ConfigError`]: a malformed line in a mapping or class-list source.
//! - [`SurveyError`]: everything that can stop a run, including the
//!   configuration errors above via `From`.
//!
//! A run is a single batch, so every error is fatal: nothing is written
//! once an error has been raised.

use std::path::PathBuf;

use crate::survey::Subject;

/// Errors raised while parsing line-oriented configuration sources.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mapping line without the `=>` separator.
    #[error("{source_name}:{line}: missing `{separator}` separator in {content:?}")]
    MissingSeparator {
        /// Name of the source being parsed (usually a file path).
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// Separator that was expected.
        separator: &'static str,
        /// Offending line, trimmed.
        content: String,
    },

    /// A line where one side of a separator is blank.
    #[error("{source_name}:{line}: empty field in {content:?}")]
    EmptyField {
        /// Name of the source being parsed.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        content: String,
    },

    /// The same class name listed twice in one class list.
    #[error("{source_name}: class {class:?} is listed more than once")]
    DuplicateClass {
        /// Name of the source being parsed.
        source_name: String,
        /// The repeated class name.
        class: String,
    },
}

/// Errors that abort a survey run.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// Malformed mapping or class list.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A survey row without exactly one cell per [`crate::survey::Column`].
    #[error("survey row {row} has {found} fields, expected {expected}")]
    RowLength {
        /// 1-based data row number (the header is row 0).
        row: usize,
        /// Expected field count.
        expected: usize,
        /// Actual field count.
        found: usize,
    },

    /// A class reported in survey data has no honors flag.
    #[error("{subject} class {class:?} is not in the class list")]
    UnknownClass {
        /// Subject whose columns contained the class.
        subject: Subject,
        /// The unknown class name.
        class: String,
    },

    /// Every transition for a subject touched the "no class" sentinel, so the
    /// mobility rates have no denominator.
    #[error("no eligible {subject} transitions to compute honors mobility from")]
    NoEligibleTransitions {
        /// Subject with an empty denominator.
        subject: Subject,
    },

    /// A matrix CSV that does not have the shape written by [`crate::report`].
    #[error("malformed matrix CSV: {reason}")]
    MalformedMatrix {
        /// What was wrong with it.
        reason: String,
    },
}

impl SurveyError {
    /// Wrap an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMatrix {
            reason: reason.into(),
        }
    }
}

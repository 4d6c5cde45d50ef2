//! Run configuration: where the inputs live and which sentinel strings apply.
//!
//! Nothing here touches the filesystem. The binary fills a [`RunConfig`] from
//! its command line and hands it to [`crate::pipeline::run`]; tests build one
//! pointing at a temporary directory.

use std::path::{Path, PathBuf};

use crate::mobility::NO_CLASS_TOKEN;
use crate::survey::{Subject, IGNORE_TOKEN};
use crate::vocabulary::DEFAULT_HONORS_MARKER;

/// Inputs, outputs and sentinels for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Survey export (CSV, header row first).
    pub survey_path: PathBuf,
    /// `raw => canonical` synonym mapping.
    pub mapping_path: PathBuf,
    /// Math class list.
    pub math_classes_path: PathBuf,
    /// Science class list.
    pub science_classes_path: PathBuf,
    /// Directory the matrix CSVs are written to.
    pub output_dir: PathBuf,
    /// Also write `<subject>_counts.csv` with the raw counts.
    pub write_raw_counts: bool,
    /// Token that marks an answer to be dropped.
    pub ignore_token: String,
    /// Token meaning "not enrolled at this school".
    pub no_class_token: String,
    /// Class-list level markers that flag a class as honors.
    pub honors_markers: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            survey_path: PathBuf::from("responses.csv"),
            mapping_path: PathBuf::from("mapping.txt"),
            math_classes_path: PathBuf::from("math_classes.txt"),
            science_classes_path: PathBuf::from("science_classes.txt"),
            output_dir: PathBuf::from("."),
            write_raw_counts: false,
            ignore_token: IGNORE_TOKEN.to_owned(),
            no_class_token: NO_CLASS_TOKEN.to_owned(),
            honors_markers: vec![DEFAULT_HONORS_MARKER.to_owned()],
        }
    }
}

impl RunConfig {
    /// Default file names, all resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            survey_path: dir.join(&defaults.survey_path),
            mapping_path: dir.join(&defaults.mapping_path),
            math_classes_path: dir.join(&defaults.math_classes_path),
            science_classes_path: dir.join(&defaults.science_classes_path),
            output_dir: dir.to_path_buf(),
            ..defaults
        }
    }

    /// Class list for `subject`.
    pub fn classes_path(&self, subject: Subject) -> &Path {
        match subject {
            Subject::Math => &self.math_classes_path,
            Subject::Science => &self.science_classes_path,
        }
    }

    /// Where the probability matrix for `subject` is written.
    pub fn matrix_output_path(&self, subject: Subject) -> PathBuf {
        self.output_dir.join(subject.matrix_file_name())
    }

    /// Where the raw counts for `subject` are written.
    pub fn counts_output_path(&self, subject: Subject) -> PathBuf {
        self.output_dir.join(subject.counts_file_name())
    }
}

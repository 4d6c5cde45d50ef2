//! End-to-end run: load inputs, analyse each subject, write outputs.
//!
//! ```text
//! survey CSV ──► parse_rows ──► rows ─┬─► compute_matrix ──► convert_to_probability
//!                    ▲                └─► count_mobility ──► rates
//!               SynonymMap                      ▲
//!                                        ClassVocabulary (per subject)
//! ```
//!
//! [`run`] does all reading and computation and returns a [`SurveyReport`].
//! Nothing is written until [`write_outputs`] is called, so a failure in any
//! subject leaves no partial output behind. [`write_outputs`] stages every
//! file next to its target and only renames them into place once all of them
//! were written.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::accumulator::{compute_matrix, TransitionCounts};
use crate::config::RunConfig;
use crate::error::SurveyError;
use crate::mobility::count_mobility;
use crate::report::{write_counts_file, write_matrix_file, SubjectSummary};
use crate::survey::{parse_rows, read_survey, Subject, SurveyRow};
use crate::synonyms::SynonymMap;
use crate::transition::{convert_to_probability, TransitionMatrix};
use crate::vocabulary::ClassVocabulary;

/// Everything computed for one subject.
#[derive(Clone, Debug)]
pub struct SubjectReport {
    /// Raw transition counts.
    pub counts: TransitionCounts,
    /// Row-normalized probabilities.
    pub matrix: TransitionMatrix,
    /// Mobility tallies and rates.
    pub summary: SubjectSummary,
}

impl SubjectReport {
    /// Subject this report covers.
    pub fn subject(&self) -> Subject {
        self.summary.subject
    }
}

/// Reports for every subject, in processing order.
#[derive(Clone, Debug)]
pub struct SurveyReport {
    /// Number of survey responses (header excluded).
    pub respondents: usize,
    /// One report per subject.
    pub subjects: Vec<SubjectReport>,
}

impl SurveyReport {
    /// Report for `subject`, if it was analysed.
    pub fn subject(&self, subject: Subject) -> Option<&SubjectReport> {
        self.subjects.iter().find(|r| r.subject() == subject)
    }
}

/// Analyse one subject over already-parsed rows.
///
/// # Errors
///
/// [`SurveyError::UnknownClass`] or [`SurveyError::NoEligibleTransitions`]
/// from the mobility classifier.
pub fn analyze_subject(
    rows: &[SurveyRow],
    vocabulary: &ClassVocabulary,
    subject: Subject,
    no_class: &str,
) -> Result<SubjectReport, SurveyError> {
    let counts = compute_matrix(rows, vocabulary, subject.columns());
    let matrix = convert_to_probability(&counts);
    let mobility = count_mobility(rows, vocabulary, subject, no_class)?;
    let rates = mobility
        .rates()
        .ok_or(SurveyError::NoEligibleTransitions { subject })?;

    tracing::info!(
        %subject,
        transitions = counts.transition_count(),
        eligible = mobility.total,
        reg_to_honors = rates.reg_to_honors,
        honors_to_reg = rates.honors_to_reg,
        "analysed subject"
    );

    Ok(SubjectReport {
        counts,
        matrix,
        summary: SubjectSummary {
            subject,
            respondents: rows.len(),
            mobility,
            rates,
        },
    })
}

/// Load every input named by `config` and analyse both subjects.
pub fn run(config: &RunConfig) -> Result<SurveyReport, SurveyError> {
    let synonyms = SynonymMap::load(&config.mapping_path)?;
    let raw = read_survey(&config.survey_path)?;
    let rows = parse_rows(&raw, &synonyms, &config.ignore_token)?;
    tracing::info!(path = %config.survey_path.display(), respondents = rows.len(), "read survey");

    let subjects = Subject::ALL
        .iter()
        .map(|&subject| {
            let vocabulary =
                ClassVocabulary::load(config.classes_path(subject), &config.honors_markers)?;
            analyze_subject(&rows, &vocabulary, subject, &config.no_class_token)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SurveyReport {
        respondents: rows.len(),
        subjects,
    })
}

/// Staging name for `path`: hidden, same directory, `.tmp` suffix.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file) = path.file_name() {
        name.push(file);
    }
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write every output to its staging path. Each `(staged, target)` pair is
/// recorded before its file is created so a failure can clean it up.
fn stage_outputs(
    report: &SurveyReport,
    config: &RunConfig,
    staged: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), SurveyError> {
    for subject_report in &report.subjects {
        let subject = subject_report.subject();

        let target = config.matrix_output_path(subject);
        let tmp = staging_path(&target);
        staged.push((tmp.clone(), target));
        write_matrix_file(&tmp, &subject_report.matrix)?;

        if config.write_raw_counts {
            let target = config.counts_output_path(subject);
            let tmp = staging_path(&target);
            staged.push((tmp.clone(), target));
            write_counts_file(&tmp, &subject_report.counts)?;
        }
    }
    Ok(())
}

/// Write the matrix CSVs (and raw counts if configured). Returns the paths written.
///
/// # Errors
///
/// [`SurveyError::Io`] or [`SurveyError::Csv`]. A failure while writing
/// removes the staged files and leaves existing outputs untouched.
pub fn write_outputs(
    report: &SurveyReport,
    config: &RunConfig,
) -> Result<Vec<PathBuf>, SurveyError> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| SurveyError::io(&config.output_dir, e))?;

    let mut staged = Vec::new();
    if let Err(e) = stage_outputs(report, config, &mut staged) {
        for (tmp, _) in &staged {
            if tmp.is_file() {
                let _ = std::fs::remove_file(tmp);
            }
        }
        tracing::warn!(error = %e, "output write failed, staged files removed");
        return Err(e);
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, target) in staged {
        std::fs::rename(&tmp, &target).map_err(|e| SurveyError::io(&target, e))?;
        tracing::info!(path = %target.display(), "output in place");
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let tmp = staging_path(Path::new("/out/math_matrix.csv"));
        assert_eq!(tmp, Path::new("/out/.math_matrix.csv.tmp"));
    }
}

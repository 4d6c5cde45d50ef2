//! CSV serialization of matrices and the per-subject summary.
//!
//! # Matrix CSV layout
//!
//! ```text
//! ,Biology,Chemistry,Physics
//! Biology,0,0.75,0.25
//! Chemistry,0,0,1
//! Physics,0,0,0
//! ```
//!
//! The header is a blank cell followed by the class names; each row is a class
//! name followed by its values in header order. Values are written with the
//! shortest representation that parses back to the same `f64`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::accumulator::TransitionCounts;
use crate::error::SurveyError;
use crate::mobility::{MobilityCounts, MobilityRates};
use crate::survey::Subject;
use crate::transition::TransitionMatrix;

/// Heading of the trailing denominator column in a raw counts CSV.
pub const COUNT_COLUMN: &str = "count";

// ─── Writing ────────────────────────────────────────────────────────────────

fn header<'a>(classes: &'a [String]) -> impl Iterator<Item = &'a str> {
    std::iter::once("").chain(classes.iter().map(String::as_str))
}

/// Write a probability matrix as CSV.
pub fn write_matrix<W: Write>(writer: W, matrix: &TransitionMatrix) -> Result<(), SurveyError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(matrix.classes()))?;
    for (class, row) in matrix.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(class.to_owned());
        record.extend(row.iter().map(f64::to_string));
        out.write_record(&record)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write raw counts as CSV, with the row denominator as a last column.
pub fn write_counts<W: Write>(writer: W, counts: &TransitionCounts) -> Result<(), SurveyError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(counts.classes()).chain(std::iter::once(COUNT_COLUMN)))?;
    for (i, class) in counts.classes().iter().enumerate() {
        let mut record = Vec::with_capacity(counts.size() + 2);
        record.push(class.clone());
        record.extend(counts.row(i).iter().map(u32::to_string));
        record.push(counts.total(i).to_string());
        out.write_record(&record)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a probability matrix to `path`, replacing any existing file.
pub fn write_matrix_file(path: &Path, matrix: &TransitionMatrix) -> Result<(), SurveyError> {
    let file = File::create(path).map_err(|e| SurveyError::io(path, e))?;
    write_matrix(file, matrix)?;
    tracing::info!(path = %path.display(), classes = matrix.size(), "wrote transition matrix");
    Ok(())
}

/// Write raw counts to `path`, replacing any existing file.
pub fn write_counts_file(path: &Path, counts: &TransitionCounts) -> Result<(), SurveyError> {
    let file = File::create(path).map_err(|e| SurveyError::io(path, e))?;
    write_counts(file, counts)?;
    tracing::info!(path = %path.display(), classes = counts.size(), "wrote transition counts");
    Ok(())
}

// ─── Reading ────────────────────────────────────────────────────────────────

/// Read a matrix previously written by [`write_matrix`].
///
/// # Errors
///
/// [`SurveyError::MalformedMatrix`] if the header does not start with a blank
/// cell, a row's class does not match the header order, a value is not a
/// number, or the matrix is not square.
pub fn read_matrix<R: Read>(reader: R) -> Result<TransitionMatrix, SurveyError> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = input.records();

    let head = records
        .next()
        .ok_or_else(|| SurveyError::malformed("empty file"))??;
    let mut fields = head.iter();
    if fields.next() != Some("") {
        return Err(SurveyError::malformed("header must start with a blank cell"));
    }
    let classes: Vec<String> = fields.map(str::to_owned).collect();

    let mut rows = Vec::with_capacity(classes.len());
    for (i, record) in records.enumerate() {
        let record = record?;
        let mut fields = record.iter();
        let class = fields.next().unwrap_or_default();
        match classes.get(i) {
            Some(expected) if expected == class => {}
            _ => {
                return Err(SurveyError::malformed(format!(
                    "row {} is {class:?}, out of header order",
                    i + 1
                )))
            }
        }
        let values = fields
            .map(|v| {
                v.trim().parse::<f64>().map_err(|_| {
                    SurveyError::malformed(format!("row {class:?}: {v:?} is not a number"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    TransitionMatrix::from_rows(classes, rows)
}

/// Read a matrix CSV from `path`.
pub fn read_matrix_file(path: &Path) -> Result<TransitionMatrix, SurveyError> {
    let file = File::open(path).map_err(|e| SurveyError::io(path, e))?;
    read_matrix(file)
}

// ─── Summary ────────────────────────────────────────────────────────────────

/// Headline numbers for one subject.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectSummary {
    /// Which subject.
    pub subject: Subject,
    /// Survey rows analysed.
    pub respondents: usize,
    /// Raw mobility tallies.
    pub mobility: MobilityCounts,
    /// Mobility rates derived from `mobility`.
    pub rates: MobilityRates,
}

impl std::fmt::Display for SubjectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} ({} respondents, {} eligible transitions)",
            self.subject, self.respondents, self.mobility.total
        )?;
        write!(f, "{}", self.rates)
    }
}

//! Row-normalized transition probabilities.
//!
//! [`convert_to_probability`] divides every cell of a [`TransitionCounts`]
//! row by `max(count, 1)`. It does not mutate the counts: raw counts and
//! probabilities are separate values.
//!
//! Every resulting entry lies in `[0.0, 1.0]`. A class that never appeared
//! as a source has an all-zero row. Rows are not guaranteed to sum to 1
//! because previous→current and current→next events share one denominator.

use std::fmt;

use crate::accumulator::TransitionCounts;
use crate::error::SurveyError;

/// Square matrix of transition probabilities over an ordered class list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionMatrix {
    classes: Vec<String>,
    /// Row-major, row stride = `classes.len()`.
    values: Vec<f64>,
}

impl TransitionMatrix {
    /// Build a matrix from class names and one row of values per class.
    ///
    /// # Errors
    ///
    /// [`SurveyError::MalformedMatrix`] if the rows do not form a square
    /// matrix over `classes`.
    pub fn from_rows(classes: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, SurveyError> {
        let n = classes.len();
        if rows.len() != n {
            return Err(SurveyError::malformed(format!(
                "{} classes but {} rows",
                n,
                rows.len()
            )));
        }
        let mut values = Vec::with_capacity(n * n);
        for (class, row) in classes.iter().zip(rows) {
            if row.len() != n {
                return Err(SurveyError::malformed(format!(
                    "row {class:?} has {} values, expected {n}",
                    row.len()
                )));
            }
            values.extend(row);
        }
        Ok(Self { classes, values })
    }

    /// Class names in row/column order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Dimension of the square matrix.
    pub fn size(&self) -> usize {
        self.classes.len()
    }

    /// One source row.
    pub fn row(&self, from: usize) -> &[f64] {
        let n = self.size();
        &self.values[from * n..(from + 1) * n]
    }

    /// Iterate `(class, row)` pairs in order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.classes
            .iter()
            .enumerate()
            .map(move |(i, c)| (c.as_str(), self.row(i)))
    }

    /// Probability for a named transition, or `None` if either class is unknown.
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        let i = self.classes.iter().position(|c| c == from)?;
        let j = self.classes.iter().position(|c| c == to)?;
        Some(self.values[i * self.size() + j])
    }
}

impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (class, row) in self.rows() {
            write!(f, "{class} {{")?;
            for (j, (to, value)) in self.classes.iter().zip(row).enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{to}: {value:.4}")?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// Normalize each row of `counts` by its class count (clamped to at least 1).
pub fn convert_to_probability(counts: &TransitionCounts) -> TransitionMatrix {
    let n = counts.size();
    let mut values = Vec::with_capacity(n * n);
    for i in 0..n {
        let denom = f64::from(counts.total(i).max(1));
        values.extend(counts.row(i).iter().map(|&c| f64::from(c) / denom));
    }
    TransitionMatrix {
        classes: counts.classes().to_vec(),
        values,
    }
}

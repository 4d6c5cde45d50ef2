//! Survey rows: fixed column layout, subjects, and the row parser.
//!
//! Every survey cell is a comma-separated list of free-text class names. The
//! parser splits it, trims each piece, rewrites it through the
//! [`SynonymMap`], and collects the result into a set. Pieces equal to the
//! ignore token (after mapping) are dropped, as are blank pieces, so a cell
//! can legitimately parse to an empty set.
//!
//! # Column layout
//!
//! ```text
//!   0 timestamp   1 grade
//!   2 cur_sci     3 prev_sci   4 next_sci
//!   5 cur_math    6 prev_math  7 next_math
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::SurveyError;
use crate::synonyms::SynonymMap;

/// Default token a mapping can rewrite an answer to so that it is dropped.
pub const IGNORE_TOKEN: &str = "ignore";

/// Number of fields in every survey row.
pub const COLUMN_COUNT: usize = 8;

// ─── Column ─────────────────────────────────────────────────────────────────

/// Logical survey columns, mapped to fixed positions in the export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Form submission time.
    Timestamp,
    /// Respondent's grade.
    Grade,
    /// Science classes this year.
    CurrentScience,
    /// Science classes last year.
    PreviousScience,
    /// Science classes planned for next year.
    NextScience,
    /// Math classes this year.
    CurrentMath,
    /// Math classes last year.
    PreviousMath,
    /// Math classes planned for next year.
    NextMath,
}

impl Column {
    /// All columns in export order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Timestamp,
        Column::Grade,
        Column::CurrentScience,
        Column::PreviousScience,
        Column::NextScience,
        Column::CurrentMath,
        Column::PreviousMath,
        Column::NextMath,
    ];

    /// Zero-based position of this column in a survey row.
    pub const fn index(self) -> usize {
        match self {
            Column::Timestamp => 0,
            Column::Grade => 1,
            Column::CurrentScience => 2,
            Column::PreviousScience => 3,
            Column::NextScience => 4,
            Column::CurrentMath => 5,
            Column::PreviousMath => 6,
            Column::NextMath => 7,
        }
    }
}

// ─── Subject ────────────────────────────────────────────────────────────────

/// A subject with its own class list and its own three time-point columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subject {
    /// Science courses.
    Science,
    /// Math courses.
    Math,
}

/// The previous / current / next columns of one subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubjectColumns {
    /// Last year's classes.
    pub previous: Column,
    /// This year's classes.
    pub current: Column,
    /// Next year's classes.
    pub next: Column,
}

impl Subject {
    /// Processing order for a full run.
    pub const ALL: [Subject; 2] = [Subject::Science, Subject::Math];

    /// Columns holding this subject's answers.
    pub const fn columns(self) -> SubjectColumns {
        match self {
            Subject::Science => SubjectColumns {
                previous: Column::PreviousScience,
                current: Column::CurrentScience,
                next: Column::NextScience,
            },
            Subject::Math => SubjectColumns {
                previous: Column::PreviousMath,
                current: Column::CurrentMath,
                next: Column::NextMath,
            },
        }
    }

    /// Lower-case name used in file names.
    pub const fn slug(self) -> &'static str {
        match self {
            Subject::Science => "science",
            Subject::Math => "math",
        }
    }

    /// Output file name for this subject's probability matrix.
    pub fn matrix_file_name(self) -> String {
        format!("{}_matrix.csv", self.slug())
    }

    /// Output file name for this subject's raw count matrix.
    pub fn counts_file_name(self) -> String {
        format!("{}_counts.csv", self.slug())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Science => f.write_str("Science"),
            Subject::Math => f.write_str("Math"),
        }
    }
}

// ─── SurveyRow ──────────────────────────────────────────────────────────────

/// One respondent's answers, each column reduced to a set of canonical names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurveyRow {
    cells: [BTreeSet<String>; COLUMN_COUNT],
}

impl SurveyRow {
    /// Build a row directly from per-column sets (export order).
    pub fn from_cells(cells: [BTreeSet<String>; COLUMN_COUNT]) -> Self {
        Self { cells }
    }

    /// Build a row with only one subject's three columns filled in.
    ///
    /// Handy for tests and for callers that assemble rows programmatically.
    pub fn for_subject<P, C, N>(subject: Subject, previous: P, current: C, next: N) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let cols = subject.columns();
        let mut row = Self::default();
        row.cells[cols.previous.index()] = previous.into_iter().map(Into::into).collect();
        row.cells[cols.current.index()] = current.into_iter().map(Into::into).collect();
        row.cells[cols.next.index()] = next.into_iter().map(Into::into).collect();
        row
    }

    /// The set of classes reported in `column`.
    pub fn get(&self, column: Column) -> &BTreeSet<String> {
        &self.cells[column.index()]
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parse one raw cell into a set of canonical class names.
pub fn parse_cell(cell: &str, synonyms: &SynonymMap, ignore: &str) -> BTreeSet<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| synonyms.normalize(piece))
        .filter(|name| *name != ignore)
        .map(str::to_owned)
        .collect()
}

/// Parse raw survey rows. The first row is the header and is discarded.
///
/// # Errors
///
/// [`SurveyError::RowLength`] if a data row does not have exactly
/// [`COLUMN_COUNT`] fields.
pub fn parse_rows<R, S>(
    raw: &[R],
    synonyms: &SynonymMap,
    ignore: &str,
) -> Result<Vec<SurveyRow>, SurveyError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut rows = Vec::with_capacity(raw.len().saturating_sub(1));
    for (i, record) in raw.iter().enumerate().skip(1) {
        let record = record.as_ref();
        if record.len() != COLUMN_COUNT {
            return Err(SurveyError::RowLength {
                row: i,
                expected: COLUMN_COUNT,
                found: record.len(),
            });
        }
        let cells = core::array::from_fn(|c| parse_cell(record[c].as_ref(), synonyms, ignore));
        rows.push(SurveyRow::from_cells(cells));
    }
    tracing::debug!(rows = rows.len(), "parsed survey rows");
    Ok(rows)
}

/// Read a survey export into raw string records, header included.
///
/// Field counts are not checked here; [`parse_rows`] does that.
pub fn read_survey(path: &Path) -> Result<Vec<Vec<String>>, SurveyError> {
    let file = std::fs::File::open(path).map_err(|e| SurveyError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut raw = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw.push(record.iter().map(str::to_owned).collect());
    }
    Ok(raw)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

//! Transition count accumulation over a fixed class vocabulary.
//!
//! For every survey row and every class `c` the respondent takes now:
//!
//! ```text
//! for p in previous:  matrix[p][c] += 1;  count[p] += 1
//! for n in next:      matrix[c][n] += 1
//! count[c] += 1                           (once per current class)
//! ```
//!
//! The two halves feed the denominator differently. A previous class earns one
//! count unit per previous→current pair, while a current class earns exactly
//! one unit per row no matter how many next classes it leads to. Rows with
//! several next classes can therefore push a row's next-transition sum above
//! its count; the converter accepts that.
//!
//! # Invariants
//!
//! - The grid is square over the vocabulary, in vocabulary order.
//! - Every cell satisfies `matrix[a][b] <= count[a]`.
//! - Classes outside the vocabulary are skipped, never indexed. A current class
//!   that is unknown contributes nothing at all for that row.

use crate::survey::{SubjectColumns, SurveyRow};
use crate::vocabulary::ClassVocabulary;

// ─── TransitionCounts ───────────────────────────────────────────────────────

/// Raw transition counts for one subject.
///
/// Row-major `n × n` grid (row = source class, column = destination class)
/// plus a per-class source count used as the row denominator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionCounts {
    classes: Vec<String>,
    cells: Vec<u32>,
    totals: Vec<u32>,
}

impl TransitionCounts {
    /// All-zero counts over `vocabulary`.
    pub fn new(vocabulary: &ClassVocabulary) -> Self {
        let n = vocabulary.len();
        Self {
            classes: vocabulary.names().map(str::to_owned).collect(),
            cells: vec![0; n * n],
            totals: vec![0; n],
        }
    }

    /// Class names in row/column order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Dimension of the square grid.
    pub fn size(&self) -> usize {
        self.classes.len()
    }

    /// Count at (`from`, `to`) by position.
    ///
    /// # Panics
    ///
    /// If either index is out of range.
    pub fn cell(&self, from: usize, to: usize) -> u32 {
        self.cells[from * self.size() + to]
    }

    /// One source row of the grid.
    pub fn row(&self, from: usize) -> &[u32] {
        let n = self.size();
        &self.cells[from * n..(from + 1) * n]
    }

    /// Denominator for row `from`.
    pub fn total(&self, from: usize) -> u32 {
        self.totals[from]
    }

    /// Per-class denominators in vocabulary order.
    pub fn totals(&self) -> &[u32] {
        &self.totals
    }

    /// Count for a named transition, or `None` if either class is unknown.
    pub fn get(&self, from: &str, to: &str) -> Option<u32> {
        let i = self.position(from)?;
        let j = self.position(to)?;
        Some(self.cell(i, j))
    }

    /// Denominator for a named class, or `None` if unknown.
    pub fn count(&self, class: &str) -> Option<u32> {
        self.position(class).map(|i| self.totals[i])
    }

    /// Sum of every cell in the grid.
    pub fn transition_count(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    fn position(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    fn bump(&mut self, from: usize, to: usize) {
        let n = self.size();
        let cell = &mut self.cells[from * n + to];
        *cell = cell.saturating_add(1);
    }

    fn bump_total(&mut self, class: usize) {
        self.totals[class] = self.totals[class].saturating_add(1);
    }
}

// ─── Accumulation ───────────────────────────────────────────────────────────

/// Resolve a row's class set to vocabulary positions, dropping unknown names.
fn known_positions<'a>(
    classes: impl IntoIterator<Item = &'a String>,
    vocabulary: &ClassVocabulary,
) -> Vec<usize> {
    classes
        .into_iter()
        .filter_map(|name| {
            let pos = vocabulary.index_of(name);
            if pos.is_none() {
                tracing::debug!(class = %name, "class not in vocabulary, skipped");
            }
            pos
        })
        .collect()
}

/// Accumulate raw transition counts for one subject.
///
/// `columns` selects which of the row's cells are the previous, current and
/// next class sets.
pub fn compute_matrix(
    rows: &[SurveyRow],
    vocabulary: &ClassVocabulary,
    columns: SubjectColumns,
) -> TransitionCounts {
    let mut counts = TransitionCounts::new(vocabulary);

    for row in rows {
        let previous = known_positions(row.get(columns.previous), vocabulary);
        let current = known_positions(row.get(columns.current), vocabulary);
        let next = known_positions(row.get(columns.next), vocabulary);

        for &c in &current {
            for &p in &previous {
                counts.bump(p, c);
                counts.bump_total(p);
            }
            for &n in &next {
                counts.bump(c, n);
            }
            counts.bump_total(c);
        }
    }

    tracing::debug!(
        rows = rows.len(),
        classes = counts.size(),
        transitions = counts.transition_count(),
        "accumulated transition counts"
    );
    counts
}

// ─── Tests ──────────────────────────────────────────────────────────────────

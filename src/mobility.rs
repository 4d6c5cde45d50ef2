//! Regular ↔ honors mobility across adjacent school years.
//!
//! Each row is reduced to three flags, one per time-point, that are `true`
//! when *any* class in that slot is honors (an empty slot is `false`). Two
//! independent checks then run per row:
//!
//! | Check | Skipped when the "no class" sentinel is in |
//! |-------|--------------------------------------------|
//! | previous → current | the previous or current set |
//! | current → next | the current or next set |
//!
//! A check that runs always adds one to the shared denominator, and adds one
//! to `reg_to_honors` or `honors_to_reg` when the level changes.
//!
//! The sentinel itself needs no honors flag. Any other class missing from the
//! vocabulary fails the run with [`SurveyError::UnknownClass`].

use std::collections::BTreeSet;
use std::fmt;

use crate::error::SurveyError;
use crate::survey::{Subject, SurveyRow};
use crate::vocabulary::ClassVocabulary;

/// Default sentinel meaning "not enrolled in this subject at the school".
pub const NO_CLASS_TOKEN: &str = "No class at Gunn";

// ─── Counts ─────────────────────────────────────────────────────────────────

/// Raw mobility tallies for one subject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilityCounts {
    /// Regular level followed by honors level.
    pub reg_to_honors: u32,
    /// Honors level followed by regular level.
    pub honors_to_reg: u32,
    /// Transitions that were not excluded by the sentinel.
    pub total: u32,
}

impl MobilityCounts {
    /// Tally one transition between two levels.
    pub fn record(&mut self, from_honors: bool, to_honors: bool) {
        match (from_honors, to_honors) {
            (false, true) => self.reg_to_honors += 1,
            (true, false) => self.honors_to_reg += 1,
            _ => {}
        }
        self.total += 1;
    }

    /// Rates over `total`, or `None` if no transition was eligible.
    pub fn rates(&self) -> Option<MobilityRates> {
        if self.total == 0 {
            return None;
        }
        let total = f64::from(self.total);
        let honors_to_reg = f64::from(self.honors_to_reg) / total;
        Some(MobilityRates {
            reg_to_honors: f64::from(self.reg_to_honors) / total,
            honors_to_reg,
            honors_retained: 1.0 - honors_to_reg,
        })
    }
}

// ─── Rates ──────────────────────────────────────────────────────────────────

/// Mobility rates, each a fraction of all eligible transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilityRates {
    /// `reg_to_honors / total`.
    pub reg_to_honors: f64,
    /// `honors_to_reg / total`.
    pub honors_to_reg: f64,
    /// `1 - honors_to_reg`.
    pub honors_retained: f64,
}

impl fmt::Display for MobilityRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  regular -> honors: {:6.2}%", self.reg_to_honors * 100.0)?;
        writeln!(f, "  honors -> regular: {:6.2}%", self.honors_to_reg * 100.0)?;
        write!(f, "  honors retained:   {:6.2}%", self.honors_retained * 100.0)
    }
}

// ─── Classification ─────────────────────────────────────────────────────────

/// `true` if any class in `classes` is honors.
///
/// Every class is looked up, so an unknown name fails even when an earlier
/// class already settled the answer.
fn any_honors(
    classes: &BTreeSet<String>,
    vocabulary: &ClassVocabulary,
    subject: Subject,
    no_class: &str,
) -> Result<bool, SurveyError> {
    let mut honors = false;
    for class in classes {
        if class == no_class {
            continue;
        }
        honors |= vocabulary
            .is_honors(class)
            .ok_or_else(|| SurveyError::UnknownClass {
                subject,
                class: class.clone(),
            })?;
    }
    Ok(honors)
}

/// Tally regular ↔ honors transitions for `subject`.
///
/// # Errors
///
/// [`SurveyError::UnknownClass`] if a reported class has no honors flag.
pub fn count_mobility(
    rows: &[SurveyRow],
    vocabulary: &ClassVocabulary,
    subject: Subject,
    no_class: &str,
) -> Result<MobilityCounts, SurveyError> {
    let columns = subject.columns();
    let mut counts = MobilityCounts::default();

    for (i, row) in rows.iter().enumerate() {
        let previous = row.get(columns.previous);
        let current = row.get(columns.current);
        let next = row.get(columns.next);

        let prev_honors = any_honors(previous, vocabulary, subject, no_class)?;
        let cur_honors = any_honors(current, vocabulary, subject, no_class)?;
        let next_honors = any_honors(next, vocabulary, subject, no_class)?;

        let cur_absent = current.contains(no_class);
        let first = !(previous.contains(no_class) || cur_absent);
        let second = !(cur_absent || next.contains(no_class));
        if first {
            counts.record(prev_honors, cur_honors);
        }
        if second {
            counts.record(cur_honors, next_honors);
        }
        if !(first || second) {
            tracing::warn!(%subject, row = i + 1, "row excluded from honors mobility");
        }
    }

    tracing::debug!(
        %subject,
        reg_to_honors = counts.reg_to_honors,
        honors_to_reg = counts.honors_to_reg,
        total = counts.total,
        "counted honors mobility"
    );
    Ok(counts)
}

/// Regular → honors and honors → regular rates for `subject`.
///
/// # Errors
///
/// [`SurveyError::UnknownClass`] as for [`count_mobility`], and
/// [`SurveyError::NoEligibleTransitions`] when every transition was excluded.
pub fn calculate_reg_honors(
    rows: &[SurveyRow],
    vocabulary: &ClassVocabulary,
    subject: Subject,
    no_class: &str,
) -> Result<MobilityRates, SurveyError> {
    count_mobility(rows, vocabulary, subject, no_class)?
        .rates()
        .ok_or(SurveyError::NoEligibleTransitions { subject })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

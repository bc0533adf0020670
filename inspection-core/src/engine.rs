//! Condition scoring and report aggregation.
//!
//! Every function here is pure: inputs are borrowed and never mutated, and
//! [`calculate_scores`] returns a new report. Averages use round-half-up
//! computed in integer arithmetic, so `86.5` becomes `87` regardless of
//! floating point representation.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Condition, ConditionValue, Rating, Report, ReportStatus, Unit};

/// Points awarded for [`Condition::Good`].
pub const GOOD_POINTS: u8 = 80;
/// Points awarded for [`Condition::Better`].
pub const BETTER_POINTS: u8 = 100;
/// Points awarded for [`Condition::Bad`].
pub const BAD_POINTS: u8 = 40;

/// Lowest overall score rated [`Rating::Good`].
pub const GOOD_THRESHOLD: u8 = 70;
/// Lowest overall score rated [`Rating::Average`].
pub const AVERAGE_THRESHOLD: u8 = 50;

/// Contribution of a single checkpoint to its unit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointScore {
    /// Counted in the average with the given points.
    Answered(u8),
    /// Excluded from both numerator and denominator.
    Unanswered,
}

/// Answer counts and score of a unit, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    /// Unit name.
    pub name: String,
    /// Checkpoints in the unit, including sub-units.
    pub total: usize,
    /// Checkpoints with a recognized condition.
    pub answered: usize,
    /// Checkpoints with no condition.
    pub unanswered: usize,
    /// Checkpoints with a condition outside the recognized set.
    pub unrecognized: usize,
    /// Unit score, 0-100.
    pub score: u8,
}

/// Map a checkpoint condition to its point value.
pub fn score_checkpoint_condition(condition: &ConditionValue) -> CheckpointScore {
    match condition {
        ConditionValue::Recognized(Condition::Good) => CheckpointScore::Answered(GOOD_POINTS),
        ConditionValue::Recognized(Condition::Better) => CheckpointScore::Answered(BETTER_POINTS),
        ConditionValue::Recognized(Condition::Bad) => CheckpointScore::Answered(BAD_POINTS),
        ConditionValue::Unset => CheckpointScore::Unanswered,
        ConditionValue::Unrecognized(raw) => {
            debug!("excluding unrecognized condition {raw:?} from score");
            CheckpointScore::Unanswered
        }
    }
}

/// Average the points of a unit's answered checkpoints, sub-units included.
///
/// Returns 0 when nothing is answered.
pub fn compute_unit_score(unit: &Unit) -> u8 {
    let points = unit
        .all_checkpoints()
        .filter_map(|checkpoint| match score_checkpoint_condition(&checkpoint.condition) {
            CheckpointScore::Answered(points) => Some(u32::from(points)),
            CheckpointScore::Unanswered => None,
        });
    rounded_mean(points)
}

/// Unweighted mean of the units' stored scores. Returns 0 for no units.
pub fn compute_overall_score(report: &Report) -> u8 {
    rounded_mean(report.units.iter().map(|unit| u32::from(unit.unit_score)))
}

/// Classify an overall score.
pub fn classify_rating(overall_score: u8) -> Rating {
    if overall_score >= GOOD_THRESHOLD {
        Rating::Good
    } else if overall_score >= AVERAGE_THRESHOLD {
        Rating::Average
    } else {
        Rating::NotGood
    }
}

/// Recompute unit scores, overall score and rating from scratch.
///
/// Only the derived fields and the lifecycle status change: a draft with at
/// least one answered checkpoint becomes scored, nothing moves back to
/// draft, and saved reports keep their status.
pub fn calculate_scores(report: &Report) -> Report {
    let mut scored = report.clone();
    for unit in &mut scored.units {
        unit.unit_score = compute_unit_score(unit);
    }
    scored.overall_score = compute_overall_score(&scored);
    scored.overall_rating = classify_rating(scored.overall_score);

    if scored.status == ReportStatus::Draft && answered_checkpoints(&scored) > 0 {
        info!(
            "report scored: overall {} ({})",
            scored.overall_score, scored.overall_rating
        );
        scored.status = ReportStatus::Scored;
    }

    scored
}

/// Count checkpoints with a recognized condition across the report.
pub fn answered_checkpoints(report: &Report) -> usize {
    report
        .units
        .iter()
        .flat_map(|unit| unit.all_checkpoints())
        .filter(|checkpoint| checkpoint.condition.condition().is_some())
        .count()
}

/// Summarize a unit's answers. The score is recomputed, not read from the
/// stored field.
pub fn summarize_unit(unit: &Unit) -> UnitSummary {
    let mut summary = UnitSummary {
        name: unit.name.clone(),
        total: 0,
        answered: 0,
        unanswered: 0,
        unrecognized: 0,
        score: compute_unit_score(unit),
    };
    for checkpoint in unit.all_checkpoints() {
        summary.total += 1;
        match &checkpoint.condition {
            ConditionValue::Recognized(_) => summary.answered += 1,
            ConditionValue::Unset => summary.unanswered += 1,
            ConditionValue::Unrecognized(_) => summary.unrecognized += 1,
        }
    }
    summary
}

fn rounded_mean(values: impl Iterator<Item = u32>) -> u8 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), value| {
        (sum + u64::from(value), count + 1)
    });
    if count == 0 {
        return 0;
    }
    let rounded = (2 * sum + count) / (2 * count);
    // Inputs are bounded by 100, so the mean is too.
    rounded.min(100) as u8
}

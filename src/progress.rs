//! Training cycle progress
//!
//! Turns a cycle goal and the number of checkins already attributed to it into
//! the summary shown on the student card:
//! - percentage complete (0-100)
//! - checkins completed / remaining
//! - days remaining until the cycle ends
//! - a display tier used for color-coding
//!
//! Which checkins belong to the cycle is decided by the caller. This module
//! only does the arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::CycleGoal;

const HIGH_TIER_MIN_PCT: u8 = 80;
const MEDIUM_TIER_MIN_PCT: u8 = 50;

// ---------------------------------------------------------------------------
/// Progress Tier: coarse display classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    /// percentage >= 80
    High,
    /// 50 <= percentage < 80
    Medium,
    /// percentage < 50
    Low,
}

impl ProgressTier {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            p if p >= HIGH_TIER_MIN_PCT => ProgressTier::High,
            p if p >= MEDIUM_TIER_MIN_PCT => ProgressTier::Medium,
            _ => ProgressTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressTier::High => "high",
            ProgressTier::Medium => "medium",
            ProgressTier::Low => "low",
        }
    }
}

impl std::fmt::Display for ProgressTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
/// Derived Progress: computed, never persisted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedProgress {
    pub percentage: u8,
    pub completed: u32,
    pub remaining: u32,
    pub target: u32,
    pub days_remaining: i64,
    pub tier: ProgressTier,
    /// 1-based week of the cycle that contains today
    pub current_week: u32,
}

/// Compute progress for a cycle given the checkins already counted against it.
///
/// A target below 1 is a caller error and is rejected before any division.
pub fn compute_cycle_progress(
    goal: &CycleGoal,
    completed: u32,
    today: NaiveDate,
) -> Result<DerivedProgress, AppError> {
    if goal.target_checkins < 1 {
        return Err(AppError::InvalidGoal(format!(
            "cycle {} has target {} (must be at least 1)",
            goal.id, goal.target_checkins
        )));
    }
    let target = goal.target_checkins as u32;

    let rounded = ((completed as f64 / target as f64) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8;
    // 100% only once the goal is actually reached (199/200 rounds up otherwise)
    let percentage = if completed < target { rounded.min(99) } else { rounded };

    let remaining = target.saturating_sub(completed);
    let days_remaining = (goal.end_date - today).num_days().max(0);

    Ok(DerivedProgress {
        percentage,
        completed,
        remaining,
        target,
        days_remaining,
        tier: ProgressTier::from_percentage(percentage),
        current_week: current_cycle_week(goal, today),
    })
}

fn current_cycle_week(goal: &CycleGoal, today: NaiveDate) -> u32 {
    let elapsed_days = (today - goal.start_date).num_days().max(0);
    let week = (elapsed_days / 7 + 1) as u32;
    let max_week = goal.duration_weeks.max(1) as u32;
    week.min(max_week)
}

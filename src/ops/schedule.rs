//! Quarter-based scheduling derivations.
//!
//! Every function here is total: missing input yields the documented
//! neutral default (0, false) rather than an error. Callers pass `today`
//! explicitly so derivations stay deterministic under test.

use chrono::NaiveDate;

use crate::model::activity::{Activity, SubItem};
use crate::model::quarter::Quarter;

/// Whether `target` is strictly later than `reference`.
///
/// False whenever either side is absent — an incomplete schedule never
/// raises a delay flag.
pub fn is_delayed(target: Option<Quarter>, reference: Option<Quarter>) -> bool {
    match (target, reference) {
        (Some(t), Some(r)) => t > r,
        _ => false,
    }
}

/// Whether any sub-item's target lands after the activity's own target.
pub fn activity_delayed(activity: &Activity) -> bool {
    activity
        .sub_items
        .iter()
        .any(|s| is_delayed(s.target, activity.target))
}

/// Progress the schedule alone predicts: today's fractional position in
/// [start of `start` quarter, end of `end` quarter], as a percentage.
///
/// 0 when either endpoint is missing, 0 before the window, 100 after it,
/// linear in elapsed days otherwise, rounded to the nearest integer.
pub fn expected_progress(start: Option<Quarter>, end: Option<Quarter>, today: NaiveDate) -> u8 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };

    let start_date = start.first_day();
    let end_date = end.last_day();

    if today < start_date {
        return 0;
    }
    if today >= end_date {
        return 100;
    }

    let total = (end_date - start_date).num_days();
    if total <= 0 {
        return 100;
    }
    let elapsed = (today - start_date).num_days();
    let pct = (elapsed as f64 / total as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

/// Unweighted mean of sub-item progress, rounded to the nearest integer.
/// None for an empty slice (leaf activities keep their stored progress).
pub fn mean_progress(sub_items: &[SubItem]) -> Option<u8> {
    if sub_items.is_empty() {
        return None;
    }
    let sum: u32 = sub_items.iter().map(|s| s.progress as u32).sum();
    Some((sum as f64 / sub_items.len() as f64).round() as u8)
}

/// The progress the board reports for an activity under the aggregate
/// policy: derived mean when sub-items exist, stored value otherwise.
pub fn effective_progress(activity: &Activity) -> u8 {
    mean_progress(&activity.sub_items).unwrap_or(activity.progress)
}

/// Whether reported progress lags the schedule's expectation.
pub fn behind_schedule(actual: u8, expected: u8) -> bool {
    actual < expected
}

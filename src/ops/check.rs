use std::collections::HashSet;

use serde::Serialize;

use crate::model::board::Board;
use crate::ops::schedule::mean_progress;

/// Structured result from `sd check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Two activities share an id — lookups are ambiguous
    #[serde(rename = "duplicate_activity_id")]
    DuplicateActivityId { activity_id: String },
    /// Two sub-items under one parent share a name — the mutation key is ambiguous
    #[serde(rename = "duplicate_sub_item")]
    DuplicateSubItem { activity_id: String, name: String },
    /// Progress outside 0-100 (hand-edited board data)
    #[serde(rename = "progress_out_of_range")]
    ProgressOutOfRange {
        activity_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sub_item: Option<String>,
        progress: u8,
    },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Stored aggregate disagrees with the sub-item mean
    #[serde(rename = "stale_aggregate")]
    StaleAggregate {
        activity_id: String,
        stored: u8,
        derived: u8,
    },
    /// Activity has no target quarter
    #[serde(rename = "missing_target")]
    MissingTarget { activity_id: String },
}

/// Validate a board and return structured results.
///
/// Read-only: the board is never modified. The mutation layer prevents all
/// of these states; they can only arise from hand-edited or foreign JSON.
pub fn check_board(board: &Board) -> CheckResult {
    let mut result = CheckResult::default();

    let mut seen_ids = HashSet::new();
    for a in &board.activities {
        if !seen_ids.insert(a.id.as_str()) {
            result.errors.push(CheckError::DuplicateActivityId {
                activity_id: a.id.clone(),
            });
        }

        let mut seen_subs = HashSet::new();
        for s in &a.sub_items {
            if !seen_subs.insert(s.name.as_str()) {
                result.errors.push(CheckError::DuplicateSubItem {
                    activity_id: a.id.clone(),
                    name: s.name.clone(),
                });
            }
            if s.progress > 100 {
                result.errors.push(CheckError::ProgressOutOfRange {
                    activity_id: a.id.clone(),
                    sub_item: Some(s.name.clone()),
                    progress: s.progress,
                });
            }
        }

        if a.progress > 100 {
            result.errors.push(CheckError::ProgressOutOfRange {
                activity_id: a.id.clone(),
                sub_item: None,
                progress: a.progress,
            });
        }

        if let Some(derived) = mean_progress(&a.sub_items)
            && derived != a.progress
            && a.progress <= 100
        {
            result.warnings.push(CheckWarning::StaleAggregate {
                activity_id: a.id.clone(),
                stored: a.progress,
                derived,
            });
        }

        if a.target.is_none() {
            result.warnings.push(CheckWarning::MissingTarget {
                activity_id: a.id.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

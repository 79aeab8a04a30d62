use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::activity::{Issue, Note};
use crate::model::board::Board;
use crate::model::quarter::Quarter;
use crate::model::report::SavedReport;
use crate::ops::schedule;

// ---------------------------------------------------------------------------
// Saved reports (snapshots)
// ---------------------------------------------------------------------------

/// Snapshot the board into a named saved report. The copy is deep: later
/// board mutations never reach into a report saved earlier.
pub fn save_report(board: &Board, name: String) -> SavedReport {
    SavedReport {
        id: Uuid::new_v4(),
        name,
        date: Utc::now(),
        activities: board.activities.clone(),
    }
}

pub fn find_report<'a>(reports: &'a [SavedReport], id: Uuid) -> Option<&'a SavedReport> {
    reports.iter().find(|r| r.id == id)
}

/// Swap a saved snapshot in as the live tree.
pub fn load_report(board: &mut Board, report: &SavedReport) {
    board.replace(report.activities.clone());
}

// ---------------------------------------------------------------------------
// Exported report (derived, read-only)
// ---------------------------------------------------------------------------

/// The exported JSON report: a derived view with delay and schedule
/// signals baked in. Not round-trippable back into a board.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub generated: DateTime<Utc>,
    pub activities: Vec<ReportActivity>,
}

#[derive(Debug, Serialize)]
pub struct ReportActivity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Quarter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    pub status: String,
    pub progress: u8,
    pub expected_progress: u8,
    pub delayed: bool,
    pub behind: bool,
    pub sub_items: Vec<ReportSubItem>,
    pub notes: Vec<Note>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Serialize)]
pub struct ReportSubItem {
    pub name: String,
    pub progress: u8,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    pub delayed: bool,
}

/// Build the exported report for the board as of `today`.
pub fn build_report(board: &Board, today: NaiveDate) -> ReportDocument {
    let activities = board
        .activities
        .iter()
        .map(|a| {
            let progress = schedule::effective_progress(a);
            let expected = schedule::expected_progress(a.start, a.target, today);
            ReportActivity {
                name: a.name.clone(),
                start: a.start,
                target: a.target,
                status: a.status.label().to_string(),
                progress,
                expected_progress: expected,
                delayed: schedule::activity_delayed(a),
                behind: schedule::behind_schedule(progress, expected),
                sub_items: a
                    .sub_items
                    .iter()
                    .map(|s| ReportSubItem {
                        name: s.name.clone(),
                        progress: s.progress,
                        completed: s.completed,
                        target: s.target,
                        delayed: schedule::is_delayed(s.target, a.target),
                    })
                    .collect(),
                notes: a.notes.clone(),
                issues: a.issues.clone(),
            }
        })
        .collect();

    ReportDocument {
        generated: Utc::now(),
        activities,
    }
}

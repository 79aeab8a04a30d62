use chrono::NaiveDate;
use serde::Serialize;

use crate::model::activity::{Activity, Attachment, Issue, Note, SubItem};
use crate::model::quarter::Quarter;
use crate::model::report::SavedReport;
use crate::ops::schedule;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// One row of `sd list`: stored fields plus the derived schedule signals.
#[derive(Serialize)]
pub struct ActivityRowJson {
    pub id: String,
    pub name: String,
    pub status: String,
    pub progress: u8,
    pub expected_progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Quarter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    pub delayed: bool,
    pub behind: bool,
    pub sub_items: usize,
    pub open_issues: usize,
}

/// Full detail for `sd show`
#[derive(Serialize)]
pub struct ActivityDetailJson {
    #[serde(flatten)]
    pub row: ActivityRowJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subs: Vec<SubItemJson>,
    pub notes: Vec<Note>,
    pub issues: Vec<Issue>,
    pub attachments: Vec<Attachment>,
}

#[derive(Serialize)]
pub struct SubItemJson {
    pub name: String,
    pub progress: u8,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    pub delayed: bool,
}

#[derive(Serialize)]
pub struct ReportEntryJson {
    pub id: String,
    pub name: String,
    pub date: String,
    pub activities: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn activity_to_row(activity: &Activity, today: NaiveDate) -> ActivityRowJson {
    let progress = schedule::effective_progress(activity);
    let expected = schedule::expected_progress(activity.start, activity.target, today);
    ActivityRowJson {
        id: activity.id.clone(),
        name: activity.name.clone(),
        status: activity.status.label().to_string(),
        progress,
        expected_progress: expected,
        start: activity.start,
        target: activity.target,
        delayed: schedule::activity_delayed(activity),
        behind: schedule::behind_schedule(progress, expected),
        sub_items: activity.sub_items.len(),
        open_issues: activity
            .issues
            .iter()
            .filter(|i| i.status != crate::model::activity::IssueStatus::Resolved)
            .count(),
    }
}

pub fn activity_to_detail(activity: &Activity, today: NaiveDate) -> ActivityDetailJson {
    ActivityDetailJson {
        row: activity_to_row(activity, today),
        description: activity.description.clone(),
        subs: activity
            .sub_items
            .iter()
            .map(|s| sub_item_to_json(s, activity.target))
            .collect(),
        notes: activity.notes.clone(),
        issues: activity.issues.clone(),
        attachments: activity.attachments.clone(),
    }
}

pub fn sub_item_to_json(sub: &SubItem, parent_target: Option<Quarter>) -> SubItemJson {
    SubItemJson {
        name: sub.name.clone(),
        progress: sub.progress,
        completed: sub.completed,
        target: sub.target,
        delayed: schedule::is_delayed(sub.target, parent_target),
    }
}

pub fn report_to_entry(report: &SavedReport) -> ReportEntryJson {
    ReportEntryJson {
        id: report.id.to_string(),
        name: report.name.clone(),
        date: report.date.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        activities: report.activities.len(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable helpers
// ---------------------------------------------------------------------------

/// Format an optional quarter for display: the label, or "-" when unset.
pub fn quarter_label(q: Option<Quarter>) -> String {
    q.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One-line flag summary for a list row, e.g. " [delayed] [behind]"
pub fn row_flags(row: &ActivityRowJson) -> String {
    let mut flags = String::new();
    if row.delayed {
        flags.push_str(" [delayed]");
    }
    if row.behind {
        flags.push_str(" [behind]");
    }
    flags
}

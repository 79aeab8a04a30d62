use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quarter::Quarter;

/// Tracked status of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "Completed")]
    Completed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::OnTrack => "On Track",
            Status::AtRisk => "At Risk",
            Status::NotStarted => "Not Started",
            Status::Completed => "Completed",
        }
    }

    /// Parse a CLI spelling (case-insensitive, hyphen or space separated)
    pub fn parse_label(s: &str) -> Option<Status> {
        match s.to_ascii_lowercase().replace('-', " ").as_str() {
            "on track" | "ontrack" => Some(Status::OnTrack),
            "at risk" | "atrisk" => Some(Status::AtRisk),
            "not started" | "notstarted" => Some(Status::NotStarted),
            "completed" | "done" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse_label(s: &str) -> Option<Severity> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

/// Issue workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }

    pub fn parse_label(s: &str) -> Option<IssueStatus> {
        match s.to_ascii_lowercase().replace('-', " ").as_str() {
            "open" => Some(IssueStatus::Open),
            "in progress" | "inprogress" => Some(IssueStatus::InProgress),
            "resolved" => Some(IssueStatus::Resolved),
            _ => None,
        }
    }
}

/// A free-text note on an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Set true on first edit, never cleared
    #[serde(default)]
    pub edited: bool,
}

/// A reported issue on an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IssueStatus,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Present in the data model; no operation populates these
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A comment on an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// A file attached to an activity. The url is an opaque reference produced
/// by the intake collaborator (see io::attach) — the tree never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

/// A decomposition unit under an activity. `name` is unique within the
/// parent and doubles as the mutation key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubItem {
    pub name: String,
    /// 0–100
    pub progress: u8,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl SubItem {
    /// Create a new sub-item with progress 0, not completed
    pub fn new(name: String, target: Option<Quarter>) -> Self {
        SubItem {
            name,
            progress: 0,
            completed: false,
            target,
            attachments: Vec::new(),
        }
    }
}

/// A top-level work stream with its full decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Slug derived from the name, unique within the board
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start of the scheduled window (expected-progress baseline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Quarter>,
    /// Target completion quarter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Quarter>,
    pub status: Status,
    /// Stored progress for leaf activities; derived (mean of sub-items)
    /// otherwise — see ops::schedule for the policy
    pub progress: u8,
    #[serde(default)]
    pub sub_items: Vec<SubItem>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Activity {
    /// Create a new activity: Not Started, progress 0, everything empty.
    pub fn new(id: String, name: String, description: Option<String>, target: Option<Quarter>) -> Self {
        Activity {
            id,
            name,
            description,
            start: None,
            target,
            status: Status::NotStarted,
            progress: 0,
            sub_items: Vec::new(),
            notes: Vec::new(),
            issues: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn sub_item(&self, name: &str) -> Option<&SubItem> {
        self.sub_items.iter().find(|s| s.name == name)
    }

    pub fn sub_item_mut(&mut self, name: &str) -> Option<&mut SubItem> {
        self.sub_items.iter_mut().find(|s| s.name == name)
    }
}

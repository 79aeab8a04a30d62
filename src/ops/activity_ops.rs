use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::model::activity::{
    Activity, Attachment, Issue, IssueStatus, Note, Severity, Status, SubItem,
};
use crate::model::board::Board;
use crate::model::quarter::Quarter;
use crate::ops::schedule::mean_progress;

/// Error type for board mutations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("activity not found: {0}")]
    ActivityNotFound(String),
    #[error("sub-item not found: {name} (activity {activity})")]
    SubItemNotFound { activity: String, name: String },
    #[error("note not found: {0}")]
    NoteNotFound(Uuid),
    #[error("issue not found: {0}")]
    IssueNotFound(Uuid),
    #[error("attachment not found: {0}")]
    AttachmentNotFound(Uuid),
    #[error("an activity named \"{0}\" already exists")]
    DuplicateActivity(String),
    #[error("sub-item \"{name}\" already exists under activity {activity}")]
    DuplicateSubItem { activity: String, name: String },
    #[error("progress must be 0-100, got {0}")]
    InvalidProgress(u8),
    #[error("activity {0} has sub-items; its progress is derived from them")]
    ProgressIsDerived(String),
    #[error("name cannot be empty")]
    EmptyName,
}

// ---------------------------------------------------------------------------
// Activity CRUD
// ---------------------------------------------------------------------------

/// Add a new activity. The id is a slug derived from the name.
/// Returns the assigned id.
pub fn add_activity(
    board: &mut Board,
    name: &str,
    description: Option<String>,
    target: Option<Quarter>,
) -> Result<String, BoardError> {
    let id = slugify(name);
    if id.is_empty() {
        return Err(BoardError::EmptyName);
    }
    if board.activity(&id).is_some() {
        return Err(BoardError::DuplicateActivity(id));
    }
    board
        .activities
        .push(Activity::new(id.clone(), name.trim().to_string(), description, target));
    Ok(id)
}

/// Set an activity's target quarter. Never cascades to sub-items.
pub fn set_target(board: &mut Board, id: &str, target: Option<Quarter>) -> Result<(), BoardError> {
    activity_mut(board, id)?.target = target;
    Ok(())
}

/// Set an activity's start quarter (expected-progress baseline).
pub fn set_start(board: &mut Board, id: &str, start: Option<Quarter>) -> Result<(), BoardError> {
    activity_mut(board, id)?.start = start;
    Ok(())
}

pub fn set_status(board: &mut Board, id: &str, status: Status) -> Result<(), BoardError> {
    activity_mut(board, id)?.status = status;
    Ok(())
}

/// Set stored progress on a leaf activity. Activities with sub-items carry
/// derived progress and reject the mutation.
pub fn set_progress(board: &mut Board, id: &str, progress: u8) -> Result<(), BoardError> {
    check_progress(progress)?;
    let activity = activity_mut(board, id)?;
    if !activity.sub_items.is_empty() {
        return Err(BoardError::ProgressIsDerived(id.to_string()));
    }
    activity.progress = progress;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sub-items
// ---------------------------------------------------------------------------

/// Add a sub-item with progress 0, not completed. The parent's aggregate
/// progress is recomputed, since its sub-item set changed.
pub fn add_sub_item(
    board: &mut Board,
    id: &str,
    name: &str,
    target: Option<Quarter>,
) -> Result<(), BoardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BoardError::EmptyName);
    }
    let activity = activity_mut(board, id)?;
    if activity.sub_item(name).is_some() {
        return Err(BoardError::DuplicateSubItem {
            activity: id.to_string(),
            name: name.to_string(),
        });
    }
    activity.sub_items.push(SubItem::new(name.to_string(), target));
    recompute_aggregate(activity);
    Ok(())
}

/// Set a sub-item's progress and recompute the parent's aggregate.
pub fn set_sub_progress(
    board: &mut Board,
    id: &str,
    name: &str,
    progress: u8,
) -> Result<(), BoardError> {
    check_progress(progress)?;
    let activity = activity_mut(board, id)?;
    let sub = sub_item_mut(activity, id, name)?;
    sub.progress = progress;
    recompute_aggregate(activity);
    Ok(())
}

/// Set a sub-item's target quarter. Never touches the parent's target.
pub fn set_sub_target(
    board: &mut Board,
    id: &str,
    name: &str,
    target: Option<Quarter>,
) -> Result<(), BoardError> {
    let activity = activity_mut(board, id)?;
    sub_item_mut(activity, id, name)?.target = target;
    Ok(())
}

/// Flip a sub-item's completed flag. Progress is left alone — the two
/// fields are independently mutable and may disagree.
/// Returns the new value.
pub fn toggle_sub_completed(board: &mut Board, id: &str, name: &str) -> Result<bool, BoardError> {
    let activity = activity_mut(board, id)?;
    let sub = sub_item_mut(activity, id, name)?;
    sub.completed = !sub.completed;
    Ok(sub.completed)
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Append a note stamped with the configured author and the current time.
/// Returns the generated note id.
pub fn add_note(board: &mut Board, id: &str, content: String, author: &str) -> Result<Uuid, BoardError> {
    let activity = activity_mut(board, id)?;
    let note_id = Uuid::new_v4();
    activity.notes.push(Note {
        id: note_id,
        content,
        author: author.to_string(),
        timestamp: Utc::now(),
        edited: false,
    });
    Ok(note_id)
}

/// Replace a note's content in place and set its edited flag.
pub fn edit_note(board: &mut Board, id: &str, note_id: Uuid, content: String) -> Result<(), BoardError> {
    let activity = activity_mut(board, id)?;
    let note = activity
        .notes
        .iter_mut()
        .find(|n| n.id == note_id)
        .ok_or(BoardError::NoteNotFound(note_id))?;
    note.content = content;
    note.edited = true;
    Ok(())
}

pub fn delete_note(board: &mut Board, id: &str, note_id: Uuid) -> Result<(), BoardError> {
    let activity = activity_mut(board, id)?;
    let before = activity.notes.len();
    activity.notes.retain(|n| n.id != note_id);
    if activity.notes.len() == before {
        return Err(BoardError::NoteNotFound(note_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// Report an issue: status defaults to Open, comments start empty.
/// Returns the generated issue id.
pub fn add_issue(
    board: &mut Board,
    id: &str,
    title: String,
    description: String,
    severity: Severity,
    author: &str,
) -> Result<Uuid, BoardError> {
    let activity = activity_mut(board, id)?;
    let issue_id = Uuid::new_v4();
    activity.issues.push(Issue {
        id: issue_id,
        title,
        description,
        severity,
        status: IssueStatus::Open,
        author: author.to_string(),
        timestamp: Utc::now(),
        comments: Vec::new(),
    });
    Ok(issue_id)
}

/// Edit an issue's title, description, and severity. Status and authorship
/// are untouched.
pub fn edit_issue(
    board: &mut Board,
    id: &str,
    issue_id: Uuid,
    title: String,
    description: String,
    severity: Severity,
) -> Result<(), BoardError> {
    let issue = issue_mut(board, id, issue_id)?;
    issue.title = title;
    issue.description = description;
    issue.severity = severity;
    Ok(())
}

pub fn set_issue_status(
    board: &mut Board,
    id: &str,
    issue_id: Uuid,
    status: IssueStatus,
) -> Result<(), BoardError> {
    issue_mut(board, id, issue_id)?.status = status;
    Ok(())
}

pub fn delete_issue(board: &mut Board, id: &str, issue_id: Uuid) -> Result<(), BoardError> {
    let activity = activity_mut(board, id)?;
    let before = activity.issues.len();
    activity.issues.retain(|i| i.id != issue_id);
    if activity.issues.len() == before {
        return Err(BoardError::IssueNotFound(issue_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// Attach a file by display name and opaque url (see io::attach for how the
/// url is produced). Returns the generated attachment id.
pub fn add_attachment(
    board: &mut Board,
    id: &str,
    name: String,
    url: String,
) -> Result<Uuid, BoardError> {
    let activity = activity_mut(board, id)?;
    let attachment_id = Uuid::new_v4();
    activity.attachments.push(Attachment {
        id: attachment_id,
        name,
        url,
    });
    Ok(attachment_id)
}

pub fn delete_attachment(board: &mut Board, id: &str, attachment_id: Uuid) -> Result<(), BoardError> {
    let activity = activity_mut(board, id)?;
    let before = activity.attachments.len();
    activity.attachments.retain(|a| a.id != attachment_id);
    if activity.attachments.len() == before {
        return Err(BoardError::AttachmentNotFound(attachment_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive a board-unique slug from an activity name: lowercase, runs of
/// anything non-alphanumeric collapse to a single hyphen.
pub fn slugify(name: &str) -> String {
    let sep = Regex::new("[^a-z0-9]+").expect("valid literal pattern");
    sep.replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

fn check_progress(progress: u8) -> Result<(), BoardError> {
    if progress > 100 {
        return Err(BoardError::InvalidProgress(progress));
    }
    Ok(())
}

fn activity_mut<'a>(board: &'a mut Board, id: &str) -> Result<&'a mut Activity, BoardError> {
    board
        .activity_mut(id)
        .ok_or_else(|| BoardError::ActivityNotFound(id.to_string()))
}

fn sub_item_mut<'a>(
    activity: &'a mut Activity,
    id: &str,
    name: &str,
) -> Result<&'a mut SubItem, BoardError> {
    activity
        .sub_items
        .iter_mut()
        .find(|s| s.name == name)
        .ok_or_else(|| BoardError::SubItemNotFound {
            activity: id.to_string(),
            name: name.to_string(),
        })
}

fn issue_mut<'a>(board: &'a mut Board, id: &str, issue_id: Uuid) -> Result<&'a mut Issue, BoardError> {
    let activity = activity_mut(board, id)?;
    activity
        .issues
        .iter_mut()
        .find(|i| i.id == issue_id)
        .ok_or(BoardError::IssueNotFound(issue_id))
}

/// Re-derive a parent's aggregate progress from its sub-items.
fn recompute_aggregate(activity: &mut Activity) {
    if let Some(mean) = mean_progress(&activity.sub_items) {
        activity.progress = mean;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

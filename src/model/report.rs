use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::Activity;

/// A named, timestamped deep snapshot of the activity collection.
///
/// Immutable once saved: mutating the live board never changes a report
/// that was saved earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedReport {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub activities: Vec<Activity>,
}

use serde::Serialize;

use crate::model::activity::Status;
use crate::model::board::Board;
use crate::ops::schedule::effective_progress;

/// Board-level rollup for `sd stats`.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub on_track: usize,
    pub at_risk: usize,
    pub not_started: usize,
    pub completed: usize,
    /// Mean of per-activity effective progress, rounded. 0 for an empty board.
    pub overall_progress: u8,
}

pub fn board_stats(board: &Board) -> BoardStats {
    let mut stats = BoardStats::default();
    for a in &board.activities {
        match a.status {
            Status::OnTrack => stats.on_track += 1,
            Status::AtRisk => stats.at_risk += 1,
            Status::NotStarted => stats.not_started += 1,
            Status::Completed => stats.completed += 1,
        }
    }
    if !board.activities.is_empty() {
        let sum: u32 = board
            .activities
            .iter()
            .map(|a| effective_progress(a) as u32)
            .sum();
        stats.overall_progress = (sum as f64 / board.activities.len() as f64).round() as u8;
    }
    stats
}

use serde::{Deserialize, Serialize};

use super::activity::{Activity, Status, SubItem};
use super::quarter::Quarter;

/// The canonical in-memory activity collection.
///
/// Mutations go through ops::activity_ops; the board itself only offers
/// lookup and wholesale replacement (the load operation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub activities: Vec<Activity>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn activity_mut(&mut self, id: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == id)
    }

    /// Atomically swap in a new activity collection (load operation).
    pub fn replace(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    /// A small populated board for `sd init --sample`.
    pub fn sample() -> Board {
        let mut platform = Activity::new(
            "platform-migration".into(),
            "Platform Migration".into(),
            Some("Move services onto the new runtime".into()),
            Quarter::new(4, 2025),
        );
        platform.start = Quarter::new(1, 2025);
        platform.status = Status::OnTrack;
        platform.sub_items = vec![
            SubItem {
                name: "Inventory current services".into(),
                progress: 60,
                completed: false,
                target: Quarter::new(2, 2025),
                attachments: Vec::new(),
            },
            SubItem {
                name: "Pilot migration".into(),
                progress: 20,
                completed: false,
                target: Quarter::new(3, 2025),
                attachments: Vec::new(),
            },
        ];
        platform.progress = 40;

        let mut telemetry = Activity::new(
            "telemetry-rollout".into(),
            "Telemetry Rollout".into(),
            Some("Instrument the fleet and stand up dashboards".into()),
            Quarter::new(4, 2025),
        );
        telemetry.start = Quarter::new(2, 2025);
        telemetry.status = Status::AtRisk;
        telemetry.sub_items = vec![
            SubItem {
                name: "Agent deployment".into(),
                progress: 35,
                completed: false,
                target: Quarter::new(3, 2025),
                attachments: Vec::new(),
            },
            SubItem {
                name: "Dashboard build-out".into(),
                progress: 25,
                completed: false,
                target: Quarter::new(4, 2025),
                attachments: Vec::new(),
            },
        ];
        telemetry.progress = 30;

        let training = Activity::new(
            "operator-training".into(),
            "Operator Training".into(),
            Some("Train the on-call rotation on the new tooling".into()),
            Quarter::new(3, 2025),
        );

        Board {
            activities: vec![platform, telemetry, training],
        }
    }
}

//! # Possession Change Scanner
//!
//! Holder-change detection shared by every classifier.
//!
//! ## Algorithm
//! 1. Keep the last known holder and the frame it was last seen
//! 2. Frames with no holder leave that state untouched
//! 3. A frame whose holder differs from the last known holder is a change
//! 4. The first possession in the timeline is never a change

use crate::timeline::PossessionTimeline;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// One transfer of the ball between two different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionChange {
    /// Frame the new holder is first seen
    pub frame: usize,
    /// Previous holder
    pub from: EntityId,
    /// Last frame the previous holder held the ball
    pub from_frame: usize,
    /// New holder
    pub to: EntityId,
}

impl PossessionChange {
    /// Number of empty frames between the two holders.
    pub fn gap_frames(&self) -> usize {
        self.frame.saturating_sub(self.from_frame + 1)
    }
}

/// Iterator over possession changes in frame order.
pub struct PossessionChanges<'a> {
    frames: std::iter::Enumerate<std::slice::Iter<'a, Option<EntityId>>>,
    prev: Option<(EntityId, usize)>,
}

impl<'a> Iterator for PossessionChanges<'a> {
    type Item = PossessionChange;

    fn next(&mut self) -> Option<Self::Item> {
        for (frame, holder) in self.frames.by_ref() {
            let Some(current) = *holder else {
                continue;
            };
            let prev = self.prev.replace((current, frame));
            if let Some((from, from_frame)) = prev {
                if from != current {
                    return Some(PossessionChange {
                        frame,
                        from,
                        from_frame,
                        to: current,
                    });
                }
            }
        }
        None
    }
}

/// Scan `timeline` for possession changes.
pub fn possession_changes(timeline: &PossessionTimeline) -> PossessionChanges<'_> {
    PossessionChanges {
        frames: timeline.as_slice().iter().enumerate(),
        prev: None,
    }
}

//! # Pass & Interception Classifier
//!
//! Labels every possession change as a pass (same team), an interception
//! (different or unknown team) or, when a gap limit is configured, a neutral
//! loose-ball recovery.
//!
//! ## Rules
//! - Teams are looked up per frame: the passer at the frame it last held the
//!   ball, the receiver at the frame of the change
//! - Only two equal, assigned teams make a pass; an unknown team on either
//!   side can never certify one
//! - An interception is attributed to the receiving team; with no receiving
//!   team the change stays in the event log but fills no frame slot, and it
//!   is neither counted as an interception nor charged to the passer

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::events::possession_change::{possession_changes, PossessionChange};
use crate::timeline::{check_len, PossessionTimeline, TeamAssignment};
use crate::types::{EntityId, Team};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classification of one possession change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Pass,
    Interception,
    /// Change across a longer gap than `max_transfer_gap_frames`
    LooseBallRecovery,
}

/// A possession change with its teams and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    pub change: PossessionChange,
    pub kind: ChangeKind,
    #[serde(with = "crate::types::team_label")]
    pub from_team: Option<Team>,
    #[serde(with = "crate::types::team_label")]
    pub to_team: Option<Team>,
}

impl ClassifiedChange {
    #[inline]
    pub fn frame(&self) -> usize {
        self.change.frame
    }

    #[inline]
    pub fn passer(&self) -> EntityId {
        self.change.from
    }

    #[inline]
    pub fn receiver(&self) -> EntityId {
        self.change.to
    }

    /// An interception that fills its frame slot.
    #[inline]
    pub fn is_attributed_interception(&self) -> bool {
        self.kind == ChangeKind::Interception && self.to_team.is_some()
    }
}

/// Counts of changes that could not be fully attributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierDiagnostics {
    /// Total possession changes seen
    pub possession_changes: u32,
    /// Changes where either side had no team label
    pub unassigned_team_changes: u32,
    /// Interceptions whose receiving team is unknown
    pub unattributed_interceptions: u32,
    /// Changes turned into loose-ball recoveries by the gap limit
    pub loose_ball_recoveries: u32,
}

/// Frame-indexed pass and interception slots plus the event log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassClassification {
    /// Passing team at frames where a pass completed
    pub passes: Vec<Option<Team>>,
    /// Intercepting team at frames where possession was won
    pub interceptions: Vec<Option<Team>>,
    /// Every classified change, in frame order
    pub events: Vec<ClassifiedChange>,
    pub diagnostics: ClassifierDiagnostics,
}

impl PassClassification {
    pub fn pass_count(&self) -> usize {
        self.events.iter().filter(|e| e.kind == ChangeKind::Pass).count()
    }

    /// Interceptions with a receiving team, i.e. the filled slots of
    /// `interceptions`.
    pub fn interception_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_attributed_interception()).count()
    }

    pub fn passes_by_team(&self, team: Team) -> usize {
        self.passes.iter().filter(|p| **p == Some(team)).count()
    }

    pub fn interceptions_by_team(&self, team: Team) -> usize {
        self.interceptions.iter().filter(|i| **i == Some(team)).count()
    }
}

/// Classify a single change.
pub fn classify_change(
    change: PossessionChange,
    assignment: &TeamAssignment,
    config: &ClassifierConfig,
) -> ClassifiedChange {
    let from_team = assignment.team_of(change.from_frame, change.from);
    let to_team = assignment.team_of(change.frame, change.to);

    let over_gap = config
        .max_transfer_gap_frames
        .is_some_and(|limit| change.gap_frames() > limit);

    let kind = if over_gap {
        ChangeKind::LooseBallRecovery
    } else {
        match (from_team, to_team) {
            (Some(a), Some(b)) if a == b => ChangeKind::Pass,
            _ => ChangeKind::Interception,
        }
    };

    ClassifiedChange {
        change,
        kind,
        from_team,
        to_team,
    }
}

/// Classify every possession change in the timeline.
pub fn classify(
    timeline: &PossessionTimeline,
    assignment: &TeamAssignment,
    config: &ClassifierConfig,
) -> Result<PassClassification> {
    check_len("team_assignment", timeline.len(), assignment.len())?;

    let mut out = PassClassification {
        passes: vec![None; timeline.len()],
        interceptions: vec![None; timeline.len()],
        ..Default::default()
    };

    for change in possession_changes(timeline) {
        let classified = classify_change(change, assignment, config);
        let diag = &mut out.diagnostics;
        diag.possession_changes += 1;
        if classified.from_team.is_none() || classified.to_team.is_none() {
            diag.unassigned_team_changes += 1;
        }

        match classified.kind {
            ChangeKind::Pass => {
                out.passes[change.frame] = classified.from_team;
            }
            ChangeKind::Interception => {
                if classified.to_team.is_none() {
                    diag.unattributed_interceptions += 1;
                }
                out.interceptions[change.frame] = classified.to_team;
            }
            ChangeKind::LooseBallRecovery => {
                diag.loose_ball_recoveries += 1;
            }
        }
        out.events.push(classified);
    }

    debug!(
        changes = out.diagnostics.possession_changes,
        passes = out.pass_count(),
        interceptions = out.interception_count(),
        unassigned = out.diagnostics.unassigned_team_changes,
        "classified possession changes"
    );

    Ok(out)
}

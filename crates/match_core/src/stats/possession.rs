//! # Possession & Pass Accuracy
//!
//! Pure folds over the possession timeline and the classified event log.

use crate::events::pass_classifier::{ChangeKind, PassClassification};
use crate::timeline::{PossessionTimeline, TeamAssignment};
use crate::types::{EntityId, Team, TeamCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ball possession totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PossessionStats {
    pub total_frames: u32,
    /// Frames with any holder
    pub possession_frames: u32,
    /// `possession_frames / total_frames * 100`, 0 for an empty timeline
    pub possession_percentage: f32,
    /// Frames held per team (team looked up at each frame)
    pub team_possession: TeamCounts<u32>,
    /// Frames held per player
    pub player_possession: BTreeMap<EntityId, u32>,
    /// Frames whose holder had no team label
    pub unassigned_possession_frames: u32,
}

impl PossessionStats {
    /// Team share of possession among frames with an assigned holder.
    pub fn team_share(&self, team: Team) -> f32 {
        percentage(self.team_possession.get(team), self.team_possession.total())
    }

    /// Players with most frames on the ball, ties by ascending id.
    pub fn top_players(&self, n: usize) -> Vec<(EntityId, u32)> {
        let mut players: Vec<(EntityId, u32)> =
            self.player_possession.iter().map(|(&id, &f)| (id, f)).collect();
        players.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        players.truncate(n);
        players
    }
}

/// Outgoing possession changes of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassAccuracy {
    pub successful: u32,
    pub failed: u32,
    /// `successful / (successful + failed) * 100`, 0 with no attempts
    pub accuracy: f32,
}

impl PassAccuracy {
    pub fn attempts(&self) -> u32 {
        self.successful + self.failed
    }
}

/// Team in control of the ball, frame by frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamBallControl {
    pub per_frame: Vec<Option<Team>>,
    pub frames: TeamCounts<u32>,
    pub home_percentage: f32,
    pub away_percentage: f32,
}

pub(crate) fn percentage(part: u32, whole: u32) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32 * 100.0
    }
}

/// Count possession frames per team and player.
pub fn possession_stats(timeline: &PossessionTimeline, assignment: &TeamAssignment) -> PossessionStats {
    let mut stats = PossessionStats {
        total_frames: timeline.len() as u32,
        ..Default::default()
    };

    for (frame, holder) in timeline.iter().enumerate() {
        let Some(id) = holder else {
            continue;
        };
        stats.possession_frames += 1;
        *stats.player_possession.entry(id).or_insert(0) += 1;
        match assignment.team_of(frame, id) {
            Some(team) => *stats.team_possession.get_mut(team) += 1,
            None => stats.unassigned_possession_frames += 1,
        }
    }

    stats.possession_percentage = percentage(stats.possession_frames, stats.total_frames);
    stats
}

/// Pass accuracy for every player who originated a pass or interception.
///
/// Failures are the filled interception slots. Interceptions with no
/// receiving team and loose-ball recoveries are neither attempts nor
/// failures.
pub fn pass_accuracy(classification: &PassClassification) -> BTreeMap<EntityId, PassAccuracy> {
    let mut out: BTreeMap<EntityId, PassAccuracy> = BTreeMap::new();

    for event in &classification.events {
        if event.kind == ChangeKind::Pass {
            out.entry(event.passer()).or_default().successful += 1;
        } else if event.is_attributed_interception() {
            out.entry(event.passer()).or_default().failed += 1;
        }
    }

    for stats in out.values_mut() {
        stats.accuracy = percentage(stats.successful, stats.attempts());
    }
    out
}

/// Team in control per frame, carried forward through frames without a
/// known holder team. Frames before the first known team stay `None` and do
/// not count towards either percentage.
pub fn team_ball_control(timeline: &PossessionTimeline, assignment: &TeamAssignment) -> TeamBallControl {
    let per_frame: Vec<Option<Team>> = timeline
        .iter()
        .enumerate()
        .scan(None, |last, (frame, holder)| {
            if let Some(team) = holder.and_then(|id| assignment.team_of(frame, id)) {
                *last = Some(team);
            }
            Some(*last)
        })
        .collect();

    let mut frames = TeamCounts::<u32>::default();
    for team in per_frame.iter().flatten() {
        *frames.get_mut(*team) += 1;
    }

    TeamBallControl {
        home_percentage: percentage(frames.home, frames.total()),
        away_percentage: percentage(frames.away, frames.total()),
        per_frame,
        frames,
    }
}

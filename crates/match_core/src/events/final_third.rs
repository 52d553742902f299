//! # Final Third Entry Classifier
//!
//! Finds completed passes that move the ball from outside a team's attacking
//! third into it.
//!
//! ## Algorithm
//! 1. Re-scan possession changes, keeping only frames already classified as
//!    passes
//! 2. Resolve the ball's pitch position at the passer's last frame and at the
//!    receiving frame
//! 3. Entry = start outside the final third AND end inside it
//!
//! Passes without resolvable ball geometry are skipped and counted; missing
//! geometry is not evidence either way.

use crate::config::{AttackingDirection, AttackingDirections, PitchConfig};
use crate::error::Result;
use crate::events::possession_change::possession_changes;
use crate::geometry::{in_final_third, resolve_position, ViewTransform};
use crate::timeline::{check_len, PossessionTimeline, TeamAssignment};
use crate::types::{BallRecord, EntityId, PitchPoint, Team, TeamCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A pass that entered the final third.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalThirdPass {
    pub frame: usize,
    pub passer_id: EntityId,
    pub receiver_id: EntityId,
    pub team: Team,
    pub start_frame: usize,
    pub end_frame: usize,
    pub start_pos: PitchPoint,
    pub end_pos: PitchPoint,
}

/// Frame-indexed final third entries and their details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalThirdClassification {
    /// Passing team at frames where the ball entered its final third
    pub final_third_passes: Vec<Option<Team>>,
    /// One record per entry, in frame order
    pub details: Vec<FinalThirdPass>,
    /// Passes whose geometry was evaluated
    pub evaluated_passes: u32,
    /// Passes skipped for lack of a ball position at either end
    pub skipped_missing_position: u32,
    /// Pass slots the team assignment does not back up as same-team
    pub skipped_inconsistent_team: u32,
}

/// Per-player final third entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFinalThird {
    pub count: u32,
    pub team: Team,
}

/// Aggregated final third statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalThirdStats {
    pub total: u32,
    pub by_team: TeamCounts<u32>,
    pub by_player: BTreeMap<EntityId, PlayerFinalThird>,
}

/// Final third classifier for one pitch and one pair of attacking directions.
#[derive(Debug, Clone, Default)]
pub struct FinalThirdDetector {
    pitch: PitchConfig,
    directions: AttackingDirections,
}

impl FinalThirdDetector {
    pub fn new(pitch: PitchConfig, directions: AttackingDirections) -> Self {
        Self { pitch, directions }
    }

    pub fn set_attacking_direction(&mut self, team: Team, direction: AttackingDirection) {
        self.directions.set(team, direction);
    }

    /// Parse and apply a direction string; anything but `left`/`right` is
    /// rejected before any classification happens.
    pub fn set_attacking_direction_str(&mut self, team: Team, direction: &str) -> Result<()> {
        self.directions.set(team, direction.parse()?);
        Ok(())
    }

    pub fn attacking_direction(&self, team: Team) -> AttackingDirection {
        self.directions.get(team)
    }

    pub fn is_in_final_third(&self, x: f32, team: Team) -> bool {
        in_final_third(x, self.directions.get(team), &self.pitch)
    }

    /// Classify final third entries among already-confirmed passes.
    pub fn detect(
        &self,
        passes: &[Option<Team>],
        timeline: &PossessionTimeline,
        assignment: &TeamAssignment,
        ball: &[Option<BallRecord>],
        transform: &dyn ViewTransform,
    ) -> Result<FinalThirdClassification> {
        check_len("passes", timeline.len(), passes.len())?;
        check_len("team_assignment", timeline.len(), assignment.len())?;
        check_len("tracks.ball", timeline.len(), ball.len())?;

        let mut out = FinalThirdClassification {
            final_third_passes: vec![None; timeline.len()],
            ..Default::default()
        };

        for change in possession_changes(timeline) {
            if passes[change.frame].is_none() {
                continue;
            }

            let prev_team = assignment.team_of(change.from_frame, change.from);
            let current_team = assignment.team_of(change.frame, change.to);
            let team = match (prev_team, current_team) {
                (Some(a), Some(b)) if a == b => a,
                _ => {
                    out.skipped_inconsistent_team += 1;
                    continue;
                }
            };

            let start = ball_position(ball, change.from_frame, transform);
            let end = ball_position(ball, change.frame, transform);
            let (Some(start_pos), Some(end_pos)) = (start, end) else {
                out.skipped_missing_position += 1;
                continue;
            };
            out.evaluated_passes += 1;

            let entered = !self.is_in_final_third(start_pos.x, team)
                && self.is_in_final_third(end_pos.x, team);
            if entered {
                out.final_third_passes[change.frame] = Some(team);
                out.details.push(FinalThirdPass {
                    frame: change.frame,
                    passer_id: change.from,
                    receiver_id: change.to,
                    team,
                    start_frame: change.from_frame,
                    end_frame: change.frame,
                    start_pos,
                    end_pos,
                });
            }
        }

        if out.skipped_missing_position > 0 {
            warn!(
                skipped = out.skipped_missing_position,
                "passes without ball geometry excluded from final third classification"
            );
        }
        debug!(
            evaluated = out.evaluated_passes,
            entries = out.details.len(),
            "final third classification done"
        );

        Ok(out)
    }
}

fn ball_position(
    ball: &[Option<BallRecord>],
    frame: usize,
    transform: &dyn ViewTransform,
) -> Option<PitchPoint> {
    ball.get(frame)?
        .as_ref()
        .and_then(|record| resolve_position(record, transform))
}

/// Fold entries into team and player totals.
pub fn final_third_stats(classification: &FinalThirdClassification) -> FinalThirdStats {
    let mut stats = FinalThirdStats::default();

    for team in classification.final_third_passes.iter().flatten() {
        stats.total += 1;
        *stats.by_team.get_mut(*team) += 1;
    }

    for entry in &classification.details {
        stats
            .by_player
            .entry(entry.passer_id)
            .or_insert(PlayerFinalThird {
                count: 0,
                team: entry.team,
            })
            .count += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NoTransform;
    use insta::assert_json_snapshot;

    const A: EntityId = 7;
    const B: EntityId = 9;

    fn ball_at(x: f32) -> Option<BallRecord> {
        Some(BallRecord {
            position_transformed: Some(PitchPoint::new(x, 34.0)),
            ..Default::default()
        })
    }

    fn two_player_setup(team_label: i64) -> (PossessionTimeline, TeamAssignment, Vec<Option<Team>>) {
        let timeline = PossessionTimeline::from_raw(&[7, 7, 9, 9]).unwrap();
        let frame: BTreeMap<EntityId, i64> = [(A, team_label), (B, team_label)].into_iter().collect();
        let assignment = TeamAssignment::from_raw(&vec![frame; 4]).unwrap();
        let team = Team::from_label(team_label).unwrap();
        let passes = vec![None, None, team, None];
        (timeline, assignment, passes)
    }

    #[test]
    fn test_entry_for_right_attacking_team() {
        let (timeline, assignment, passes) = two_player_setup(1);
        let ball = vec![ball_at(38.0), ball_at(40.0), ball_at(75.0), ball_at(76.0)];
        let detector = FinalThirdDetector::default();
        let out = detector
            .detect(&passes, &timeline, &assignment, &ball, &NoTransform)
            .unwrap();

        assert_eq!(out.final_third_passes, vec![None, None, Some(Team::Home), None]);
        assert_eq!(out.details.len(), 1);
        let entry = &out.details[0];
        assert_eq!(entry.passer_id, A);
        assert_eq!(entry.receiver_id, B);
        assert_eq!(entry.start_frame, 1);
        assert_eq!(entry.end_frame, 2);
        assert_eq!(entry.start_pos.x, 40.0);
        assert_eq!(entry.end_pos.x, 75.0);
    }

    #[test]
    fn test_inside_to_inside_is_not_an_entry() {
        let (timeline, assignment, passes) = two_player_setup(1);
        let ball = vec![None, ball_at(80.0), ball_at(90.0), None];
        let out = FinalThirdDetector::default()
            .detect(&passes, &timeline, &assignment, &ball, &NoTransform)
            .unwrap();
        assert!(out.details.is_empty());
        assert_eq!(out.evaluated_passes, 1);
    }

    #[test]
    fn test_left_attacking_team() {
        let (timeline, assignment, passes) = two_player_setup(2);
        let ball = vec![None, ball_at(50.0), ball_at(20.0), None];
        let out = FinalThirdDetector::default()
            .detect(&passes, &timeline, &assignment, &ball, &NoTransform)
            .unwrap();
        assert_eq!(out.final_third_passes[2], Some(Team::Away));

        // the same movement is not an entry once team 2 attacks right
        let mut detector = FinalThirdDetector::default();
        detector.set_attacking_direction(Team::Away, AttackingDirection::Right);
        let out = detector
            .detect(&passes, &timeline, &assignment, &ball, &NoTransform)
            .unwrap();
        assert!(out.details.is_empty());
    }

    #[test]
    fn test_missing_geometry_is_skipped_and_counted() {
        let (timeline, assignment, passes) = two_player_setup(1);
        let ball = vec![None, None, ball_at(75.0), None];
        let out = FinalThirdDetector::default()
            .detect(&passes, &timeline, &assignment, &ball, &NoTransform)
            .unwrap();
        assert!(out.details.is_empty());
        assert_eq!(out.skipped_missing_position, 1);
        assert_eq!(out.evaluated_passes, 0);
    }

    #[test]
    fn test_invalid_direction_string() {
        let mut detector = FinalThirdDetector::default();
        assert!(detector.set_attacking_direction_str(Team::Home, "forward").is_err());
        assert_eq!(detector.attacking_direction(Team::Home), AttackingDirection::Right);
        detector.set_attacking_direction_str(Team::Home, "left").unwrap();
        assert_eq!(detector.attacking_direction(Team::Home), AttackingDirection::Left);
    }

    #[test]
    fn test_passes_length_mismatch() {
        let (timeline, assignment, _) = two_player_setup(1);
        let ball = vec![None; 4];
        let result = FinalThirdDetector::default().detect(
            &[None, None],
            &timeline,
            &assignment,
            &ball,
            &NoTransform,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_snapshot() {
        let entry = |frame, passer_id, team| FinalThirdPass {
            frame,
            passer_id,
            receiver_id: 99,
            team,
            start_frame: frame - 1,
            end_frame: frame,
            start_pos: PitchPoint::new(50.0, 30.0),
            end_pos: PitchPoint::new(80.0, 30.0),
        };
        let classification = FinalThirdClassification {
            final_third_passes: vec![None, Some(Team::Home), None, Some(Team::Home), Some(Team::Away)],
            details: vec![
                entry(1, 4, Team::Home),
                entry(3, 4, Team::Home),
                entry(4, 12, Team::Away),
            ],
            ..Default::default()
        };

        let stats = final_third_stats(&classification);
        assert_json_snapshot!(stats, @r###"
        {
          "total": 3,
          "by_team": {
            "home": 2,
            "away": 1
          },
          "by_player": {
            "4": {
              "count": 2,
              "team": 1
            },
            "12": {
              "count": 1,
              "team": 2
            }
          }
        }
        "###);
    }
}

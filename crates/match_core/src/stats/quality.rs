//! Data-quality exclusions gathered from every component.
//!
//! Nothing here aborts a run; each counter says how many samples or events
//! a statistic left out of its denominator.

use crate::events::{FinalThirdClassification, PassClassification};
use crate::stats::match_stats::MatchStats;
use crate::stats::possession::PossessionStats;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Possession changes where a side had no team label
    pub unassigned_team_changes: u32,
    /// Interceptions with no receiving team
    pub unattributed_interceptions: u32,
    /// Changes reclassified as loose-ball recoveries
    pub loose_ball_recoveries: u32,
    /// Passes with no ball geometry at either end
    pub final_third_missing_ball_position: u32,
    /// Pass slots the team assignment disagrees with
    pub final_third_inconsistent_team: u32,
    /// Frames whose holder had no team
    pub unassigned_possession_frames: u32,
    /// Player samples with a team but no pitch position
    pub unresolved_player_positions: u32,
    /// Player samples with no team
    pub unassigned_player_samples: u32,
    /// Entities that never reported a distance
    pub entities_without_distance: u32,
}

impl DataQuality {
    pub fn collect(
        classification: &PassClassification,
        final_third: &FinalThirdClassification,
        possession: &PossessionStats,
        stats: &MatchStats,
    ) -> Self {
        let diag = &classification.diagnostics;
        Self {
            unassigned_team_changes: diag.unassigned_team_changes,
            unattributed_interceptions: diag.unattributed_interceptions,
            loose_ball_recoveries: diag.loose_ball_recoveries,
            final_third_missing_ball_position: final_third.skipped_missing_position,
            final_third_inconsistent_team: final_third.skipped_inconsistent_team,
            unassigned_possession_frames: possession.unassigned_possession_frames,
            unresolved_player_positions: stats.zones.unresolved_position_samples,
            unassigned_player_samples: stats.zones.unassigned_samples,
            entities_without_distance: stats.distance.entities_without_distance,
        }
    }

    /// Labelled non-zero counters, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        [
            ("possession changes with unassigned team", self.unassigned_team_changes),
            ("interceptions without receiving team", self.unattributed_interceptions),
            ("loose-ball recoveries", self.loose_ball_recoveries),
            ("passes without ball position", self.final_third_missing_ball_position),
            ("passes with inconsistent team", self.final_third_inconsistent_team),
            ("possession frames with unassigned holder", self.unassigned_possession_frames),
            ("player samples without pitch position", self.unresolved_player_positions),
            ("player samples without team", self.unassigned_player_samples),
            ("entities without distance", self.entities_without_distance),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.entries().is_empty()
    }

    pub(crate) fn log(&self) {
        for (label, count) in self.entries() {
            warn!(count, "excluded: {}", label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_skip_zero_counters() {
        let quality = DataQuality {
            unattributed_interceptions: 2,
            entities_without_distance: 1,
            ..Default::default()
        };
        assert_eq!(
            quality.entries(),
            vec![
                ("interceptions without receiving team", 2),
                ("entities without distance", 1),
            ]
        );
        assert!(!quality.is_clean());
        assert!(DataQuality::default().is_clean());
    }
}

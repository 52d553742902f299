//! Property-based test generators for match inputs
//!
//! Random timelines, team labels and tracks that always agree in length, so
//! every generated input passes structural validation.

use crate::timeline::MatchInput;
use crate::types::{BallRecord, EntityId, EntityRecord, PitchPoint, Tracks};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Entity ids drawn from `1..=ENTITIES`.
pub const ENTITIES: EntityId = 6;

pub fn pitch_point_strategy() -> impl Strategy<Value = PitchPoint> {
    (0.0f32..=105.0, 0.0f32..=68.0).prop_map(|(x, y)| PitchPoint::new(x, y))
}

pub fn holder_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(-1i64), 1i64..=ENTITIES as i64]
}

pub fn label_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(-1i64), Just(1i64), Just(2i64)]
}

pub fn entity_record_strategy() -> impl Strategy<Value = EntityRecord> {
    (
        option::of(pitch_point_strategy()),
        option::of(0.0f32..=9.0),    // speed m/s
        option::of(0.0f32..=500.0),  // cumulative distance m
    )
        .prop_map(|(position_transformed, speed, distance)| EntityRecord {
            position_transformed,
            speed,
            distance,
            ..Default::default()
        })
}

pub fn ball_strategy() -> impl Strategy<Value = Option<BallRecord>> {
    option::of(option::of(pitch_point_strategy()).prop_map(|position_transformed| BallRecord {
        position_transformed,
        ..Default::default()
    }))
}

fn frame_labels() -> impl Strategy<Value = BTreeMap<EntityId, i64>> {
    btree_map(1..=ENTITIES, label_strategy(), 0..=ENTITIES as usize)
}

fn frame_players() -> impl Strategy<Value = BTreeMap<EntityId, EntityRecord>> {
    btree_map(1..=ENTITIES, entity_record_strategy(), 0..=ENTITIES as usize)
}

pub fn match_input_strategy() -> impl Strategy<Value = MatchInput> {
    (1usize..=48)
        .prop_flat_map(|frames| {
            (
                vec(holder_strategy(), frames),
                vec(frame_labels(), frames),
                vec(frame_players(), frames),
                vec(ball_strategy(), frames),
            )
        })
        .prop_map(|(possession, team_assignment, players, ball)| MatchInput {
            possession,
            team_assignment,
            tracks: Tracks { players, ball },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, AttackingDirection};
    use crate::events::possession_changes;
    use crate::geometry::NoTransform;
    use crate::pipeline::analyze_match;
    use crate::stats::possession::percentage;
    use crate::types::Team;

    fn config(gap: Option<usize>, home_left: bool) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.classifier.max_transfer_gap_frames = gap;
        if home_left {
            config.set_attacking_direction(Team::Home, AttackingDirection::Left);
            config.set_attacking_direction(Team::Away, AttackingDirection::Right);
        }
        config
    }

    proptest! {
        #[test]
        fn test_generated_inputs_are_valid(input in match_input_strategy()) {
            prop_assert!(input.into_data(10_000).is_ok());
        }

        #[test]
        fn test_changes_are_real_handovers(input in match_input_strategy()) {
            let data = input.into_data(10_000).unwrap();
            for change in possession_changes(&data.timeline) {
                prop_assert_ne!(change.from, change.to);
                prop_assert!(change.from_frame < change.frame);
                prop_assert_eq!(data.timeline.holder(change.frame), Some(change.to));
                prop_assert_eq!(data.timeline.holder(change.from_frame), Some(change.from));
            }
        }

        #[test]
        fn test_pass_and_interception_slots_are_exclusive(
            input in match_input_strategy(),
            gap in option::of(0usize..4),
            home_left in any::<bool>(),
        ) {
            let data = input.into_data(10_000).unwrap();
            let analysis = analyze_match(&data, &config(gap, home_left), &NoTransform).unwrap();
            let c = &analysis.classification;

            prop_assert_eq!(c.passes.len(), analysis.frame_count);
            prop_assert_eq!(c.interceptions.len(), analysis.frame_count);
            for (pass, interception) in c.passes.iter().zip(&c.interceptions) {
                prop_assert!(pass.is_none() || interception.is_none());
            }
            // counts agree with the filled slots
            prop_assert_eq!(c.passes.iter().flatten().count(), c.pass_count());
            prop_assert_eq!(c.interceptions.iter().flatten().count(), c.interception_count());
            if gap.is_none() {
                prop_assert_eq!(c.diagnostics.loose_ball_recoveries, 0);
                prop_assert_eq!(
                    c.pass_count()
                        + c.interception_count()
                        + c.diagnostics.unattributed_interceptions as usize,
                    c.diagnostics.possession_changes as usize
                );
            }
        }

        #[test]
        fn test_final_third_passes_are_passes(
            input in match_input_strategy(),
            home_left in any::<bool>(),
        ) {
            let data = input.into_data(10_000).unwrap();
            let analysis = analyze_match(&data, &config(None, home_left), &NoTransform).unwrap();
            let passes = &analysis.classification.passes;

            for (frame, entry) in analysis.final_third.final_third_passes.iter().enumerate() {
                if entry.is_some() {
                    prop_assert_eq!(*entry, passes[frame]);
                }
            }
            prop_assert_eq!(
                analysis.final_third_stats.total as usize,
                analysis.final_third.final_third_passes.iter().flatten().count()
            );
        }

        #[test]
        fn test_percentages_are_bounded(input in match_input_strategy()) {
            let data = input.into_data(10_000).unwrap();
            let analysis = analyze_match(&data, &AnalysisConfig::default(), &NoTransform).unwrap();
            let p = &analysis.possession;

            prop_assert!((0.0..=100.0).contains(&p.possession_percentage));
            let expected = percentage(p.possession_frames, p.total_frames);
            prop_assert!((p.possession_percentage - expected).abs() < 1e-3);

            for acc in analysis.pass_accuracy.values() {
                prop_assert!((0.0..=100.0).contains(&acc.accuracy));
                if acc.attempts() == 0 {
                    prop_assert_eq!(acc.accuracy, 0.0);
                }
            }
            let attempts: u32 = analysis.pass_accuracy.values().map(|a| a.attempts()).sum();
            let c = &analysis.classification;
            prop_assert_eq!(attempts as usize, c.pass_count() + c.interception_count());

            for team in Team::ALL {
                let zones = analysis.stats.zones.teams.get(team);
                if zones.total() > 0 {
                    let sum: f32 = crate::geometry::Zone::ALL
                        .iter()
                        .map(|z| zones.percentage(*z))
                        .sum();
                    prop_assert!((sum - 100.0).abs() < 1e-2);
                }
            }
        }

        #[test]
        fn test_analysis_is_deterministic(input in match_input_strategy()) {
            let data = input.into_data(10_000).unwrap();
            let config = AnalysisConfig::default();
            let a = analyze_match(&data, &config, &NoTransform).unwrap();
            let b = analyze_match(&data, &config, &NoTransform).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}

//! End-to-end scenarios through the public API.

use match_core::geometry::NoTransform;
use match_core::{analyze_match, AnalysisConfig, AnalysisError, MatchAnalysis, MatchInput, Team};
use serde_json::json;

const A: u32 = 7;
const B: u32 = 8;
const C: u32 = 21;

fn run(doc: serde_json::Value) -> MatchAnalysis {
    let input: MatchInput = serde_json::from_value(doc).unwrap();
    let config = AnalysisConfig::default();
    let data = input.into_data(config.max_frames).unwrap();
    analyze_match(&data, &config, &NoTransform).unwrap()
}

fn slots(values: &[Option<Team>]) -> Vec<i32> {
    values.iter().map(|t| t.map(Team::id).unwrap_or(-1)).collect()
}

#[test]
fn scenario_same_team_handover_is_a_pass() {
    let labels = json!({ A.to_string(): 1, B.to_string(): 1 });
    let analysis = run(json!({
        "possession": [A, A, B, B],
        "team_assignment": [labels, labels, labels, labels],
    }));

    assert_eq!(slots(&analysis.classification.passes), vec![-1, -1, 1, -1]);
    assert_eq!(slots(&analysis.classification.interceptions), vec![-1, -1, -1, -1]);
    assert_eq!(analysis.pass_accuracy[&A].successful, 1);
}

#[test]
fn scenario_cross_team_handover_is_an_interception() {
    let labels = json!({ A.to_string(): 1, C.to_string(): 2 });
    let analysis = run(json!({
        "possession": [A, A, C, C],
        "team_assignment": [labels, labels, labels, labels],
    }));

    assert_eq!(slots(&analysis.classification.interceptions), vec![-1, -1, 2, -1]);
    assert_eq!(slots(&analysis.classification.passes), vec![-1, -1, -1, -1]);
    assert_eq!(analysis.pass_accuracy[&A].failed, 1);
    assert_eq!(analysis.pass_accuracy[&A].accuracy, 0.0);
}

#[test]
fn scenario_pass_into_final_third() {
    let labels = json!({ A.to_string(): 1, B.to_string(): 1 });
    let ball = |x: f32| json!({ "1": { "position_transformed": [x, 34.0] } });
    let analysis = run(json!({
        "possession": [A, A, B, B],
        "team_assignment": [labels, labels, labels, labels],
        "tracks": {
            "players": [{}, {}, {}, {}],
            "ball": [ball(38.0), ball(40.0), ball(75.0), ball(76.0)],
        },
    }));

    assert_eq!(
        slots(&analysis.final_third.final_third_passes),
        vec![-1, -1, 1, -1]
    );
    assert_eq!(analysis.final_third_stats.total, 1);
    assert_eq!(analysis.final_third_stats.by_player[&A].count, 1);
    let entry = &analysis.final_third.details[0];
    assert_eq!((entry.start_frame, entry.end_frame), (1, 2));
}

#[test]
fn scenario_ball_frames_must_be_keyed_by_ball_id() {
    let labels = json!({ A.to_string(): 1, B.to_string(): 1 });
    let input = serde_json::from_value::<MatchInput>(json!({
        "possession": [A, B],
        "team_assignment": [labels, labels],
        "tracks": {
            "players": [{}, {}],
            "ball": [{ "position_transformed": [40.0, 34.0] }, { "position_transformed": [75.0, 34.0] }],
        },
    }));
    assert!(input.is_err());
}

#[test]
fn scenario_noisy_distance_takes_maximum() {
    let labels = json!({ A.to_string(): 1 });
    let players: Vec<_> = [0.0, 3.2, 3.2, 7.9, 6.0]
        .iter()
        .map(|d| json!({ A.to_string(): { "distance": d } }))
        .collect();
    let analysis = run(json!({
        "possession": [-1, -1, -1, -1, -1],
        "team_assignment": vec![labels; 5],
        "tracks": { "players": players, "ball": [null, null, null, null, null] },
    }));

    let entry = &analysis.stats.distance.per_entity[&A];
    assert!((entry.distance_m - 7.9).abs() < 1e-5);
    assert!((analysis.stats.distance.team_totals.home - 7.9).abs() < 1e-5);
}

#[test]
fn scenario_unknown_prior_team_is_not_a_pass() {
    let analysis = run(json!({
        "possession": [A, A, B, B],
        "team_assignment": [
            { A.to_string(): -1, B.to_string(): 1 },
            { A.to_string(): -1, B.to_string(): 1 },
            { A.to_string(): -1, B.to_string(): 1 },
            { A.to_string(): -1, B.to_string(): 1 },
        ],
    }));

    assert_eq!(slots(&analysis.classification.passes), vec![-1, -1, -1, -1]);
    assert_eq!(slots(&analysis.classification.interceptions), vec![-1, -1, 1, -1]);
    assert_eq!(analysis.quality.unassigned_team_changes, 1);
}

#[test]
fn scenario_empty_match() {
    let analysis = run(json!({ "possession": [], "team_assignment": [] }));
    assert_eq!(analysis.frame_count, 0);
    assert_eq!(analysis.possession.possession_percentage, 0.0);
    assert!(analysis.classification.events.is_empty());
}

#[test]
fn scenario_mismatched_lengths_are_refused() {
    let input: MatchInput = serde_json::from_value(json!({
        "possession": [A, B],
        "team_assignment": [{}],
    }))
    .unwrap();
    let err = input.into_data(100).unwrap_err();
    assert!(matches!(err, AnalysisError::LengthMismatch { .. }));
    assert!(!err.is_recoverable());
}

//! # Analysis Pipeline
//!
//! Runs every classifier and aggregator once over validated inputs and
//! gathers the results into a single [`MatchAnalysis`].
//!
//! Event classification is one sequential scan; the track statistics run
//! alongside it on the rayon pool.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::events::{
    classify, final_third_stats, pass_network, FinalThirdClassification, FinalThirdDetector,
    FinalThirdStats, PassClassification, PassNetwork,
};
use crate::geometry::ViewTransform;
use crate::stats::{
    match_stats, pass_accuracy, possession_stats, team_ball_control, DataQuality, MatchStats,
    PassAccuracy, PossessionStats, TeamBallControl,
};
use crate::timeline::MatchData;
use crate::types::EntityId;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, info_span};

/// Everything derived from one match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalysis {
    pub frame_count: usize,
    pub classification: PassClassification,
    pub final_third: FinalThirdClassification,
    pub final_third_stats: FinalThirdStats,
    pub possession: PossessionStats,
    pub pass_accuracy: BTreeMap<EntityId, PassAccuracy>,
    pub ball_control: TeamBallControl,
    pub pass_network: PassNetwork,
    pub stats: MatchStats,
    pub quality: DataQuality,
}

struct EventOutputs {
    classification: PassClassification,
    final_third: FinalThirdClassification,
    possession: PossessionStats,
    ball_control: TeamBallControl,
}

fn run_events(
    data: &MatchData,
    config: &AnalysisConfig,
    transform: &dyn ViewTransform,
) -> Result<EventOutputs> {
    let classification = classify(&data.timeline, &data.assignment, &config.classifier)?;
    let detector = FinalThirdDetector::new(config.pitch, config.directions);
    let final_third = detector.detect(
        &classification.passes,
        &data.timeline,
        &data.assignment,
        &data.tracks.ball,
        transform,
    )?;
    Ok(EventOutputs {
        possession: possession_stats(&data.timeline, &data.assignment),
        ball_control: team_ball_control(&data.timeline, &data.assignment),
        classification,
        final_third,
    })
}

/// Analyse one match.
///
/// Fails only on invalid configuration or structural problems; per-frame
/// data gaps end up in [`MatchAnalysis::quality`].
pub fn analyze_match(
    data: &MatchData,
    config: &AnalysisConfig,
    transform: &dyn ViewTransform,
) -> Result<MatchAnalysis> {
    config.validate()?;
    let frames = data.frame_count();
    if frames > config.max_frames {
        return Err(AnalysisError::TooManyFrames {
            frames,
            limit: config.max_frames,
        });
    }

    let span = info_span!("analyze_match", frames);
    let _guard = span.enter();

    let (events, stats) = rayon::join(
        || run_events(data, config, transform),
        || {
            match_stats::analyze(
                &data.tracks,
                &data.timeline,
                &data.assignment,
                config,
                transform,
            )
        },
    );
    let events = events?;
    let stats = stats?;

    let quality = DataQuality::collect(
        &events.classification,
        &events.final_third,
        &events.possession,
        &stats,
    );
    quality.log();

    let analysis = MatchAnalysis {
        frame_count: frames,
        final_third_stats: final_third_stats(&events.final_third),
        pass_accuracy: pass_accuracy(&events.classification),
        pass_network: pass_network(&events.classification),
        classification: events.classification,
        final_third: events.final_third,
        possession: events.possession,
        ball_control: events.ball_control,
        stats,
        quality,
    };

    info!(
        passes = analysis.classification.pass_count(),
        interceptions = analysis.classification.interception_count(),
        final_third_entries = analysis.final_third_stats.total,
        possession_pct = analysis.possession.possession_percentage,
        "match analysed"
    );

    Ok(analysis)
}

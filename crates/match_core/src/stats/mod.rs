//! # Statistics Module
//!
//! Aggregates over the possession timeline, the classified events and the
//! per-frame tracks.
//!
//! - `possession` - Possession frames, pass accuracy, team ball control
//! - `match_stats` - Distance, zone occupancy, off-ball runs
//! - `quality` - Exclusion counters gathered from every component
//! - `report` - Plain-text rendering

pub mod match_stats;
pub mod possession;
pub mod quality;
pub mod report;

pub use match_stats::{
    distance_report, off_ball_report, zone_report, DistanceEntry, DistanceReport, MatchStats,
    OffBallReport, ZoneCounts, ZoneReport, TOP_DISTANCE_PLAYERS,
};
pub use possession::{
    pass_accuracy, possession_stats, team_ball_control, PassAccuracy, PossessionStats,
    TeamBallControl,
};
pub use quality::DataQuality;
pub use report::render_report;

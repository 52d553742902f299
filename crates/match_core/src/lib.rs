//! # match_core
//!
//! Possession-timeline analysis for tracked football matches.
//!
//! Given the ball holder per frame, per-frame team labels and player/ball
//! tracks, the crate classifies every change of possession as a pass,
//! interception or loose-ball recovery, finds passes into the final third,
//! and aggregates possession, pass accuracy, distance, zone occupancy and
//! off-ball intensity.
//!
//! ## Modules
//!
//! - `types` - Teams, entity ids and per-frame track records
//! - `timeline` - Validated possession timeline and team assignment
//! - `config` - Pitch, frame rate and attacking-direction settings
//! - `geometry` - Position resolution, view transforms, zones
//! - `events` - Possession changes, pass classification, final third
//! - `stats` - Possession, accuracy and track statistics, text report
//! - `pipeline` - One-call analysis of a whole match
//!
//! ```
//! use match_core::{analyze_match, AnalysisConfig, MatchInput};
//! use match_core::geometry::NoTransform;
//!
//! let input = MatchInput {
//!     possession: vec![1, 1, 2],
//!     team_assignment: vec![[(1, 1), (2, 1)].into_iter().collect(); 3],
//!     tracks: Default::default(),
//! };
//! let config = AnalysisConfig::default();
//! let data = input.into_data(config.max_frames).unwrap();
//! let analysis = analyze_match(&data, &config, &NoTransform).unwrap();
//! assert_eq!(analysis.classification.pass_count(), 1);
//! ```

#![allow(clippy::field_reassign_with_default)]

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod pipeline;
pub mod stats;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub mod proptest_gen;

pub use config::{AnalysisConfig, AttackingDirection, PitchConfig};
pub use error::{AnalysisError, Result};
pub use pipeline::{analyze_match, MatchAnalysis};
pub use timeline::{MatchData, MatchInput, PossessionTimeline, TeamAssignment};
pub use types::{EntityId, Team, Tracks};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

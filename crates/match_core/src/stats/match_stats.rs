//! # Match Statistics
//!
//! Distance, zone occupancy and off-ball intensity from per-frame tracks.
//!
//! ## Algorithm
//! 1. Distance: running maximum of each entity's cumulative distance (0 when
//!    none is ever reported), team totals from the entity's most recent team
//!    label
//! 2. Zones: thirds of the pitch length, remapped per attacking direction
//! 3. Off-ball: frames above the speed threshold while not on the ball
//!
//! Zone and off-ball passes are integer-count folds and run in parallel over
//! frames. The distance pass sums floats, so it stays sequential to keep the
//! output bit-identical between runs.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::geometry::{resolve_position, zone_for, ViewTransform, Zone};
use crate::stats::possession::percentage;
use crate::timeline::{check_len, PossessionTimeline, TeamAssignment};
use crate::types::{EntityId, EntityRecord, Team, TeamCounts, Tracks};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Add;
use tracing::debug;

/// Number of entries in the distance ranking.
pub const TOP_DISTANCE_PLAYERS: usize = 5;

/// Distance summary for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub entity_id: EntityId,
    /// Most recent team label seen for this entity
    #[serde(with = "crate::types::team_label")]
    pub team: Option<Team>,
    /// Maximum cumulative distance observed, metres
    pub distance_m: f32,
    /// Mean of the speed samples, when any exist
    pub avg_speed_mps: Option<f32>,
}

/// Distance sub-report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    pub per_entity: BTreeMap<EntityId, DistanceEntry>,
    pub team_totals: TeamCounts<f32>,
    /// Top entities by distance, ties by ascending id
    pub ranking: Vec<DistanceEntry>,
    /// Entities seen in tracks that never reported a distance (listed at 0 m)
    pub entities_without_distance: u32,
    /// Entities with a distance but no team label in any frame
    pub entities_without_team: u32,
}

/// Frames spent in each team-relative third.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCounts {
    pub defensive: u32,
    pub midfield: u32,
    pub attacking: u32,
}

impl ZoneCounts {
    pub fn get(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Defensive => self.defensive,
            Zone::Midfield => self.midfield,
            Zone::Attacking => self.attacking,
        }
    }

    pub fn record(&mut self, zone: Zone) {
        match zone {
            Zone::Defensive => self.defensive += 1,
            Zone::Midfield => self.midfield += 1,
            Zone::Attacking => self.attacking += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.defensive + self.midfield + self.attacking
    }

    /// Share of classified frames in `zone`, 0 when nothing was classified.
    pub fn percentage(&self, zone: Zone) -> f32 {
        percentage(self.get(zone), self.total())
    }
}

impl Add for ZoneCounts {
    type Output = ZoneCounts;

    fn add(self, other: ZoneCounts) -> ZoneCounts {
        ZoneCounts {
            defensive: self.defensive + other.defensive,
            midfield: self.midfield + other.midfield,
            attacking: self.attacking + other.attacking,
        }
    }
}

/// Zone occupancy sub-report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneReport {
    pub teams: TeamCounts<ZoneCounts>,
    pub per_player: BTreeMap<EntityId, ZoneCounts>,
    /// Team-assigned samples with no resolvable pitch position
    pub unresolved_position_samples: u32,
    /// Samples skipped because the entity had no team that frame
    pub unassigned_samples: u32,
}

/// Off-ball high intensity sub-report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffBallReport {
    pub threshold_mps: f32,
    pub frames: TeamCounts<u32>,
    pub seconds: TeamCounts<f32>,
    pub per_player_frames: BTreeMap<EntityId, u32>,
}

/// All match statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub distance: DistanceReport,
    pub zones: ZoneReport,
    pub off_ball: OffBallReport,
}

/// Team of an entity in one frame: the frame's assignment first, then the
/// label carried on the track.
#[inline]
fn entity_team(assignment: &TeamAssignment, frame: usize, id: EntityId, record: &EntityRecord) -> Option<Team> {
    assignment.team_of(frame, id).or(record.team)
}

#[derive(Default)]
struct DistanceAccum {
    max_distance: Option<f32>,
    team: Option<Team>,
    speed_sum: f64,
    speed_samples: u32,
}

/// Distance totals and ranking.
pub fn distance_report(tracks: &Tracks, assignment: &TeamAssignment) -> DistanceReport {
    let mut accum: BTreeMap<EntityId, DistanceAccum> = BTreeMap::new();

    for (frame, players) in tracks.players.iter().enumerate() {
        for (&id, record) in players {
            let entry = accum.entry(id).or_default();
            if let Some(d) = record.distance.filter(|d| d.is_finite()) {
                entry.max_distance = Some(entry.max_distance.map_or(d, |m| m.max(d)));
            }
            if let Some(team) = entity_team(assignment, frame, id, record) {
                entry.team = Some(team);
            }
            if let Some(s) = record.speed.filter(|s| s.is_finite()) {
                entry.speed_sum += s as f64;
                entry.speed_samples += 1;
            }
        }
    }

    let mut report = DistanceReport::default();
    for (id, acc) in accum {
        // entities that never report a distance are ranked at 0 m
        let distance_m = acc.max_distance.unwrap_or_else(|| {
            report.entities_without_distance += 1;
            0.0
        });
        let avg_speed_mps =
            (acc.speed_samples > 0).then(|| (acc.speed_sum / acc.speed_samples as f64) as f32);
        match acc.team {
            Some(team) => *report.team_totals.get_mut(team) += distance_m,
            None => report.entities_without_team += 1,
        }
        report.per_entity.insert(
            id,
            DistanceEntry {
                entity_id: id,
                team: acc.team,
                distance_m,
                avg_speed_mps,
            },
        );
    }

    let mut ranking: Vec<DistanceEntry> = report.per_entity.values().copied().collect();
    ranking.sort_by(|a, b| {
        b.distance_m
            .total_cmp(&a.distance_m)
            .then(a.entity_id.cmp(&b.entity_id))
    });
    ranking.truncate(TOP_DISTANCE_PLAYERS);
    report.ranking = ranking;
    report
}

impl ZoneReport {
    fn merge(mut self, other: ZoneReport) -> ZoneReport {
        self.teams = self.teams.merge(other.teams);
        for (id, counts) in other.per_player {
            let slot = self.per_player.entry(id).or_default();
            *slot = *slot + counts;
        }
        self.unresolved_position_samples += other.unresolved_position_samples;
        self.unassigned_samples += other.unassigned_samples;
        self
    }
}

/// Zone occupancy per team and player.
pub fn zone_report(
    tracks: &Tracks,
    assignment: &TeamAssignment,
    config: &AnalysisConfig,
    transform: &dyn ViewTransform,
) -> ZoneReport {
    tracks
        .players
        .par_iter()
        .enumerate()
        .fold(ZoneReport::default, |mut acc, (frame, players)| {
            for (&id, record) in players {
                let Some(team) = entity_team(assignment, frame, id, record) else {
                    acc.unassigned_samples += 1;
                    continue;
                };
                let Some(pos) = resolve_position(record, transform) else {
                    acc.unresolved_position_samples += 1;
                    continue;
                };
                let zone = zone_for(pos.x, config.directions.get(team), &config.pitch);
                acc.teams.get_mut(team).record(zone);
                acc.per_player.entry(id).or_default().record(zone);
            }
            acc
        })
        .reduce(ZoneReport::default, ZoneReport::merge)
}

#[derive(Default)]
struct OffBallAccum {
    frames: TeamCounts<u32>,
    per_player: BTreeMap<EntityId, u32>,
}

impl OffBallAccum {
    fn merge(mut self, other: OffBallAccum) -> OffBallAccum {
        self.frames = self.frames.merge(other.frames);
        for (id, n) in other.per_player {
            *self.per_player.entry(id).or_insert(0) += n;
        }
        self
    }
}

/// High intensity movement by players not on the ball.
pub fn off_ball_report(
    tracks: &Tracks,
    timeline: &PossessionTimeline,
    assignment: &TeamAssignment,
    config: &AnalysisConfig,
) -> OffBallReport {
    let threshold = config.high_speed_threshold_mps;
    let accum = tracks
        .players
        .par_iter()
        .enumerate()
        .fold(OffBallAccum::default, |mut acc, (frame, players)| {
            let holder = timeline.holder(frame);
            for (&id, record) in players {
                let Some(team) = entity_team(assignment, frame, id, record) else {
                    continue;
                };
                let fast = record.speed.is_some_and(|s| s > threshold);
                if fast && holder != Some(id) {
                    *acc.frames.get_mut(team) += 1;
                    *acc.per_player.entry(id).or_insert(0) += 1;
                }
            }
            acc
        })
        .reduce(OffBallAccum::default, OffBallAccum::merge);

    OffBallReport {
        threshold_mps: threshold,
        seconds: TeamCounts {
            home: accum.frames.home as f32 / config.fps,
            away: accum.frames.away as f32 / config.fps,
        },
        frames: accum.frames,
        per_player_frames: accum.per_player,
    }
}

/// Run the three sub-reports.
pub fn analyze(
    tracks: &Tracks,
    timeline: &PossessionTimeline,
    assignment: &TeamAssignment,
    config: &AnalysisConfig,
    transform: &dyn ViewTransform,
) -> Result<MatchStats> {
    check_len("tracks.players", timeline.len(), tracks.players.len())?;
    check_len("team_assignment", timeline.len(), assignment.len())?;

    let (distance, (zones, off_ball)) = rayon::join(
        || distance_report(tracks, assignment),
        || {
            rayon::join(
                || zone_report(tracks, assignment, config, transform),
                || off_ball_report(tracks, timeline, assignment, config),
            )
        },
    );

    debug!(
        entities = distance.per_entity.len(),
        unresolved_positions = zones.unresolved_position_samples,
        off_ball_frames = off_ball.frames.total(),
        "match statistics computed"
    );

    Ok(MatchStats {
        distance,
        zones,
        off_ball,
    })
}

//! # Core Types
//!
//! Entity, team and per-frame track records shared by every component.
//!
//! Wire values follow the tracking pipeline that produces them: teams are
//! `1` / `2`, and `-1` marks an unassigned team or an empty possession slot.
//! Inside the engine those sentinels become `Option::None`.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable tracker id of a player or goalkeeper.
pub type EntityId = u32;

/// A position in pixels (raw / adjusted) or pitch metres (transformed).
pub type PitchPoint = Point2<f32>;

/// Team label. `Home` is wire value `1`, `Away` is wire value `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Home, Team::Away];

    /// Wire id (1 or 2).
    pub fn id(self) -> i32 {
        match self {
            Team::Home => 1,
            Team::Away => 2,
        }
    }

    /// Decode a wire label. `-1` is unassigned; anything else but `1` / `2`
    /// is an error.
    pub fn from_label(value: i64) -> Result<Option<Team>, String> {
        match value {
            1 => Ok(Some(Team::Home)),
            2 => Ok(Some(Team::Away)),
            -1 => Ok(None),
            v => Err(format!("unknown team label {}", v)),
        }
    }
}

impl TryFrom<i32> for Team {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match Team::from_label(value as i64)? {
            Some(team) => Ok(team),
            None => Err(format!("team label {} is unassigned", value)),
        }
    }
}

impl From<Team> for i32 {
    fn from(team: Team) -> i32 {
        team.id()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Team {}", self.id())
    }
}

/// `Option<Team>` on the wire as `1`, `2` or `-1`.
pub mod team_label {
    use super::Team;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Team>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i32(value.map(Team::id).unwrap_or(-1))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Team>, D::Error> {
        match Option::<i64>::deserialize(d)? {
            None => Ok(None),
            Some(v) => Team::from_label(v).map_err(D::Error::custom),
        }
    }
}

/// A value split by team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamCounts<T> {
    pub home: T,
    pub away: T,
}

impl<T: Copy> TeamCounts<T> {
    pub fn get(&self, team: Team) -> T {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }
}

impl<T: Copy + std::ops::Add<Output = T>> TeamCounts<T> {
    pub fn total(&self) -> T {
        self.home + self.away
    }

    /// Element-wise sum, used when merging partial folds.
    pub fn merge(self, other: Self) -> Self {
        Self {
            home: self.home + other.home,
            away: self.away + other.away,
        }
    }
}

/// One tracked player/goalkeeper in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Bounding box `[x1, y1, x2, y2]` in pixels
    #[serde(default)]
    pub bbox: [f32; 4],
    /// Foot position in image pixels
    #[serde(default)]
    pub position: Option<PitchPoint>,
    /// Camera-motion compensated position in pixels
    #[serde(default)]
    pub position_adjusted: Option<PitchPoint>,
    /// Pitch-space position in metres
    #[serde(default)]
    pub position_transformed: Option<PitchPoint>,
    /// Instantaneous speed in m/s
    #[serde(default)]
    pub speed: Option<f32>,
    /// Cumulative distance in metres
    #[serde(default)]
    pub distance: Option<f32>,
    /// Team label carried on the track itself
    #[serde(default, with = "team_label")]
    pub team: Option<Team>,
}

/// Key of the ball inside each per-frame ball map on the wire.
pub const BALL_ID: EntityId = 1;

/// The ball in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BallRecord {
    #[serde(default)]
    pub bbox: [f32; 4],
    #[serde(default)]
    pub position: Option<PitchPoint>,
    #[serde(default)]
    pub position_adjusted: Option<PitchPoint>,
    #[serde(default)]
    pub position_transformed: Option<PitchPoint>,
}

/// Anything with a pitch-space position and a camera-adjusted fallback.
pub trait Positioned {
    fn transformed(&self) -> Option<PitchPoint>;
    fn adjusted(&self) -> Option<PitchPoint>;
}

impl Positioned for EntityRecord {
    fn transformed(&self) -> Option<PitchPoint> {
        self.position_transformed
    }

    fn adjusted(&self) -> Option<PitchPoint> {
        self.position_adjusted
    }
}

impl Positioned for BallRecord {
    fn transformed(&self) -> Option<PitchPoint> {
        self.position_transformed
    }

    fn adjusted(&self) -> Option<PitchPoint> {
        self.position_adjusted
    }
}

/// Per-frame tracks for players and the ball.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracks {
    #[serde(default)]
    pub players: Vec<BTreeMap<EntityId, EntityRecord>>,
    /// Wire shape is one `{"1": BallRecord}` map per frame (`{}` or `null`
    /// when the ball was not detected)
    #[serde(default, with = "ball_frames")]
    pub ball: Vec<Option<BallRecord>>,
}

/// Per-frame ball maps keyed by [`BALL_ID`] on the wire, `Option` in memory.
pub mod ball_frames {
    use super::{BallRecord, EntityId, BALL_ID};
    use serde::de::Error;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(frames: &[Option<BallRecord>], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(frames.len()))?;
        for frame in frames {
            let map: BTreeMap<EntityId, &BallRecord> =
                frame.iter().map(|ball| (BALL_ID, ball)).collect();
            seq.serialize_element(&map)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Option<BallRecord>>, D::Error> {
        let raw = Vec::<Option<BTreeMap<EntityId, BallRecord>>>::deserialize(d)?;
        raw.into_iter()
            .enumerate()
            .map(|(frame, entry)| {
                let mut map = entry.unwrap_or_default();
                let ball = map.remove(&BALL_ID);
                match map.keys().next() {
                    Some(key) => Err(D::Error::custom(format!(
                        "ball frame {} has key {}, expected {}",
                        frame, key, BALL_ID
                    ))),
                    None => Ok(ball),
                }
            })
            .collect()
    }
}

impl Tracks {
    /// Distinct entity ids seen in any frame.
    pub fn entity_count(&self) -> usize {
        let mut ids: Vec<EntityId> = self
            .players
            .iter()
            .flat_map(|frame| frame.keys().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

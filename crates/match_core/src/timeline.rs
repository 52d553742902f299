//! # Possession Timeline & Team Assignment
//!
//! Validated, immutable per-frame inputs.
//!
//! [`MatchInput`] is the wire document (sentinel `-1` values, string map keys
//! in JSON). [`MatchInput::into_data`] turns it into [`MatchData`], refusing to
//! continue on any shape mismatch rather than truncating.

use crate::error::{AnalysisError, Result};
use crate::types::{EntityId, Team, Tracks};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who holds the ball in each frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionTimeline {
    frames: Vec<Option<EntityId>>,
}

impl PossessionTimeline {
    pub fn new(frames: Vec<Option<EntityId>>) -> Self {
        Self { frames }
    }

    /// Decode wire values where `-1` means nobody holds the ball.
    pub fn from_raw(raw: &[i64]) -> Result<Self> {
        let frames = raw
            .iter()
            .enumerate()
            .map(|(frame, &value)| match value {
                -1 => Ok(None),
                v if (0..=EntityId::MAX as i64).contains(&v) => Ok(Some(v as EntityId)),
                v => Err(AnalysisError::InvalidPossessor { frame, value: v }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { frames })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn holder(&self, frame: usize) -> Option<EntityId> {
        self.frames.get(frame).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<EntityId>> + '_ {
        self.frames.iter().copied()
    }

    pub fn as_slice(&self) -> &[Option<EntityId>] {
        &self.frames
    }
}

/// Team label of every tracked entity, looked up per frame.
///
/// Unassigned entities are simply absent from a frame's map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    frames: Vec<BTreeMap<EntityId, Team>>,
}

impl TeamAssignment {
    pub fn new(frames: Vec<BTreeMap<EntityId, Team>>) -> Self {
        Self { frames }
    }

    /// Decode wire maps; `-1` entries are dropped, unknown labels rejected.
    pub fn from_raw(raw: &[BTreeMap<EntityId, i64>]) -> Result<Self> {
        let mut frames = Vec::with_capacity(raw.len());
        for (frame, labels) in raw.iter().enumerate() {
            let mut map = BTreeMap::new();
            for (&id, &value) in labels {
                match Team::from_label(value) {
                    Ok(Some(team)) => {
                        map.insert(id, team);
                    }
                    Ok(None) => {}
                    Err(_) => return Err(AnalysisError::InvalidLabel { frame, value }),
                }
            }
            frames.push(map);
        }
        Ok(Self { frames })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Team of `id` at `frame`, never cached across frames.
    #[inline]
    pub fn team_of(&self, frame: usize, id: EntityId) -> Option<Team> {
        self.frames.get(frame).and_then(|m| m.get(&id)).copied()
    }

    pub fn frame(&self, frame: usize) -> Option<&BTreeMap<EntityId, Team>> {
        self.frames.get(frame)
    }
}

/// Wire document consumed from the tracking pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchInput {
    /// Possessor per frame, `-1` for nobody
    pub possession: Vec<i64>,
    /// Team label per entity per frame (`1`, `2` or `-1`)
    pub team_assignment: Vec<BTreeMap<EntityId, i64>>,
    #[serde(default)]
    pub tracks: Tracks,
}

impl MatchInput {
    /// Validate shapes and decode sentinels.
    ///
    /// `max_frames` guards against pathologically large inputs. Omitted
    /// tracks expand to empty frames.
    pub fn into_data(self, max_frames: usize) -> Result<MatchData> {
        let frames = self.possession.len();
        if frames > max_frames {
            return Err(AnalysisError::TooManyFrames {
                frames,
                limit: max_frames,
            });
        }
        let timeline = PossessionTimeline::from_raw(&self.possession)?;
        let assignment = TeamAssignment::from_raw(&self.team_assignment)?;
        let mut tracks = self.tracks;
        // omitted tracks mean no track data at all
        if tracks.players.is_empty() && tracks.ball.is_empty() {
            tracks.players = vec![BTreeMap::new(); frames];
            tracks.ball = vec![None; frames];
        }
        MatchData::new(timeline, assignment, tracks)
    }
}

/// Validated inputs for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchData {
    pub timeline: PossessionTimeline,
    pub assignment: TeamAssignment,
    pub tracks: Tracks,
}

impl MatchData {
    /// Build after checking that every per-frame sequence has the same length.
    pub fn new(timeline: PossessionTimeline, assignment: TeamAssignment, tracks: Tracks) -> Result<Self> {
        let expected = timeline.len();
        check_len("team_assignment", expected, assignment.len())?;
        check_len("tracks.players", expected, tracks.players.len())?;
        check_len("tracks.ball", expected, tracks.ball.len())?;
        Ok(Self {
            timeline,
            assignment,
            tracks,
        })
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.timeline.len()
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(AnalysisError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

//! # Analysis Configuration
//!
//! Every tunable value used by the classifiers and aggregators lives here:
//! pitch dimensions, frame rate, per-team attacking direction, the off-ball
//! intensity threshold and the structural frame bound.
//!
//! ## Usage
//!
//! ```rust
//! use match_core::config::{AnalysisConfig, AttackingDirection};
//! use match_core::types::Team;
//!
//! let mut config = AnalysisConfig::default();
//! config.set_attacking_direction(Team::Home, AttackingDirection::Left);
//! assert!(config.validate().is_ok());
//! ```
//!
//! Files ending in `.yaml` / `.yml` are parsed as YAML, anything else as JSON.

use crate::error::{AnalysisError, Result};
use crate::types::Team;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Standard pitch length in metres.
pub const DEFAULT_PITCH_LENGTH_M: f32 = 105.0;

/// Standard pitch width in metres.
pub const DEFAULT_PITCH_WIDTH_M: f32 = 68.0;

/// Default video frame rate.
pub const DEFAULT_FPS: f32 = 24.0;

/// Off-ball high intensity threshold: 4.0 m/s (14.4 km/h)
pub const HIGH_SPEED_THRESHOLD_MPS: f32 = 4.0;

/// Upper bound on timeline length (about 23 hours at 24 fps).
pub const DEFAULT_MAX_FRAMES: usize = 2_000_000;

/// Which goal a team attacks along the pitch x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttackingDirection {
    /// Towards x = 0
    Left,
    /// Towards x = pitch length
    Right,
}

impl AttackingDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            AttackingDirection::Left => "left",
            AttackingDirection::Right => "right",
        }
    }
}

impl FromStr for AttackingDirection {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(AttackingDirection::Left),
            "right" => Ok(AttackingDirection::Right),
            other => Err(AnalysisError::Configuration(format!(
                "direction must be 'left' or 'right', got '{}'",
                other
            ))),
        }
    }
}

/// Pitch dimensions in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PitchConfig {
    pub length_m: f32,
    pub width_m: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            length_m: DEFAULT_PITCH_LENGTH_M,
            width_m: DEFAULT_PITCH_WIDTH_M,
        }
    }
}

impl PitchConfig {
    pub fn third(&self) -> f32 {
        self.length_m / 3.0
    }
}

/// Attacking direction for both teams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttackingDirections {
    pub home: AttackingDirection,
    pub away: AttackingDirection,
}

impl Default for AttackingDirections {
    fn default() -> Self {
        Self {
            home: AttackingDirection::Right,
            away: AttackingDirection::Left,
        }
    }
}

impl AttackingDirections {
    pub fn get(&self, team: Team) -> AttackingDirection {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }

    pub fn set(&mut self, team: Team, direction: AttackingDirection) {
        match team {
            Team::Home => self.home = direction,
            Team::Away => self.away = direction,
        }
    }
}

/// Possession-change classification settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifierConfig {
    /// Changes across more empty frames than this become loose-ball
    /// recoveries instead of passes/interceptions. `None` disables the limit.
    #[serde(default)]
    pub max_transfer_gap_frames: Option<usize>,
}

/// Full analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default)]
    pub directions: AttackingDirections,
    #[serde(default = "default_high_speed_threshold")]
    pub high_speed_threshold_mps: f32,
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

fn default_fps() -> f32 {
    DEFAULT_FPS
}

fn default_high_speed_threshold() -> f32 {
    HIGH_SPEED_THRESHOLD_MPS
}

fn default_max_frames() -> usize {
    DEFAULT_MAX_FRAMES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pitch: PitchConfig::default(),
            fps: DEFAULT_FPS,
            directions: AttackingDirections::default(),
            high_speed_threshold_mps: HIGH_SPEED_THRESHOLD_MPS,
            max_frames: DEFAULT_MAX_FRAMES,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a YAML or JSON file and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// JSON Schema for the configuration file.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(AnalysisConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }

    pub fn set_attacking_direction(&mut self, team: Team, direction: AttackingDirection) {
        self.directions.set(team, direction);
    }

    /// Parse and apply a direction string. Rejected immediately if it is not
    /// `left` or `right`.
    pub fn set_attacking_direction_str(&mut self, team: Team, direction: &str) -> Result<()> {
        let direction = direction.parse::<AttackingDirection>()?;
        self.set_attacking_direction(team, direction);
        Ok(())
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<()> {
        if !(self.pitch.length_m.is_finite() && self.pitch.length_m > 0.0) {
            return Err(AnalysisError::Configuration(format!(
                "pitch.length_m must be positive, got {}",
                self.pitch.length_m
            )));
        }
        if !(self.pitch.width_m.is_finite() && self.pitch.width_m > 0.0) {
            return Err(AnalysisError::Configuration(format!(
                "pitch.width_m must be positive, got {}",
                self.pitch.width_m
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(AnalysisError::Configuration(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(self.high_speed_threshold_mps.is_finite() && self.high_speed_threshold_mps >= 0.0) {
            return Err(AnalysisError::Configuration(format!(
                "high_speed_threshold_mps must be >= 0, got {}",
                self.high_speed_threshold_mps
            )));
        }
        if self.max_frames == 0 {
            return Err(AnalysisError::Configuration(
                "max_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

//! Match CLI Library
//!
//! Match input JSON → validated `MatchData` → analysis → text report and a
//! JSON artefact stamped with a SHA-256 of the input.

use anyhow::{Context, Result};
use match_core::geometry::{Homography, NoTransform, ViewTransform};
use match_core::{analyze_match, AnalysisConfig, MatchAnalysis, MatchData, MatchInput, Team};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Run metadata written next to the analysis.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// `match_cli` version
    pub tool_version: String,
    /// `match_core` version
    pub engine_version: String,
    /// Generation time (RFC3339)
    pub generated_at: String,
    /// SHA256 of the input file (hex)
    pub input_sha256: String,
    pub frames: usize,
    pub entities: usize,
}

/// JSON artefact: metadata, effective configuration and results.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisArtifact {
    pub metadata: RunMetadata,
    pub config: AnalysisConfig,
    pub analysis: MatchAnalysis,
}

/// Validated input plus the checksum of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub data: MatchData,
    pub checksum: String,
}

/// Command-line values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub fps: Option<f32>,
    pub home_direction: Option<String>,
    pub away_direction: Option<String>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read, checksum and validate a match input file.
pub fn load_input(path: &Path, max_frames: usize) -> Result<LoadedInput> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read match input: {}", path.display()))?;
    let checksum = sha256_hex(&bytes);

    let input: MatchInput = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse match input: {}", path.display()))?;
    let data = input
        .into_data(max_frames)
        .with_context(|| format!("Invalid match input: {}", path.display()))?;

    debug!(frames = data.frame_count(), checksum = %checksum, "input loaded");
    Ok(LoadedInput { data, checksum })
}

/// Configuration file (if any) with overrides applied, then validated.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(fps) = overrides.fps {
        config.fps = fps;
    }
    if let Some(direction) = &overrides.home_direction {
        config
            .set_attacking_direction_str(Team::Home, direction)
            .context("Invalid --home-direction")?;
    }
    if let Some(direction) = &overrides.away_direction {
        config
            .set_attacking_direction_str(Team::Away, direction)
            .context("Invalid --away-direction")?;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Homography from a JSON file holding a row-major 3x3 matrix.
pub fn load_homography(path: &Path) -> Result<Homography> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read homography: {}", path.display()))?;
    let rows: [[f32; 3]; 3] = serde_json::from_str(&content)
        .with_context(|| format!("Homography must be a 3x3 array: {}", path.display()))?;
    Ok(Homography::from_rows(rows))
}

/// Analyse a loaded input with an optional homography.
pub fn run_analysis(
    input: &LoadedInput,
    config: &AnalysisConfig,
    homography: Option<&Homography>,
) -> Result<MatchAnalysis> {
    let transform: &dyn ViewTransform = match homography {
        Some(h) => h,
        None => &NoTransform,
    };
    let analysis = analyze_match(&input.data, config, transform).context("Analysis failed")?;
    info!(
        frames = analysis.frame_count,
        passes = analysis.classification.pass_count(),
        "analysis complete"
    );
    Ok(analysis)
}

pub fn build_artifact(
    input: &LoadedInput,
    config: &AnalysisConfig,
    analysis: MatchAnalysis,
) -> AnalysisArtifact {
    AnalysisArtifact {
        metadata: RunMetadata {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            engine_version: match_core::VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            input_sha256: input.checksum.clone(),
            frames: input.data.frame_count(),
            entities: input.data.tracks.entity_count(),
        },
        config: config.clone(),
        analysis,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_report(path: &Path, report: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, report)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

pub fn write_artifact(path: &Path, artifact: &AnalysisArtifact) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(artifact).context("Failed to serialize artefact")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write artefact: {}", path.display()))?;
    info!(path = %path.display(), "artefact written");
    Ok(())
}

//! Match CLI
//!
//! Possession timeline JSON → pass / final third / match statistics report

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "match_cli")]
#[command(about = "Analyse possession timelines from tracked football matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis
    Analyze {
        /// Match input JSON (possession, team_assignment, tracks)
        #[arg(long)]
        input: PathBuf,

        /// Configuration file (.yaml/.yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the text report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the JSON artefact here
        #[arg(long)]
        json: Option<PathBuf>,

        /// Frame rate override
        #[arg(long)]
        fps: Option<f32>,

        /// Team 1 attacking direction ("left" or "right")
        #[arg(long)]
        home_direction: Option<String>,

        /// Team 2 attacking direction ("left" or "right")
        #[arg(long)]
        away_direction: Option<String>,

        /// Row-major 3x3 homography JSON for camera-adjusted positions
        #[arg(long)]
        homography: Option<PathBuf>,
    },

    /// Validate an input file and print its shape
    Check {
        /// Match input JSON
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the configuration JSON schema
    Schema,
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("MATCH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("match_core=info,match_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            report,
            json,
            fps,
            home_direction,
            away_direction,
            homography,
        } => {
            let overrides = match_cli::ConfigOverrides {
                fps,
                home_direction,
                away_direction,
            };
            let config = match_cli::load_config(config.as_deref(), &overrides)?;
            let loaded = match_cli::load_input(&input, config.max_frames)?;
            let homography = homography
                .as_deref()
                .map(match_cli::load_homography)
                .transpose()?;

            let analysis = match_cli::run_analysis(&loaded, &config, homography.as_ref())?;
            let text = match_core::stats::render_report(&analysis, &config);

            match report {
                Some(path) => match_cli::write_report(&path, &text)?,
                None => println!("{}", text),
            }

            if let Some(path) = json {
                let artifact = match_cli::build_artifact(&loaded, &config, analysis);
                match_cli::write_artifact(&path, &artifact)?;
            }
        }

        Commands::Check { input } => {
            let config = match_core::AnalysisConfig::default();
            let loaded = match_cli::load_input(&input, config.max_frames)?;
            let data = &loaded.data;
            let held = data.timeline.iter().flatten().count();

            println!("Input:    {}", input.display());
            println!("Frames:   {}", data.frame_count());
            println!("Entities: {}", data.tracks.entity_count());
            println!("Held:     {} frames", held);
            println!("SHA256:   {}", loaded.checksum);
        }

        Commands::Schema => {
            let schema = match_core::AnalysisConfig::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("match_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

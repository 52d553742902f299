//! # Text Report
//!
//! Plain-text match report assembled from labelled sections. Layout is
//! presentation only; every number comes from [`MatchAnalysis`].

use crate::config::AnalysisConfig;
use crate::geometry::Zone;
use crate::pipeline::MatchAnalysis;
use crate::types::{Team, TeamCounts};

/// Players listed in "top N" sections.
const TOP_N: usize = 5;

fn team_label(team: Option<Team>) -> i32 {
    team.map(Team::id).unwrap_or(-1)
}

fn header(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(title.len()));
}

/// Render the full report.
pub fn render_report(analysis: &MatchAnalysis, config: &AnalysisConfig) -> String {
    let mut lines = vec![
        "MATCH ANALYSIS REPORT".to_string(),
        "=====================".to_string(),
        format!(
            "Frames analysed: {} ({:.1} s at {} fps)",
            analysis.frame_count,
            analysis.frame_count as f32 / config.fps,
            config.fps
        ),
    ];

    possession_section(&mut lines, analysis);
    passing_section(&mut lines, analysis);
    final_third_section(&mut lines, analysis);
    distance_section(&mut lines, analysis);
    zone_section(&mut lines, analysis, config);
    off_ball_section(&mut lines, analysis);
    quality_section(&mut lines, analysis);

    lines.join("\n")
}

fn possession_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    let p = &analysis.possession;
    header(lines, "1. BALL POSSESSION");
    lines.push(format!(
        "Frames with possession: {}/{} ({:.1}%)",
        p.possession_frames, p.total_frames, p.possession_percentage
    ));
    for team in Team::ALL {
        lines.push(format!(
            "{} possession: {} frames ({:.1}%)",
            team,
            p.team_possession.get(team),
            p.team_share(team)
        ));
    }
    let control = &analysis.ball_control;
    lines.push(format!(
        "Team ball control: Team 1 {:.1}% / Team 2 {:.1}%",
        control.home_percentage, control.away_percentage
    ));
    lines.push("Top players with ball:".to_string());
    for (id, frames) in p.top_players(TOP_N) {
        lines.push(format!("  Player {}: {} frames", id, frames));
    }
}

fn passing_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    let c = &analysis.classification;
    header(lines, "2. PASSES & INTERCEPTIONS");
    lines.push(format!(
        "Total passes: {}, total interceptions: {}",
        c.pass_count(),
        c.interception_count()
    ));
    for team in Team::ALL {
        lines.push(format!(
            "{}: {} passes, {} interceptions",
            team,
            c.passes_by_team(team),
            c.interceptions_by_team(team)
        ));
    }

    lines.push("Pass accuracy per player:".to_string());
    for (id, acc) in &analysis.pass_accuracy {
        lines.push(format!(
            "  Player {}: successful {}, failed {}, accuracy {:.2}%",
            id, acc.successful, acc.failed, acc.accuracy
        ));
    }

    for team in Team::ALL {
        let links = analysis.pass_network.top_links(team, TOP_N);
        if links.is_empty() {
            continue;
        }
        lines.push(format!("{} top passing combinations:", team));
        for link in links {
            lines.push(format!(
                "  Players {} <-> {}: {} passes",
                link.players.0, link.players.1, link.passes
            ));
        }
    }
}

fn final_third_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    let s = &analysis.final_third_stats;
    header(lines, "3. FINAL THIRD ENTRIES");
    lines.push(format!("Total final third passes: {}", s.total));
    for team in Team::ALL {
        lines.push(format!("{}: {}", team, s.by_team.get(team)));
    }
    for (id, player) in &s.by_player {
        lines.push(format!(
            "  Player {} ({}): {}",
            id, player.team, player.count
        ));
    }
}

fn distance_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    let d = &analysis.stats.distance;
    header(lines, "4. DISTANCE COVERED");
    for team in Team::ALL {
        lines.push(format!(
            "{} Total Distance: {:.2} m",
            team,
            d.team_totals.get(team)
        ));
    }
    lines.push(String::new());
    lines.push(format!("Top {} Players by Distance:", TOP_N));
    for entry in &d.ranking {
        let speed = entry
            .avg_speed_mps
            .map(|s| format!(", avg {:.2} m/s", s))
            .unwrap_or_default();
        lines.push(format!(
            "  Player {} (Team {}): {:.2} m{}",
            entry.entity_id,
            team_label(entry.team),
            entry.distance_m,
            speed
        ));
    }
}

fn zone_section(lines: &mut Vec<String>, analysis: &MatchAnalysis, config: &AnalysisConfig) {
    header(lines, "5. ZONE ANALYSIS (Time spent in %)");
    let teams = &analysis.stats.zones.teams;
    for team in Team::ALL {
        lines.push(String::new());
        lines.push(format!(
            "{} Spatial Distribution (attacking {}):",
            team,
            config.directions.get(team).as_str()
        ));
        let counts = teams.get(team);
        if counts.total() == 0 {
            lines.push("  No position data available.".to_string());
            continue;
        }
        for zone in Zone::ALL {
            lines.push(format!("  {}: {:.1}%", zone.name(), counts.percentage(zone)));
        }
    }
}

fn off_ball_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    let o = &analysis.stats.off_ball;
    header(lines, "6. OFF-BALL RUNS (High Speed without Ball)");
    lines.push(format!("Threshold: {:.1} m/s", o.threshold_mps));
    let seconds: &TeamCounts<f32> = &o.seconds;
    for team in Team::ALL {
        lines.push(format!(
            "{}: {:.1} seconds of high-intensity off-ball movement",
            team,
            seconds.get(team)
        ));
    }
}

fn quality_section(lines: &mut Vec<String>, analysis: &MatchAnalysis) {
    header(lines, "7. DATA QUALITY");
    let entries = analysis.quality.entries();
    if entries.is_empty() {
        lines.push("No exclusions.".to_string());
        return;
    }
    for (label, count) in entries {
        lines.push(format!("  {}: {}", label, count));
    }
}

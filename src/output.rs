use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::builder::{Outcome, RunReport};
use crate::error::{PlaylistError, Result};

pub fn print_report(format: &str, report: &RunReport) -> Result<()> {
    match format {
        "text" => print_text(report),
        "json" => print_json(report),
        other => Err(PlaylistError::InvalidArg(format!(
            "Unknown output format: {other}"
        ))),
    }
}

/// Process exit code for each way a run can end.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Ready { .. } => 0,
        Outcome::NoVideosFound => 2,
        Outcome::AllFailed { .. } => 3,
    }
}

fn status(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Ready { .. } => "success",
        Outcome::NoVideosFound => "no-videos",
        Outcome::AllFailed { .. } => "all-failed",
    }
}

fn print_text(report: &RunReport) -> Result<()> {
    let mut out = io::stdout();
    match &report.outcome {
        Outcome::Ready { playlist, failures } => {
            writeln!(out)?;
            writeln!(out, "SUCCESS! 'playlist.json' saved in the course folder.")?;
            if let Some(path) = &report.manifest_path {
                writeln!(out, "Path:     {}", path.display())?;
            }
            writeln!(out, "Name:     {}", playlist.name)?;
            writeln!(out, "Videos:   {}", playlist.total_videos)?;
            writeln!(
                out,
                "Duration: {}",
                humantime::format_duration(Duration::from_secs(playlist.total_duration))
            )?;
            if !failures.is_empty() {
                writeln!(out, "Skipped:  {}", failures.len())?;
            }
        }
        Outcome::NoVideosFound => {
            writeln!(
                out,
                "No video files found in {}.",
                report.directory.display()
            )?;
        }
        Outcome::AllFailed { failures } => {
            writeln!(out)?;
            writeln!(
                out,
                "Processing failed for all {} videos. No playlist generated.",
                failures.len()
            )?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    directory: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    total_videos: usize,
    total_duration: u64,
    failures: &'a [String],
}

fn print_json(report: &RunReport) -> Result<()> {
    let (playlist, failures) = match &report.outcome {
        Outcome::Ready { playlist, failures } => (Some(playlist), failures.as_slice()),
        Outcome::NoVideosFound => (None, &[][..]),
        Outcome::AllFailed { failures } => (None, failures.as_slice()),
    };
    let json_report = JsonReport {
        status: status(&report.outcome),
        directory: &report.directory,
        manifest: report.manifest_path.as_deref(),
        name: playlist.map(|p| p.name.as_str()),
        total_videos: playlist.map_or(0, |p| p.total_videos),
        total_duration: playlist.map_or(0, |p| p.total_duration),
        failures,
    };
    let out = serde_json::to_string_pretty(&json_report)?;
    println!("{out}");
    Ok(())
}

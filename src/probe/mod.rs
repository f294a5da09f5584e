use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub mod ffprobe;
#[cfg(test)]
pub mod mock;

pub use ffprobe::Ffprobe;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe executable not found: {}", .0.display())]
    ToolMissing(PathBuf),

    #[error("probe exited with {status}")]
    Failed { status: String, stderr: String },

    #[error("probe did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("I/O error running probe: {0}")]
    Io(#[from] io::Error),

    #[error("malformed probe output: {0}")]
    Output(String),
}

impl ProbeError {
    pub fn failed(status: ExitStatus, stderr: &[u8]) -> Self {
        ProbeError::Failed {
            status: status.to_string(),
            stderr: String::from_utf8_lossy(stderr).trim_end().to_string(),
        }
    }
}

/// Source of container-level format metadata for a media file.
pub trait MediaProbe {
    /// Returns the probe's JSON document describing the container format.
    fn format_json(&self, path: &Path) -> Result<String, ProbeError>;
}

#[derive(Deserialize)]
struct ProbeDocument {
    format: Option<FormatSection>,
}

#[derive(Deserialize)]
struct FormatSection {
    duration: Option<DurationValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationValue {
    Number(f64),
    Text(String),
}

/// Extracts `format.duration` in seconds from probe output.
pub fn parse_duration(json: &str) -> Result<f64, ProbeError> {
    let doc: ProbeDocument =
        serde_json::from_str(json).map_err(|e| ProbeError::Output(e.to_string()))?;
    let format = doc
        .format
        .ok_or_else(|| ProbeError::Output("missing 'format' section".to_string()))?;
    let seconds = match format.duration {
        Some(DurationValue::Number(n)) => n,
        Some(DurationValue::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            ProbeError::Output(format!("could not convert duration to float: '{text}'"))
        })?,
        None => return Err(ProbeError::Output("missing 'format.duration'".to_string())),
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ProbeError::Output(format!("invalid duration: {seconds}")));
    }
    // `u64::MAX as f64` is 2^64, the first value that no longer fits.
    if seconds.round_ties_even() >= u64::MAX as f64 {
        return Err(ProbeError::Output(format!("duration out of range: {seconds}")));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_as_string() {
        let json = r#"{"format": {"filename": "a.mp4", "duration": "125.480000"}}"#;
        assert_eq!(parse_duration(json).unwrap(), 125.48);
    }

    #[test]
    fn duration_as_number() {
        let json = r#"{"format": {"duration": 61.5}}"#;
        assert_eq!(parse_duration(json).unwrap(), 61.5);
    }

    #[test]
    fn missing_duration_is_error() {
        let err = parse_duration(r#"{"format": {"format_name": "mov"}}"#).unwrap_err();
        assert!(err.to_string().contains("format.duration"));

        let err = parse_duration("{}").unwrap_err();
        assert!(err.to_string().contains("'format'"));
    }

    #[test]
    fn unparsable_duration_is_error() {
        let err = parse_duration(r#"{"format": {"duration": "N/A"}}"#).unwrap_err();
        assert!(matches!(err, ProbeError::Output(msg) if msg.contains("N/A")));
    }

    #[test]
    fn negative_duration_is_error() {
        assert!(parse_duration(r#"{"format": {"duration": "-3.0"}}"#).is_err());
    }

    #[test]
    fn oversized_duration_is_error() {
        let err = parse_duration(r#"{"format": {"duration": "1e30"}}"#).unwrap_err();
        assert!(matches!(err, ProbeError::Output(msg) if msg.contains("out of range")));
        assert_eq!(parse_duration(r#"{"format": {"duration": 1e19}}"#).unwrap(), 1e19);
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(
            parse_duration("not json"),
            Err(ProbeError::Output(_))
        ));
    }
}

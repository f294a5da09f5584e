use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::playlist::VideoEntry;
use crate::probe::{MediaProbe, ProbeError, parse_duration};

/// Why a single file could not be turned into a [`VideoEntry`].
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The probe cannot run at all; nothing else will succeed either.
    #[error("ffprobe executable not found! Expected at path: {}", .program.display())]
    ToolMissing { program: PathBuf },

    #[error("Error processing {file}: ffprobe failed. stderr: {stderr}")]
    ProbeFailed { file: String, stderr: String },

    #[error("An unexpected error occurred with {file}: {cause}")]
    Unexpected { file: String, cause: String },
}

impl ExtractError {
    fn from_probe(file: &str, err: ProbeError) -> Self {
        match err {
            ProbeError::ToolMissing(program) => ExtractError::ToolMissing { program },
            ProbeError::Failed { stderr, .. } => ExtractError::ProbeFailed {
                file: file.to_string(),
                stderr,
            },
            other => ExtractError::Unexpected {
                file: file.to_string(),
                cause: other.to_string(),
            },
        }
    }
}

pub struct MetadataExtractor<P> {
    probe: P,
}

impl<P: MediaProbe> MetadataExtractor<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    #[cfg(test)]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probes one file exactly once and builds its playlist entry.
    pub fn extract(&self, path: &Path) -> Result<VideoEntry, ExtractError> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let unexpected = |cause: String| ExtractError::Unexpected {
            file: file.clone(),
            cause,
        };

        let json = self
            .probe
            .format_json(path)
            .map_err(|e| ExtractError::from_probe(&file, e))?;
        let seconds = parse_duration(&json).map_err(|e| unexpected(e.to_string()))?;

        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| unexpected("file name has no title".to_string()))?;
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| unexpected(e.to_string()))?;

        Ok(VideoEntry::new(
            title,
            &format_mtime(modified),
            round_seconds(seconds),
        ))
    }
}

/// Nearest whole second, halves going to the even neighbour.
pub fn round_seconds(seconds: f64) -> u64 {
    seconds.round_ties_even() as u64
}

/// Seconds since the epoch as a float, always carrying a fractional part
/// (`1700000000.0`, `1700000000.25`).
pub fn format_mtime(modified: SystemTime) -> String {
    let seconds = match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    };
    let text = seconds.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

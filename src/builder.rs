use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PlaylistError, Result};
use crate::extract::{ExtractError, MetadataExtractor};
use crate::playlist::{Playlist, VideoEntry};
use crate::probe::MediaProbe;
use crate::scan::find_videos;

pub const MANIFEST_FILE: &str = "playlist.json";

/// Progress of a run, reported once per step so any front end can render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Found {
        total: usize,
    },
    Processed {
        index: usize,
        total: usize,
        file: String,
    },
    Failed {
        index: usize,
        total: usize,
        file: String,
        message: String,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Found { total } => {
                write!(f, "Found {total} video files. Processing...")
            }
            ProgressEvent::Processed { file, .. } => write!(f, "  ✓ Processed: {file}"),
            ProgressEvent::Failed { message, .. } => write!(f, "  ✗ {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one file was probed; failures lists the files that were skipped.
    Ready {
        playlist: Playlist,
        failures: Vec<String>,
    },
    NoVideosFound,
    AllFailed {
        failures: Vec<String>,
    },
}

#[derive(Debug)]
pub struct RunReport {
    pub directory: PathBuf,
    pub outcome: Outcome,
    /// Set once the manifest has been written.
    pub manifest_path: Option<PathBuf>,
}

pub struct PlaylistBuilder<P> {
    extractor: MetadataExtractor<P>,
}

impl<P: MediaProbe> PlaylistBuilder<P> {
    pub fn new(extractor: MetadataExtractor<P>) -> Self {
        Self { extractor }
    }

    #[cfg(test)]
    pub fn extractor(&self) -> &MetadataExtractor<P> {
        &self.extractor
    }

    /// Scans `dir` and probes every candidate in order, one at a time.
    ///
    /// A missing probe aborts the whole run; any other failure only drops
    /// that file.
    pub fn build(&self, dir: &Path, mut on_event: impl FnMut(&ProgressEvent)) -> Result<Outcome> {
        let candidates = find_videos(dir)?;
        if candidates.is_empty() {
            info!(dir = %dir.display(), "no video files found");
            return Ok(Outcome::NoVideosFound);
        }

        let total = candidates.len();
        on_event(&ProgressEvent::Found { total });

        let mut videos: Vec<VideoEntry> = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (i, path) in candidates.iter().enumerate() {
            let index = i + 1;
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.extractor.extract(path) {
                Ok(entry) => {
                    info!(index, total, %file, seconds = entry.duration_in_seconds, "processed");
                    videos.push(entry);
                    on_event(&ProgressEvent::Processed { index, total, file });
                }
                Err(ExtractError::ToolMissing { program }) => {
                    return Err(PlaylistError::ToolMissing(program));
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(index, total, %file, "{message}");
                    failures.push(message.clone());
                    on_event(&ProgressEvent::Failed {
                        index,
                        total,
                        file,
                        message,
                    });
                }
            }
        }

        if videos.is_empty() {
            return Ok(Outcome::AllFailed { failures });
        }

        let playlist = Playlist::new(playlist_name(dir), videos);
        Ok(Outcome::Ready { playlist, failures })
    }

    /// Builds the playlist and, when there is one, writes it into `dir`.
    pub fn generate(&self, dir: &Path, on_event: impl FnMut(&ProgressEvent)) -> Result<RunReport> {
        let outcome = self.build(dir, on_event)?;
        let manifest_path = match &outcome {
            Outcome::Ready { playlist, .. } => Some(write_manifest(dir, playlist)?),
            _ => None,
        };
        Ok(RunReport {
            directory: dir.to_path_buf(),
            outcome,
            manifest_path,
        })
    }
}

/// Writes `playlist.json` into `dir`, replacing whatever is there.
pub fn write_manifest(dir: &Path, playlist: &Playlist) -> Result<PathBuf> {
    let json = playlist.to_json()?;
    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, json).map_err(|source| PlaylistError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), videos = playlist.total_videos, "playlist written");
    Ok(path)
}

/// Base name of the scanned directory, resolving `.` and friends.
pub fn playlist_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| dir.display().to_string())
}

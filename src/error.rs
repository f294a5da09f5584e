use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory scan failed: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("ffprobe executable not found! Expected at path: {}", .0.display())]
    ToolMissing(PathBuf),

    #[error("Could not save the playlist file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaylistError>;

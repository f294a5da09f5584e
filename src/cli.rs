use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "course_playlist",
    version,
    about = "Build a playlist.json for a folder of course videos"
)]
pub struct Cli {
    /// Folder containing the course videos.
    pub directory: PathBuf,

    #[arg(long, env = "FFPROBE_PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Root of a bundle carrying its own probe under `binaries/<platform>/`.
    #[arg(long, env = "COURSE_PLAYLIST_BUNDLE_DIR")]
    pub bundle_dir: Option<PathBuf>,

    /// Upper bound for a single probe; `0s` waits forever.
    #[arg(long, default_value = "2m")]
    pub probe_timeout: humantime::Duration,

    #[arg(long, default_value = "text")]
    pub output: String,

    /// Print the manifest instead of writing playlist.json.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.output.as_str(), "text" | "json") {
            return Err(format!("Unknown output format: {}", self.output));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "{} is not a directory",
                self.directory.display()
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        let timeout: Duration = self.probe_timeout.into();
        if timeout.is_zero() { None } else { Some(timeout) }
    }
}

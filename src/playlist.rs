use serde::{Deserialize, Serialize};

/// One successfully probed video, in the shape playback tooling expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    pub duration_in_seconds: u64,
    pub completed: bool,
    pub thumbnail_url: String,
    pub video_url: String,
}

impl VideoEntry {
    pub fn new(title: String, mtime: &str, duration_in_seconds: u64) -> Self {
        Self {
            id: format!("{title}-{mtime}"),
            title,
            duration_in_seconds,
            completed: false,
            thumbnail_url: String::new(),
            video_url: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub name: String,
    pub videos: Vec<VideoEntry>,
    pub total_duration: u64,
    pub total_videos: usize,
}

impl Playlist {
    /// Totals are derived from `videos`; entries keep the order they are given in.
    /// The duration total saturates at `u64::MAX`.
    pub fn new(name: String, videos: Vec<VideoEntry>) -> Self {
        let total_duration = videos
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.duration_in_seconds));
        let total_videos = videos.len();
        Self {
            name,
            videos,
            total_duration,
            total_videos,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

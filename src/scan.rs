use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::Result;
use crate::natural::natural_cmp;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "ts"];

pub fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Lists the video files directly inside `dir` (no recursion), in natural
/// file name order.
pub fn find_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut videos = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Broken links and unreadable entries are skipped; only the root is fatal.
            Err(err) if err.depth() > 0 => {
                warn!("skipping directory entry: {err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if entry.file_type().is_file() && is_video(entry.path()) {
            videos.push(entry.into_path());
        }
    }

    videos.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(videos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| file_name(p)).collect()
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.txt", "c.MKV", "playlist.json", "noext"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let found = find_videos(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["a.mp4", "c.MKV"]);
    }

    #[test]
    fn does_not_recurse_or_list_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("extras.mp4")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("top.ts"), b"").unwrap();

        let found = find_videos(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["top.ts"]);
    }

    #[test]
    fn returns_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["v2.mp4", "v10.mp4", "v1.mp4"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let found = find_videos(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["v1.mp4", "v2.mp4", "v10.mp4"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_videos(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_videos(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn known_extensions() {
        for name in ["x.mp4", "x.MOV", "x.WebM", "x.avi", "x.ts", "x.mkv"] {
            assert!(is_video(Path::new(name)), "{name}");
        }
        for name in ["x.mp3", "x", ".mp4", "x.mp4.part"] {
            assert!(!is_video(Path::new(name)), "{name}");
        }
    }
}

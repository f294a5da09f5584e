use std::path::{Path, PathBuf};

use tracing::{debug, warn};

#[cfg(windows)]
pub const PROBE_EXECUTABLE: &str = "ffprobe.exe";
#[cfg(not(windows))]
pub const PROBE_EXECUTABLE: &str = "ffprobe";

/// Decides which executable is invoked as the probe.
///
/// All platform specific lookup lives behind this trait; the extractor only
/// ever sees the resulting path.
pub trait ResolveProbe {
    fn invocation_path(&self) -> PathBuf;

    /// Whether the probe ships inside a self-contained bundle.
    fn is_bundled(&self) -> bool {
        false
    }
}

/// A probe path given explicitly by configuration.
pub struct Fixed(pub PathBuf);

impl ResolveProbe for Fixed {
    fn invocation_path(&self) -> PathBuf {
        self.0.clone()
    }
}

/// Looks the probe up on `PATH`.
pub struct SearchPath;

impl ResolveProbe for SearchPath {
    fn invocation_path(&self) -> PathBuf {
        // An unresolved bare name still lets spawn report the missing tool.
        which::which(PROBE_EXECUTABLE).unwrap_or_else(|_| PathBuf::from(PROBE_EXECUTABLE))
    }
}

/// A probe embedded in a bundle under `binaries/<platform>/`.
pub struct Bundled {
    pub root: PathBuf,
}

impl Bundled {
    pub fn platform_dir() -> &'static str {
        if cfg!(windows) {
            "win"
        } else if cfg!(target_os = "macos") {
            "mac"
        } else {
            ""
        }
    }

    pub fn executable_in(root: &Path) -> PathBuf {
        let dir = root.join("binaries");
        let dir = match Self::platform_dir() {
            "" => dir,
            platform => dir.join(platform),
        };
        dir.join(PROBE_EXECUTABLE)
    }
}

impl ResolveProbe for Bundled {
    fn invocation_path(&self) -> PathBuf {
        let path = Self::executable_in(&self.root);
        if let Err(err) = ensure_executable(&path) {
            warn!(path = %path.display(), "could not mark bundled probe executable: {err}");
        }
        path
    }

    fn is_bundled(&self) -> bool {
        true
    }
}

#[cfg(unix)]
fn ensure_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        // Nothing to fix; invoking it will surface the missing tool.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if meta.permissions().mode() & 0o111 == 0 {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Picks a resolver: explicit path, then bundle dir, then a bundle next to the
/// running executable, then `PATH`.
pub fn detect(explicit: Option<PathBuf>, bundle_dir: Option<PathBuf>) -> Box<dyn ResolveProbe> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using configured probe");
        return Box::new(Fixed(path));
    }
    if let Some(root) = bundle_dir {
        debug!(root = %root.display(), "using bundled probe");
        return Box::new(Bundled { root });
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .filter(|root| Bundled::executable_in(root).is_file());
    if let Some(root) = beside_exe {
        debug!(root = %root.display(), "found probe bundled next to executable");
        return Box::new(Bundled { root });
    }
    Box::new(SearchPath)
}

/// Returns a warning when the probe cannot be located up front.
///
/// Bundled probes are trusted; a missing bundled copy only shows up when a
/// file is actually probed.
pub fn startup_check(resolver: &dyn ResolveProbe) -> Option<String> {
    if resolver.is_bundled() {
        return None;
    }
    let path = resolver.invocation_path();
    let found = if path.components().count() > 1 {
        path.is_file()
    } else {
        which::which(&path).is_ok()
    };
    if found {
        None
    } else {
        Some(format!(
            "{} not found. Extraction will fail unless it becomes available.",
            path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let resolver = detect(
            Some(PathBuf::from("/opt/ff/ffprobe")),
            Some(PathBuf::from("/bundle")),
        );
        assert_eq!(resolver.invocation_path(), PathBuf::from("/opt/ff/ffprobe"));
        assert!(!resolver.is_bundled());
    }

    #[test]
    fn bundle_dir_layout() {
        let resolver = detect(None, Some(PathBuf::from("/bundle")));
        assert!(resolver.is_bundled());
        let expected = Bundled::executable_in(Path::new("/bundle"));
        assert!(expected.starts_with("/bundle/binaries"));
        assert!(expected.ends_with(PROBE_EXECUTABLE));
        assert_eq!(resolver.invocation_path(), expected);
    }

    #[test]
    fn missing_fixed_probe_warns() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Fixed(dir.path().join("ffprobe"));
        let warning = startup_check(&resolver).expect("warning");
        assert!(warning.contains("not found"));
    }

    #[test]
    fn bundled_probe_never_warns() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Bundled {
            root: dir.path().to_path_buf(),
        };
        assert_eq!(startup_check(&resolver), None);
    }

    #[cfg(unix)]
    #[test]
    fn bundled_probe_is_made_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = Bundled::executable_in(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let resolver = Bundled {
            root: dir.path().to_path_buf(),
        };
        assert_eq!(resolver.invocation_path(), path);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

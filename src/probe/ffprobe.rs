use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::probe::{MediaProbe, ProbeError};
use crate::resolver::ResolveProbe;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const PROBE_ARGS: [&str; 5] = ["-v", "quiet", "-print_format", "json", "-show_format"];

/// Runs the external `ffprobe` executable, one invocation at a time.
pub struct Ffprobe {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Ffprobe {
    pub fn new(program: PathBuf, timeout: Option<Duration>) -> Self {
        Self { program, timeout }
    }

    pub fn from_resolver(resolver: &dyn ResolveProbe, timeout: Option<Duration>) -> Self {
        Self::new(resolver.invocation_path(), timeout)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(PROBE_ARGS);
        cmd.arg(path);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    fn spawn(&self, path: &Path) -> Result<Child, ProbeError> {
        let program = self.program.to_string_lossy();
        let target = path.to_string_lossy();
        let line = shell_words::join(
            std::iter::once(&*program)
                .chain(PROBE_ARGS)
                .chain(std::iter::once(&*target)),
        );
        debug!(command = %line, "spawning probe");
        self.command(path).spawn().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                ProbeError::ToolMissing(self.program.clone())
            }
            _ => ProbeError::Io(err),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join(handle: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>, ProbeError> {
    handle
        .join()
        .map_err(|_| ProbeError::Output("probe output reader panicked".to_string()))?
        .map_err(ProbeError::Io)
}

impl MediaProbe for Ffprobe {
    fn format_json(&self, path: &Path) -> Result<String, ProbeError> {
        let mut child = self.spawn(path)?;

        let Some(timeout) = self.timeout else {
            let output = child.wait_with_output()?;
            if !output.status.success() {
                return Err(ProbeError::failed(output.status, &output.stderr));
            }
            return String::from_utf8(output.stdout)
                .map_err(|e| ProbeError::Output(e.to_string()));
        };

        // Pipes are drained on their own threads so a chatty child never blocks on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::Io(err));
                }
                Ok(None) if start.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::TimedOut(timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
            }
        };

        let stdout = join(stdout)?;
        let stderr = join(stderr)?;
        if !status.success() {
            return Err(ProbeError::failed(status, &stderr));
        }
        String::from_utf8(stdout).map_err(|e| ProbeError::Output(e.to_string()))
    }
}

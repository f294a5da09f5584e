use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::probe::{MediaProbe, ProbeError};

pub enum Canned {
    Duration(f64),
    Json(String),
    Fail(String),
    Missing,
}

/// Serves canned responses keyed by file name and records every call.
pub struct MockProbe {
    responses: HashMap<String, Canned>,
    fallback: Option<f64>,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every file not explicitly configured reports this duration.
    pub fn with_default(mut self, seconds: f64) -> Self {
        self.fallback = Some(seconds);
        self
    }

    pub fn respond(mut self, file_name: &str, canned: Canned) -> Self {
        self.responses.insert(file_name.to_string(), canned);
        self
    }

    pub fn called_names(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}

fn duration_json(seconds: f64) -> String {
    format!(r#"{{"format": {{"duration": "{seconds:.6}"}}}}"#)
}

impl MediaProbe for MockProbe {
    fn format_json(&self, path: &Path) -> Result<String, ProbeError> {
        self.calls.borrow_mut().push(path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match (self.responses.get(&name), self.fallback) {
            (Some(Canned::Duration(seconds)), _) => Ok(duration_json(*seconds)),
            (Some(Canned::Json(json)), _) => Ok(json.clone()),
            (Some(Canned::Fail(stderr)), _) => Err(ProbeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
            (Some(Canned::Missing), _) => Err(ProbeError::ToolMissing(PathBuf::from("ffprobe"))),
            (None, Some(seconds)) => Ok(duration_json(seconds)),
            (None, None) => Err(ProbeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: format!("{name}: Invalid data found when processing input"),
            }),
        }
    }
}

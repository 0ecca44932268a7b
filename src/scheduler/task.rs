use crate::extractor::{EngineKind, OutputMode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-run settings shared read-only by every task of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionConfig {
    pub engine_kind: EngineKind,
    pub engine_executable_path: PathBuf,
    pub output_mode: OutputMode,
    pub custom_output_path: Option<PathBuf>,
    pub delete_source_on_success: bool,
    pub max_workers: usize,
}

/// One archive scheduled for extraction.
#[derive(Debug, Clone)]
pub struct Task {
    archive_path: PathBuf,
    config: Arc<ExtractionConfig>,
}

impl Task {
    pub fn new(archive_path: PathBuf, config: Arc<ExtractionConfig>) -> Self {
        Self {
            archive_path,
            config,
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn file_name(&self) -> String {
        self.archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.archive_path.display().to_string())
    }
}

use crate::error::{Result, UnpackError};
use crate::extractor::destination::{ensure_destination, resolve_destination};
use crate::scheduler::task::ExtractionConfig;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, MAIN_SEPARATOR_STR};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// External command-line extractors the scheduler knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    #[value(name = "winrar")]
    WinRar,
    #[value(name = "bandizip")]
    Bandizip,
}

impl EngineKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            EngineKind::WinRar => "WinRAR",
            EngineKind::Bandizip => "Bandizip",
        }
    }

    /// Argument vector for an "extract everything, overwrite, no prompts"
    /// run. Both engines follow multi-volume sets from the primary volume.
    pub fn build_args(&self, archive: &Path, destination: &Path, password: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["x".into(), "-y".into()];

        match self {
            EngineKind::WinRar => {
                // WinRAR treats a trailing separator as "destination folder"
                let mut dest = destination.as_os_str().to_os_string();
                if !dest.to_string_lossy().ends_with(MAIN_SEPARATOR_STR) {
                    dest.push(MAIN_SEPARATOR_STR);
                }

                args.push("-ibck".into());
                args.push(archive.as_os_str().to_os_string());
                args.push(dest);
                if password.is_empty() {
                    args.push("-p-".into());
                } else {
                    args.push(format!("-p{}", password).into());
                }
            }
            EngineKind::Bandizip => {
                let mut dest = OsString::from("-o:");
                dest.push(destination.as_os_str());

                args.push(dest);
                args.push(archive.as_os_str().to_os_string());
                if !password.is_empty() {
                    args.push(format!("-p:{}", password).into());
                }
            }
        }

        args
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One extraction attempt against one archive with one password.
///
/// Returns `Ok(true)` when the archive was extracted, `Ok(false)` when the
/// attempt ran and failed (wrong password, corrupt data), and `Err` when the
/// attempt could not be made at all.
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    async fn attempt(&self, archive: &Path, config: &ExtractionConfig, password: &str) -> Result<bool>;
}

/// Runs the configured external engine as a hidden subprocess.
#[derive(Debug, Clone, Default)]
pub struct ExtractionJob;

impl ExtractionJob {
    pub fn new() -> Self {
        Self
    }

    fn build_command(&self, archive: &Path, destination: &Path, config: &ExtractionConfig, password: &str) -> Command {
        let mut command = Command::new(&config.engine_executable_path);
        command
            .args(config.engine_kind.build_args(archive, destination, password))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }
}

#[async_trait]
impl ArchiveExtractor for ExtractionJob {
    async fn attempt(&self, archive: &Path, config: &ExtractionConfig, password: &str) -> Result<bool> {
        let destination = resolve_destination(
            archive,
            config.output_mode,
            config.custom_output_path.as_deref(),
        );
        ensure_destination(&destination);

        let output = self
            .build_command(archive, &destination, config, password)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => UnpackError::EngineNotFound {
                    path: config.engine_executable_path.display().to_string(),
                },
                _ => UnpackError::Spawn {
                    engine: config.engine_executable_path.display().to_string(),
                    message: e.to_string(),
                },
            })?;

        if output.status.success() {
            return Ok(true);
        }

        debug!(
            "{} exited with {} for {}: {}",
            config.engine_kind,
            output.status,
            archive.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(false)
    }
}

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// Where extracted files land relative to the archive or a custom root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Extract next to the archive
    #[default]
    CurrentFlat,
    /// Extract into a new folder next to the archive, named after it
    CurrentSmart,
    /// Extract straight into the custom output directory
    CustomDirect,
    /// Extract into a per-archive folder under the custom output directory
    CustomSmart,
}

impl OutputMode {
    pub fn uses_custom_root(&self) -> bool {
        matches!(self, OutputMode::CustomDirect | OutputMode::CustomSmart)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::CurrentFlat => "current-flat",
            OutputMode::CurrentSmart => "current-smart",
            OutputMode::CustomDirect => "custom-direct",
            OutputMode::CustomSmart => "custom-smart",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn part_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\.part\d+$").expect("valid part suffix pattern"))
}

/// Folder name for an archive with its volume-specific suffixes removed:
/// `a.tar.gz` -> `a`, `a.part1.rar` -> `a`, `a.7z.001` -> `a`,
/// `a.zip.001` -> `a.zip`, `a.rar` -> `a`.
pub fn archive_base_name(filename: &str) -> String {
    let lower = filename.to_lowercase();

    if lower.ends_with(".tar.gz") {
        return filename[..filename.len() - ".tar.gz".len()].to_string();
    }

    let stem = strip_extension(filename);

    if lower.ends_with(".rar") && lower.contains(".part") {
        return part_suffix_pattern().replace(stem, "").into_owned();
    }

    if lower.ends_with(".001") {
        if stem.to_lowercase().ends_with(".7z") {
            return stem[..stem.len() - ".7z".len()].to_string();
        }
        return stem.to_string();
    }

    stem.to_string()
}

/// Drops the last extension. Leading dots do not start an extension, so
/// `.hidden` stays as-is.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if filename[..index].chars().any(|c| c != '.') => &filename[..index],
        _ => filename,
    }
}

/// Computes the output directory for `archive` under `mode`. A custom root
/// that is `None` or empty falls back to the archive's own directory.
pub fn resolve_destination(archive: &Path, mode: OutputMode, custom_root: Option<&Path>) -> PathBuf {
    let archive_dir = match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let custom_root = custom_root.filter(|root| !root.as_os_str().is_empty());
    let base_name = || {
        let filename = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        archive_base_name(&filename)
    };

    match (mode, custom_root) {
        (OutputMode::CurrentFlat, _) => archive_dir,
        (OutputMode::CurrentSmart, _) => archive_dir.join(base_name()),
        (OutputMode::CustomDirect, Some(root)) => root.to_path_buf(),
        (OutputMode::CustomSmart, Some(root)) => root.join(base_name()),
        (OutputMode::CustomDirect | OutputMode::CustomSmart, None) => archive_dir,
    }
}

/// Creates `destination` if it is missing. Failure is logged and otherwise
/// ignored: the extraction attempt that follows fails on its own and is
/// counted per archive.
pub fn ensure_destination(destination: &Path) -> bool {
    if destination.is_dir() {
        return true;
    }

    match fs::create_dir_all(destination) {
        Ok(()) => true,
        Err(e) => {
            warn!("could not create {}: {}", destination.display(), e);
            false
        }
    }
}

use crate::error::{Result, UnpackError};
use crate::scanner::volume::{has_archive_extension, is_primary_volume, DEFAULT_ARCHIVE_EXTENSIONS};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl ArchiveFile {
    pub fn new(path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            relative_path,
            filename,
            size,
        }
    }
}

/// Result of one discovery walk, in walk order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub archives: Vec<ArchiveFile>,
    pub skipped_volumes: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl ScanResult {
    pub fn display_summary(&self) -> String {
        let total_size: u64 = self.archives.iter().map(|a| a.size).sum();
        let mut summary = format!(
            "Scan Results:\n  Primary archives: {}\n  Total size: {}\n  Secondary volumes skipped: {}\n",
            self.archives.len(),
            format_bytes(total_size),
            self.skipped_volumes.len()
        );

        if !self.errors.is_empty() {
            summary.push_str(&format!("  Unreadable entries: {}\n", self.errors.len()));
        }

        summary
    }
}

pub struct ArchiveScanner {
    extensions: Vec<String>,
}

impl ArchiveScanner {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Walks `root` recursively and keeps every primary volume with a known
    /// archive extension. Entries are visited in file-name order so that
    /// repeated runs dispatch in the same sequence.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanResult> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(UnpackError::SourceNotFound {
                path: root_path.display().to_string(),
            });
        }

        let mut result = ScanResult::default();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    result.errors.push(format!("Scan error: {}", err));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                result
                    .errors
                    .push(format!("Skipping non UTF-8 file name: {}", entry.path().display()));
                continue;
            };

            if !has_archive_extension(name, &self.extensions) {
                continue;
            }

            if !is_primary_volume(name) {
                result.skipped_volumes.push(entry.path().to_path_buf());
                continue;
            }

            result.archives.push(self.to_archive_file(&entry, root_path));
        }

        Ok(result)
    }

    fn to_archive_file(&self, entry: &DirEntry, root_path: &Path) -> ArchiveFile {
        let path = entry.path().to_path_buf();
        let relative_path = path
            .strip_prefix(root_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        ArchiveFile::new(path, relative_path, size)
    }
}

impl Default for ArchiveScanner {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_EXTENSIONS)
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

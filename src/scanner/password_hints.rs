//! Best-effort discovery of archive passwords from sidecar text files.
//!
//! Release folders often ship a `readme.txt` or `.nfo` that mentions the
//! password ("密码: abc", "pass: abc", or just the bare password on a line).

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_HINT_EXTENSIONS: &[&str] = &["txt", "nfo"];

const BRACKET_CHARS: &[char] = &[' ', '[', ']', '【', '】'];
const TRAILING_PUNCTUATION: &[char] = &['。', '，', '.'];

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:密码|pass|pwd|code|解压)[^:：\s]*[:：]\s*([^\s\x{4e00}-\x{9fa5}]+)")
            .expect("valid password hint pattern")
    })
}

pub struct PasswordHintScanner {
    extensions: Vec<String>,
}

impl PasswordHintScanner {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Collects candidates from every hint file under `root`. Unreadable
    /// files and walk errors are skipped.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> HashSet<String> {
        let mut candidates = HashSet::new();

        for entry in WalkDir::new(root.as_ref()).follow_links(false) {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() || !self.is_hint_file(entry.path()) {
                continue;
            }

            match read_hint_file(entry.path()) {
                Some(text) => candidates.extend(parse_hint_text(&text)),
                None => debug!("skipping undecodable hint file {}", entry.path().display()),
            }
        }

        candidates
    }

    pub fn is_hint_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }
}

impl Default for PasswordHintScanner {
    fn default() -> Self {
        Self::new(DEFAULT_HINT_EXTENSIONS)
    }
}

/// Reads a hint file as UTF-8, falling back to GBK. Returns `None` when
/// neither decoding is clean or the file cannot be read.
pub fn read_hint_file(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    decode_hint_bytes(&bytes)
}

pub fn decode_hint_bytes(bytes: &[u8]) -> Option<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.trim_start_matches('\u{feff}').to_string()),
        Err(_) => encoding_rs::GBK
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned()),
    }
}

/// Extracts password candidates from the text of one hint file.
///
/// Two independent rules run on each non-blank line, so one line can yield
/// two different candidates:
/// - a keyword rule (`密码`, `pass`, `pwd`, `code`, `解压` followed by a colon)
///   captures the token after the separator;
/// - a raw-line rule keeps the whole line, minus surrounding brackets, when it
///   is between 4 and 49 characters long and contains no `http`.
pub fn parse_hint_text(text: &str) -> HashSet<String> {
    let mut candidates = HashSet::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(captures) = keyword_pattern().captures(line) {
            let token = captures[1].trim().trim_end_matches(TRAILING_PUNCTUATION);
            if !token.is_empty() {
                candidates.insert(token.to_string());
            }
        }

        let clean_line = line.trim_matches(BRACKET_CHARS);
        let length = clean_line.chars().count();
        if length > 3 && length < 50 && !clean_line.to_lowercase().contains("http") {
            candidates.insert(clean_line.to_string());
        }
    }

    candidates
}

use regex::Regex;
use std::sync::OnceLock;

/// Extensions picked up during discovery when no override is configured.
pub const DEFAULT_ARCHIVE_EXTENSIONS: &[&str] = &["rar", "zip", "7z", "tar", "gz", "001"];

fn part_rar_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.part(\d+)\.rar$").expect("valid part volume pattern"))
}

fn old_style_split_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.[zr]\d+$").expect("valid split volume pattern"))
}

fn numbered_volume_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(\d{3})$").expect("valid numbered volume pattern"))
}

/// Decides whether `filename` is the volume an extraction tool should be
/// pointed at. Secondary parts of a multi-volume set return `false`; the
/// engine reaches them through the primary volume.
pub fn is_primary_volume(filename: &str) -> bool {
    let name = filename.to_lowercase();

    // name.partN.rar: only part 1 (including zero-padded forms like part01)
    if let Some(captures) = part_rar_pattern().captures(&name) {
        return captures[1]
            .parse::<u64>()
            .map(|part| part == 1)
            .unwrap_or(false);
    }

    // .z01 / .r00 continuation volumes; the .zip / .rar sibling is the primary
    if old_style_split_pattern().is_match(&name) {
        return false;
    }

    // name.7z.001, name.zip.002, ...
    if let Some(captures) = numbered_volume_pattern().captures(&name) {
        return &captures[1] == "001";
    }

    true
}

/// Case-insensitive suffix match against a list of bare extensions.
pub fn has_archive_extension<S: AsRef<str>>(filename: &str, extensions: &[S]) -> bool {
    let name = filename.to_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.as_ref().trim_start_matches('.').to_lowercase();
        !ext.is_empty() && name.ends_with(&format!(".{}", ext))
    })
}

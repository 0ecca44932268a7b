pub mod archive_scanner;
pub mod password_hints;
pub mod volume;

pub use archive_scanner::{ArchiveFile, ArchiveScanner, ScanResult};
pub use password_hints::{parse_hint_text, PasswordHintScanner};
pub use volume::{has_archive_extension, is_primary_volume};

pub mod destination;
pub mod job;

pub use destination::{archive_base_name, ensure_destination, resolve_destination, OutputMode};
pub use job::{ArchiveExtractor, EngineKind, ExtractionJob};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnpackError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: String },

    #[error("Extraction engine not found: {path}")]
    EngineNotFound { path: String },

    #[error("Failed to launch extraction engine {engine}: {message}")]
    Spawn { engine: String, message: String },

    #[error("No archives found under {path}")]
    NoArchivesFound { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for UnpackError {
    fn user_message(&self) -> String {
        match self {
            UnpackError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            UnpackError::SourceNotFound { path } => {
                format!("Source directory does not exist: {}", path)
            }
            UnpackError::EngineNotFound { path } => {
                format!("Extraction engine executable not found: {}", path)
            }
            UnpackError::Spawn { engine, message } => {
                format!("Could not start {}: {}", engine, message)
            }
            UnpackError::NoArchivesFound { path } => {
                format!("No primary archive volumes found under {}", path)
            }
            UnpackError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            UnpackError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            UnpackError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            UnpackError::SourceNotFound { .. } => Some(
                "Pass an existing directory as SOURCE; it is searched recursively for archives.".to_string()
            ),
            UnpackError::EngineNotFound { .. } | UnpackError::Spawn { .. } => Some(
                "Point --engine-path (or engine.winrar_path / engine.bandizip_path in the config) at the installed executable.".to_string()
            ),
            UnpackError::NoArchivesFound { .. } => Some(
                "Only .rar, .zip, .7z, .tar, .gz and .001 files are picked up; secondary volumes such as .part2.rar or .z01 are skipped.".to_string()
            ),
            UnpackError::InvalidPath { .. } => Some(
                "The custom output path must be a directory (it is created if missing).".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for UnpackError {
    fn from(error: toml::de::Error) -> Self {
        UnpackError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnpackError>;

use crate::error::{Result, UnpackError};
use crate::extractor::{EngineKind, OutputMode};
use crate::scanner::password_hints::DEFAULT_HINT_EXTENSIONS;
use crate::scanner::volume::DEFAULT_ARCHIVE_EXTENSIONS;
use crate::scheduler::ExtractionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub winrar_path: PathBuf,
    pub bandizip_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub custom_path: Option<PathBuf>,
    pub delete_source: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub max_workers: usize,
    pub archive_extensions: Vec<String>,
    pub hint_extensions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::WinRar,
            winrar_path: PathBuf::from(r"C:\Program Files\WinRAR\WinRAR.exe"),
            bandizip_path: PathBuf::from(r"C:\Program Files\Bandizip\Bandizip.exe"),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            archive_extensions: DEFAULT_ARCHIVE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            hint_extensions: DEFAULT_HINT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Executable for the selected engine kind.
    pub fn executable(&self) -> &Path {
        match self.kind {
            EngineKind::WinRar => &self.winrar_path,
            EngineKind::Bandizip => &self.bandizip_path,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UnpackError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| UnpackError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["autounpack.toml", ".autounpack.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(kind) = cli_args.engine {
            self.engine.kind = kind;
        }

        // An explicit executable applies to whichever engine ends up selected
        if let Some(ref engine_path) = cli_args.engine_path {
            match self.engine.kind {
                EngineKind::WinRar => self.engine.winrar_path = engine_path.clone(),
                EngineKind::Bandizip => self.engine.bandizip_path = engine_path.clone(),
            }
        }

        if let Some(mode) = cli_args.mode {
            self.output.mode = mode;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.custom_path = Some(output_dir.clone());
        }

        if cli_args.delete_source {
            self.output.delete_source = true;
        }

        if let Some(workers) = cli_args.max_workers {
            self.run.max_workers = workers;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| UnpackError::Config {
                message: format!("Failed to serialize config: {}", e),
            })?;

        std::fs::write(path, content)
            .map_err(|e| UnpackError::Config {
                message: format!("Failed to write config file {}: {}", path.display(), e),
            })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.run.max_workers == 0 {
            return Err(UnpackError::Config {
                message: "max_workers must be at least 1".to_string(),
            });
        }

        if self.run.archive_extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(UnpackError::Config {
                message: "At least one archive extension must be specified".to_string(),
            });
        }

        if self.output.mode.uses_custom_root() {
            if let Some(ref custom) = self.output.custom_path {
                if custom.exists() && !custom.is_dir() {
                    return Err(UnpackError::InvalidPath {
                        path: custom.display().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn engine_path(&self) -> &Path {
        self.engine.executable()
    }

    /// Read-only settings for one run.
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            engine_kind: self.engine.kind,
            engine_executable_path: self.engine.executable().to_path_buf(),
            output_mode: self.output.mode,
            custom_output_path: self
                .output
                .custom_path
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            delete_source_on_success: self.output.delete_source,
            max_workers: self.run.max_workers,
        }
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.output.custom_path = Some(PathBuf::from(r"D:\Extracted"));
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub engine: Option<EngineKind>,
    pub engine_path: Option<PathBuf>,
    pub mode: Option<OutputMode>,
    pub output_dir: Option<PathBuf>,
    pub delete_source: bool,
    pub max_workers: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: Option<EngineKind>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_engine_path(mut self, engine_path: Option<PathBuf>) -> Self {
        self.engine_path = engine_path;
        self
    }

    pub fn with_mode(mut self, mode: Option<OutputMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.max_workers = max_workers;
        self
    }
}

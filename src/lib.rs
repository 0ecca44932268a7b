pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod scheduler;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, EngineConfig, OutputConfig, RunConfig};
pub use error::{Result, UnpackError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{ArchiveExtractor, EngineKind, ExtractionJob, OutputMode};
pub use scanner::{ArchiveFile, ArchiveScanner, PasswordHintScanner, ScanResult};
pub use scheduler::{
    ExtractionConfig, JobScheduler, LogLevel, RunHandle, RunObserver, RunOutcome, RunPhase,
    RunRequest, RunStatistics,
};
pub use ui::{ConsoleObserver, DisplayMode, GracefulShutdown, OutputFormatter, ProgressManager};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a run would do, without starting any extraction.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunPlan {
    pub source: PathBuf,
    pub archives: Vec<PlannedArchive>,
    pub skipped_volumes: usize,
    /// Candidates in the order each archive would try them.
    pub passwords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedArchive {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

/// Main library interface: a configured scheduler wired to the console.
pub struct AutoUnpack {
    config: Config,
    output_formatter: Arc<OutputFormatter>,
    progress_manager: Arc<ProgressManager>,
    scheduler: JobScheduler,
    shutdown: GracefulShutdown,
    interactive: bool,
}

impl AutoUnpack {
    /// Create an instance and install the Ctrl+C handler
    pub fn new(config: Config, display_mode: DisplayMode, verbose: u8, quiet: bool) -> Result<Self> {
        let (output_formatter, progress_manager, scheduler) =
            Self::build_parts(&config, display_mode, verbose, quiet);
        let shutdown = GracefulShutdown::new(scheduler.handle())?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            scheduler,
            shutdown,
            interactive: display_mode == DisplayMode::Human && !quiet,
        })
    }

    /// Create an instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, display_mode: DisplayMode, verbose: u8, quiet: bool) -> Self {
        let (output_formatter, progress_manager, scheduler) =
            Self::build_parts(&config, display_mode, verbose, quiet);
        let shutdown = GracefulShutdown::new_for_test(Some(scheduler.handle()));

        Self {
            config,
            output_formatter,
            progress_manager,
            scheduler,
            shutdown,
            interactive: false,
        }
    }

    fn build_parts(
        config: &Config,
        display_mode: DisplayMode,
        verbose: u8,
        quiet: bool,
    ) -> (Arc<OutputFormatter>, Arc<ProgressManager>, JobScheduler) {
        let output_formatter = Arc::new(OutputFormatter::new(display_mode, verbose, quiet));
        // The bar would interleave with one-object-per-line JSON output
        let progress_manager = Arc::new(ProgressManager::new(
            !quiet && display_mode == DisplayMode::Human,
        ));

        let observer = Arc::new(ConsoleObserver::new(
            output_formatter.clone(),
            progress_manager.clone(),
        ));
        let scheduler = JobScheduler::new(observer)
            .with_archive_extensions(config.run.archive_extensions.clone())
            .with_hint_extensions(config.run.hint_extensions.clone());

        (output_formatter, progress_manager, scheduler)
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let display_mode = match cli_args.output_format {
            OutputFormat::Human => DisplayMode::Human,
            OutputFormat::Json => DisplayMode::Json,
            OutputFormat::Plain => DisplayMode::Plain,
        };

        Self::new(config, display_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Extract every primary archive under `source`, trying `passwords`
    /// (space separated) or, when blank, passwords found in hint files.
    pub async fn extract_all(&self, source: &Path, passwords: &str) -> Result<RunOutcome> {
        self.shutdown.check_shutdown()?;

        if !source.is_dir() {
            return Err(UnpackError::SourceNotFound {
                path: source.display().to_string(),
            });
        }

        let engine_path = self.config.engine_path();
        if !engine_path.exists() {
            self.output_formatter.warning(&format!(
                "{} not found at {}; every archive will fail until the path is fixed",
                self.config.engine.kind,
                engine_path.display()
            ));
        }

        self.output_formatter
            .start_operation(&format!("Extracting archives under {}", source.display()));
        let listener = if self.interactive {
            self.output_formatter
                .info("Type p + Enter to pause, r to resume, q to stop");
            ui::spawn_control_listener(self.scheduler.handle())
        } else {
            None
        };

        let outcome = self
            .scheduler
            .run(RunRequest {
                source_dir: source.to_path_buf(),
                manual_passwords: passwords.to_string(),
                config: self.config.extraction_config(),
            })
            .await;

        if let Some(listener) = listener {
            listener.abort();
        }

        if outcome.stats.total == 0 && !outcome.aborted {
            return Err(UnpackError::NoArchivesFound {
                path: source.display().to_string(),
            });
        }

        self.output_formatter.print_run_summary(&outcome);
        Ok(outcome)
    }

    /// Discovery only: what would be extracted, where, and with which
    /// passwords.
    pub async fn dry_run(&self, source: &Path, passwords: &str) -> Result<DryRunPlan> {
        let spinner = self.progress_manager.create_spinner("Scanning...");
        let discovery = self.scheduler.discover(source, passwords).await;
        spinner.finish_and_clear();
        let discovery = discovery?;
        self.output_formatter.debug(&discovery.scan.display_summary());

        let extraction = self.config.extraction_config();
        let archives: Vec<PlannedArchive> = discovery
            .scan
            .archives
            .iter()
            .map(|archive| PlannedArchive {
                archive: archive.path.clone(),
                destination: extractor::resolve_destination(
                    &archive.path,
                    extraction.output_mode,
                    extraction.custom_output_path.as_deref(),
                ),
            })
            .collect();

        if archives.is_empty() {
            return Err(UnpackError::NoArchivesFound {
                path: source.display().to_string(),
            });
        }

        Ok(DryRunPlan {
            source: source.to_path_buf(),
            archives,
            skipped_volumes: discovery.scan.skipped_volumes.len(),
            passwords: discovery.passwords.snapshot(),
        })
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Pause/resume/stop handle for the run driven by this instance
    pub fn handle(&self) -> RunHandle {
        self.scheduler.handle()
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &UnpackError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Process exit status for a finished run.
pub fn exit_code_for_outcome(outcome: &RunOutcome) -> i32 {
    if outcome.aborted {
        130
    } else if outcome.stats.fail > 0 {
        2
    } else {
        0
    }
}

/// Process exit status for an error that ended the program.
pub fn exit_code_for_error(error: &UnpackError) -> i32 {
    match error {
        UnpackError::Cancelled => 130,
        UnpackError::Config { .. } => 2,
        UnpackError::SourceNotFound { .. } => 3,
        UnpackError::EngineNotFound { .. } => 4,
        UnpackError::NoArchivesFound { .. } => 6,
        _ => 1,
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

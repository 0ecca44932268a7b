use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::extractor::{EngineKind, OutputMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autounpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batch-extract every archive under a directory")]
#[command(
    long_about = "autounpack walks a directory tree, picks out the primary volume of every \
                  archive set, and extracts them in parallel with WinRAR or Bandizip, trying \
                  the given passwords and any found in nearby .txt/.nfo files."
)]
#[command(before_help = "📦 autounpack - batch archive extraction")]
#[command(after_help = "EXAMPLES:\n  \
    autounpack D:\\Downloads\n  \
    autounpack D:\\Downloads --password \"pw1 pw2\" --mode current-smart\n  \
    autounpack D:\\Downloads --mode custom-smart --output E:\\Extracted --workers 8\n  \
    autounpack D:\\Downloads --engine bandizip --delete-source\n  \
    autounpack --generate-config\n\n\
    While running, type p + Enter to pause, r to resume, q to stop.")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory to search for archives
    #[arg(required_unless_present = "generate_config")]
    pub source: Option<PathBuf>,

    /// Passwords to try, separated by spaces
    #[arg(short, long, env = "AUTOUNPACK_PASSWORDS", hide_env_values = true)]
    pub password: Option<String>,

    /// Where extracted files go
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Output root for the custom-* modes
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extraction engine
    #[arg(short, long, value_enum)]
    pub engine: Option<EngineKind>,

    /// Path to the engine executable
    #[arg(long)]
    pub engine_path: Option<PathBuf>,

    /// Maximum number of archives extracted at once
    #[arg(short, long, value_parser = parse_worker_count)]
    pub workers: Option<usize>,

    /// Delete the primary volume after a successful extraction
    #[arg(long)]
    pub delete_source: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (list archives and passwords without extracting)
    #[arg(long, help = "Show what would be extracted without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_engine(self.engine)
            .with_engine_path(self.engine_path.clone())
            .with_mode(self.mode)
            .with_output_dir(self.output.clone())
            .with_delete_source(self.delete_source)
            .with_max_workers(self.workers)
    }

    pub fn manual_passwords(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_worker_count(s: &str) -> std::result::Result<usize, String> {
    let count: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid worker count: {}", s))?;

    if count == 0 {
        return Err("Worker count must be at least 1".to_string());
    }

    Ok(count)
}

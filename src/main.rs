use autounpack::{
    exit_code_for_error, exit_code_for_outcome, AutoUnpack, Cli, DisplayMode, OutputFormatter,
    UnpackError, UserFriendlyError,
};
use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbosity_level()) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(source) = cli.source.as_deref() else {
        eprintln!("A source directory is required");
        return 2;
    };

    let app = match AutoUnpack::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for_error(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app, source, cli.manual_passwords()).await;
    }

    match app.extract_all(source, cli.manual_passwords()).await {
        Ok(outcome) => exit_code_for_outcome(&outcome),
        Err(e) => {
            app.handle_error(&e);
            exit_code_for_error(&e)
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let default_directive = if verbosity >= 2 {
        "autounpack=debug"
    } else {
        "autounpack=warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "autounpack.toml".to_string());

    match AutoUnpack::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  autounpack <source-dir> --config {}", config_path);
            println!("\nEdit the engine paths to match your installation.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

async fn handle_dry_run(app: &AutoUnpack, source: &Path, passwords: &str) -> i32 {
    let formatter = app.output_formatter();

    formatter.info("DRY RUN MODE - nothing will be extracted");
    formatter.debug(&format!(
        "Engine: {} ({})",
        app.config().engine.kind,
        app.config().engine_path().display()
    ));
    formatter.debug(&format!(
        "Output mode: {}, workers: {}",
        app.config().output.mode,
        app.config().run.max_workers
    ));

    match app.dry_run(source, passwords).await {
        Ok(plan) => {
            formatter.print_dry_run(&plan);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code_for_error(&e)
        }
    }
}

fn print_startup_error(error: &UnpackError) {
    let formatter = OutputFormatter::new(DisplayMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

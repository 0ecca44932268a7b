use crate::error::{UnpackError, UserFriendlyError};
use crate::scheduler::{LogLevel, RunOutcome};
use crate::DryRunPlan;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    Human,
    Json,
    Plain,
}

impl DisplayMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => DisplayMode::Json,
            "plain" => DisplayMode::Plain,
            _ => DisplayMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PACKAGE: Emoji = Emoji("📦 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");
static STOP: Emoji = Emoji("🛑 ", "x ");

pub struct OutputFormatter {
    mode: DisplayMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: DisplayMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            DisplayMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                DisplayMode::Human => self.print_human_message(MessageType::Success, message),
                DisplayMode::Json => self.print_json_message("success", message),
                DisplayMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) {
        match self.mode {
            DisplayMode::Human => self.print_human_message(MessageType::Error, message),
            DisplayMode::Json => self.print_json_message("error", message),
            DisplayMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                DisplayMode::Human => self.print_human_message(MessageType::Warning, message),
                DisplayMode::Json => self.print_json_message("warning", message),
                DisplayMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                DisplayMode::Human => self.print_human_message(MessageType::Info, message),
                DisplayMode::Json => self.print_json_message("info", message),
                DisplayMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                DisplayMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                DisplayMode::Json => self.print_json_message("debug", message),
                DisplayMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    /// Routes a scheduler log line to the matching message style.
    pub fn log(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Info => self.info(message),
            LogLevel::Success => self.success(message),
            LogLevel::Warn => self.warning(message),
            LogLevel::Error => self.error(message),
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                DisplayMode::Human => {
                    if self.use_colors {
                        println!("{}{}", PACKAGE, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                DisplayMode::Json => self.print_json_message("operation_start", operation),
                DisplayMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &UnpackError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                DisplayMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                DisplayMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                DisplayMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Final tally. JSON mode always prints it, so scripted callers get a
    /// result even with `--quiet`.
    pub fn print_run_summary(&self, outcome: &RunOutcome) {
        match self.mode {
            DisplayMode::Json => self.print_json_summary(outcome),
            _ if self.quiet => {}
            DisplayMode::Human => self.print_human_summary(outcome),
            DisplayMode::Plain => self.print_plain_summary(outcome),
        }
    }

    pub fn print_dry_run(&self, plan: &DryRunPlan) {
        match self.mode {
            DisplayMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            DisplayMode::Human => self.print_human_plan(plan),
            DisplayMode::Plain => self.print_plain_plan(plan),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            DisplayMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            DisplayMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            DisplayMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            DisplayMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            DisplayMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            DisplayMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn highlight(&self, value: impl ToString) -> String {
        if self.use_colors {
            style(value.to_string()).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn print_human_summary(&self, outcome: &RunOutcome) {
        let stats = &outcome.stats;
        println!();
        self.print_separator();

        let headline = if outcome.aborted {
            "Extraction stopped"
        } else if stats.fail > 0 {
            "Extraction finished with failures"
        } else {
            "Extraction completed!"
        };

        if self.use_colors {
            let (emoji, styled) = if outcome.aborted {
                (STOP, style(headline).red().bold())
            } else if stats.fail > 0 {
                (WARNING, style(headline).yellow().bold())
            } else {
                (CHECKMARK, style(headline).green().bold())
            };
            println!("{}{}", emoji, styled);
        } else {
            println!("{}", headline);
        }

        println!();
        println!("  Succeeded:  {}", self.highlight(stats.success));
        println!("  Failed:     {}", self.highlight(stats.fail));
        if stats.not_started() > 0 {
            println!("  Not started: {}", self.highlight(stats.not_started()));
        }
        println!("  Total:      {}", self.highlight(stats.total));
        println!("  Time taken: {}", self.highlight(format_duration(outcome.elapsed)));

        self.print_separator();
    }

    fn print_json_summary(&self, outcome: &RunOutcome) {
        let summary = serde_json::json!({
            "type": "summary",
            "success": outcome.stats.success,
            "fail": outcome.stats.fail,
            "not_started": outcome.stats.not_started(),
            "total": outcome.stats.total,
            "aborted": outcome.aborted,
            "duration_ms": outcome.elapsed.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        println!(
            "{}",
            serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_plain_summary(&self, outcome: &RunOutcome) {
        let stats = &outcome.stats;
        if outcome.aborted {
            println!("STOPPED: Extraction");
        } else {
            println!("COMPLETED: Extraction");
        }
        println!("Succeeded: {}", stats.success);
        println!("Failed: {}", stats.fail);
        println!("Not started: {}", stats.not_started());
        println!("Total: {}", stats.total);
        println!("Duration: {}", format_duration(outcome.elapsed));
    }

    fn print_human_plan(&self, plan: &DryRunPlan) {
        self.print_header("Dry run");

        if plan.archives.is_empty() {
            println!("No primary archives found under {}", plan.source.display());
        } else {
            println!("Archives ({}):", plan.archives.len());
            for entry in &plan.archives {
                println!("  {} -> {}", entry.archive.display(), entry.destination.display());
            }
        }

        if plan.skipped_volumes > 0 {
            println!();
            println!("Secondary volumes skipped: {}", plan.skipped_volumes);
        }

        println!();
        if plan.passwords.is_empty() {
            println!("Passwords: none (archives are opened without a password)");
        } else {
            println!("Passwords, in the order they are tried:");
            for password in &plan.passwords {
                println!("  {}", password);
            }
        }
    }

    fn print_plain_plan(&self, plan: &DryRunPlan) {
        println!("DRY RUN: {}", plan.source.display());
        for entry in &plan.archives {
            println!("ARCHIVE: {} -> {}", entry.archive.display(), entry.destination.display());
        }
        println!("SKIPPED VOLUMES: {}", plan.skipped_volumes);
        for password in &plan.passwords {
            println!("PASSWORD: {}", password);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

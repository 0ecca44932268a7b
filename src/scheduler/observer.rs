use crate::scheduler::stats::RunStatistics;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Port through which a run reports to whatever drives it.
///
/// Implementations are called from worker tasks concurrently and must not
/// block for long.
pub trait RunObserver: Send + Sync {
    fn on_log(&self, message: &str, level: LogLevel);

    /// Dispatched fraction in `[0, 1]`, reported once per dispatched task.
    fn on_progress(&self, fraction: f64);

    /// Called exactly once when the run ends.
    fn on_finish(&self, stats: &RunStatistics, aborted: bool);
}

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_log(&self, _message: &str, _level: LogLevel) {}
    fn on_progress(&self, _fraction: f64) {}
    fn on_finish(&self, _stats: &RunStatistics, _aborted: bool) {}
}

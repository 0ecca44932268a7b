use crate::scheduler::{LogLevel, RunObserver, RunStatistics};
use crate::ui::output::OutputFormatter;
use crate::ui::progress::{update_run_progress, ProgressManager};
use indicatif::ProgressBar;
use std::sync::{Arc, Mutex, PoisonError};

const PROGRESS_STEPS: u64 = 100;

/// Renders scheduler events on the terminal: log lines through the
/// [`OutputFormatter`], progress on an indicatif bar that is created on the
/// first progress event and suspended while a line is printed.
pub struct ConsoleObserver {
    formatter: Arc<OutputFormatter>,
    progress: Arc<ProgressManager>,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new(formatter: Arc<OutputFormatter>, progress: Arc<ProgressManager>) -> Self {
        Self {
            formatter,
            progress,
            bar: Mutex::new(None),
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_log(&self, message: &str, level: LogLevel) {
        self.progress.suspend(|| self.formatter.log(message, level));
    }

    fn on_progress(&self, fraction: f64) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        let pb = bar.get_or_insert_with(|| self.progress.create_run_progress(PROGRESS_STEPS));
        update_run_progress(pb, fraction);
    }

    fn on_finish(&self, stats: &RunStatistics, aborted: bool) {
        let bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(pb) = bar {
            let message = format!("{} of {} extracted", stats.success, stats.total);
            if aborted {
                pb.abandon_with_message(format!("stopped, {}", message));
            } else {
                pb.finish_with_message(message);
            }
        }
        self.progress.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::output::DisplayMode;

    fn observer() -> ConsoleObserver {
        ConsoleObserver::new(
            Arc::new(OutputFormatter::new(DisplayMode::Plain, 0, true)),
            Arc::new(ProgressManager::new(false)),
        )
    }

    #[test]
    fn test_bar_created_on_first_progress() {
        let observer = observer();
        assert!(observer.bar.lock().unwrap().is_none());

        observer.on_progress(0.5);
        observer.on_progress(1.0);
        assert!(observer.bar.lock().unwrap().is_some());

        observer.on_finish(&RunStatistics::default(), false);
        assert!(observer.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_finish_without_progress() {
        let observer = observer();
        observer.on_log("quiet", LogLevel::Info);
        observer.on_finish(&RunStatistics::default(), true);
        assert!(observer.bar.lock().unwrap().is_none());
    }
}

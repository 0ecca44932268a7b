use crate::error::{Result, UnpackError};
use crate::scheduler::RunHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit status used when the user forces termination with a second Ctrl+C.
pub const FORCE_EXIT_CODE: i32 = 130;

/// Turns Ctrl+C into a cooperative stop of the active run.
///
/// The first press asks the scheduler to stop dispatching; running
/// extractions finish on their own. A second press exits immediately.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
    handle: Option<RunHandle>,
}

impl GracefulShutdown {
    pub fn new(handle: RunHandle) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown_message_shown = Arc::new(AtomicBool::new(false));

        let running_clone = running.clone();
        let message_shown_clone = shutdown_message_shown.clone();
        let handle_clone = handle.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            if !message_shown_clone.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Gracefully stopping... (press Ctrl+C again to force exit)");
                handle_clone.stop();
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(FORCE_EXIT_CODE);
            }
        })
        .map_err(|e| UnpackError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            running,
            shutdown_message_shown,
            handle: Some(handle),
        })
    }

    /// Create a GracefulShutdown instance for testing (no signal handler registration)
    pub fn new_for_test(handle: Option<RunHandle>) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
            handle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(UnpackError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(ref handle) = self.handle {
            handle.stop();
        }
    }

    pub fn reset(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.shutdown_message_shown.store(false, Ordering::SeqCst);
    }
}

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    StopRequested,
}

/// Shared pause/resume/stop flag for one run.
///
/// Dispatch points call [`wait_until_runnable`](Self::wait_until_runnable),
/// which parks while the state is `Paused`. Nothing in flight is ever
/// interrupted. A stop is sticky until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct RunControl {
    state: Arc<watch::Sender<RunState>>,
}

impl RunControl {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RunState::Running);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn is_paused(&self) -> bool {
        self.state() == RunState::Paused
    }

    pub fn is_stop_requested(&self) -> bool {
        self.state() == RunState::StopRequested
    }

    /// Returns `true` if the run was running and is now paused.
    pub fn pause(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == RunState::Running {
                *state = RunState::Paused;
                true
            } else {
                false
            }
        })
    }

    /// Returns `true` if the run was paused and is now running again.
    pub fn resume(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == RunState::Paused {
                *state = RunState::Running;
                true
            } else {
                false
            }
        })
    }

    /// Requests a stop and releases anything parked on the pause gate.
    /// Returns `false` if a stop was already requested.
    pub fn stop(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == RunState::StopRequested {
                false
            } else {
                *state = RunState::StopRequested;
                true
            }
        })
    }

    pub fn reset(&self) {
        self.state.send_replace(RunState::Running);
    }

    /// Parks while paused, then reports the state that released the gate:
    /// `Running` or `StopRequested`.
    pub async fn wait_until_runnable(&self) -> RunState {
        let mut receiver = self.state.subscribe();
        receiver
            .wait_for(|state| *state != RunState::Paused)
            .await
            .map(|state| *state)
            .unwrap_or(RunState::StopRequested)
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

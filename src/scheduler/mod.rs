pub mod control;
pub mod job_scheduler;
pub mod observer;
pub mod password_pool;
pub mod pool;
pub mod stats;
pub mod task;

pub use control::{RunControl, RunState};
pub use job_scheduler::{Discovery, JobScheduler, RunHandle, RunOutcome, RunPhase, RunRequest};
pub use observer::{LogLevel, NullObserver, RunObserver};
pub use password_pool::PasswordPool;
pub use pool::{WorkerPool, WorkerSlot};
pub use stats::{RunStatistics, StatsCounter};
pub use task::{ExtractionConfig, Task};

//! Discovery, dispatch and bookkeeping for one batch extraction run.
//!
//! A run moves through `Idle -> Discovering -> Running <-> Paused ->
//! Completed | Aborted`. Discovery walks the source tree for primary
//! volumes and builds the password pool; dispatch then feeds tasks, in
//! discovery order, into a bounded [`WorkerPool`]. Each worker tries the
//! pool's passwords in order until one works.

use crate::error::{Result, UnpackError};
use crate::extractor::{ArchiveExtractor, ExtractionJob};
use crate::scanner::volume::DEFAULT_ARCHIVE_EXTENSIONS;
use crate::scanner::password_hints::DEFAULT_HINT_EXTENSIONS;
use crate::scanner::{ArchiveScanner, PasswordHintScanner, ScanResult};
use crate::scheduler::control::{RunControl, RunState};
use crate::scheduler::observer::{LogLevel, RunObserver};
use crate::scheduler::password_pool::PasswordPool;
use crate::scheduler::pool::WorkerPool;
use crate::scheduler::stats::{RunStatistics, StatsCounter};
use crate::scheduler::task::{ExtractionConfig, Task};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Discovering,
    Running,
    Paused,
    Completed,
    Aborted,
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source_dir: PathBuf,
    /// Space-separated passwords. When non-empty, hint files are not scanned.
    pub manual_passwords: String,
    pub config: ExtractionConfig,
}

/// What discovery found, before anything is dispatched.
#[derive(Debug)]
pub struct Discovery {
    pub scan: ScanResult,
    pub passwords: PasswordPool,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stats: RunStatistics,
    pub aborted: bool,
    pub phase: RunPhase,
    /// Pool order at the end of the run.
    pub passwords: Vec<String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskOutcome {
    Succeeded,
    Failed,
}

/// Cloneable control surface for a running scheduler. Every transition is
/// reported through the observer.
#[derive(Clone)]
pub struct RunHandle {
    control: RunControl,
    observer: Arc<dyn RunObserver>,
}

impl RunHandle {
    pub fn pause(&self) -> bool {
        let changed = self.control.pause();
        if changed {
            self.observer.on_log("Paused; running extractions will finish", LogLevel::Warn);
        }
        changed
    }

    pub fn resume(&self) -> bool {
        let changed = self.control.resume();
        if changed {
            self.observer.on_log("Resumed", LogLevel::Info);
        }
        changed
    }

    pub fn stop(&self) -> bool {
        let changed = self.control.stop();
        if changed {
            self.observer.on_log("Stopping; waiting for running extractions", LogLevel::Error);
        }
        changed
    }

    pub fn state(&self) -> RunState {
        self.control.state()
    }
}

/// State shared by the dispatch loop and every worker of a run.
struct WorkerContext<E> {
    extractor: Arc<E>,
    observer: Arc<dyn RunObserver>,
    control: RunControl,
    passwords: PasswordPool,
    stats: Arc<StatsCounter>,
}

pub struct JobScheduler<E: ArchiveExtractor + 'static = ExtractionJob> {
    extractor: Arc<E>,
    observer: Arc<dyn RunObserver>,
    control: RunControl,
    phase: Arc<Mutex<RunPhase>>,
    archive_extensions: Vec<String>,
    hint_extensions: Vec<String>,
}

impl JobScheduler<ExtractionJob> {
    pub fn new(observer: Arc<dyn RunObserver>) -> Self {
        Self::with_extractor(ExtractionJob::new(), observer)
    }
}

impl<E: ArchiveExtractor + 'static> JobScheduler<E> {
    pub fn with_extractor(extractor: E, observer: Arc<dyn RunObserver>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            observer,
            control: RunControl::new(),
            phase: Arc::new(Mutex::new(RunPhase::Idle)),
            archive_extensions: to_owned_list(DEFAULT_ARCHIVE_EXTENSIONS),
            hint_extensions: to_owned_list(DEFAULT_HINT_EXTENSIONS),
        }
    }

    pub fn with_archive_extensions(mut self, extensions: Vec<String>) -> Self {
        self.archive_extensions = extensions;
        self
    }

    pub fn with_hint_extensions(mut self, extensions: Vec<String>) -> Self {
        self.hint_extensions = extensions;
        self
    }

    pub fn handle(&self) -> RunHandle {
        RunHandle {
            control: self.control.clone(),
            observer: self.observer.clone(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        let phase = *self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if phase == RunPhase::Running && self.control.is_paused() {
            RunPhase::Paused
        } else {
            phase
        }
    }

    fn set_phase(&self, phase: RunPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Finds the primary volumes under `source_dir` and builds the password
    /// pool. Hint files are only read when `manual_passwords` is blank.
    pub async fn discover(&self, source_dir: &Path, manual_passwords: &str) -> Result<Discovery> {
        if !source_dir.is_dir() {
            return Err(UnpackError::SourceNotFound {
                path: source_dir.display().to_string(),
            });
        }

        let manual = PasswordPool::parse_manual(manual_passwords);
        let hints = if manual_passwords.is_empty() {
            self.observer.on_log("Scanning text files for password hints...", LogLevel::Info);
            let scanner = PasswordHintScanner::new(&self.hint_extensions);
            let root = source_dir.to_path_buf();
            task::spawn_blocking(move || scanner.scan(root))
                .await
                .unwrap_or_else(|e| {
                    warn!("password hint scan failed: {}", e);
                    HashSet::new()
                })
        } else {
            HashSet::new()
        };
        let passwords = PasswordPool::from_sources(&manual, hints);
        debug!("password pool holds {} candidates", passwords.len());

        self.observer.on_log("Scanning for archives...", LogLevel::Info);
        let scanner = ArchiveScanner::new(&self.archive_extensions);
        let root = source_dir.to_path_buf();
        let scan = task::spawn_blocking(move || scanner.scan_directory(root))
            .await
            .map_err(|e| UnpackError::Io(std::io::Error::other(e.to_string())))??;

        for error in &scan.errors {
            debug!("{}", error);
        }

        Ok(Discovery { scan, passwords })
    }

    /// Runs one batch to completion (or until stopped). Never returns an
    /// error: every failure is reported through the observer and the
    /// statistics, and `on_finish` fires exactly once.
    pub async fn run(&self, request: RunRequest) -> RunOutcome {
        let started = Instant::now();
        self.control.reset();
        self.set_phase(RunPhase::Discovering);

        let discovery = match self.discover(&request.source_dir, &request.manual_passwords).await {
            Ok(discovery) => discovery,
            Err(e) => {
                self.observer.on_log(&e.to_string(), LogLevel::Error);
                return self.finish(RunStatistics::default(), true, Vec::new(), started);
            }
        };

        let config = Arc::new(request.config);
        let tasks: Vec<Task> = discovery
            .scan
            .archives
            .into_iter()
            .map(|archive| Task::new(archive.path, config.clone()))
            .collect();

        let stats = Arc::new(StatsCounter::new());
        stats.set_total(tasks.len());

        if tasks.is_empty() {
            self.observer.on_log("No archives found to extract", LogLevel::Warn);
            let aborted = self.control.is_stop_requested();
            return self.finish(stats.snapshot(), aborted, discovery.passwords.snapshot(), started);
        }

        self.observer.on_log(
            &format!("Found {} primary archives, starting extraction", tasks.len()),
            LogLevel::Info,
        );
        self.set_phase(RunPhase::Running);

        let context = Arc::new(WorkerContext {
            extractor: self.extractor.clone(),
            observer: self.observer.clone(),
            control: self.control.clone(),
            passwords: discovery.passwords,
            stats: stats.clone(),
        });

        let total = tasks.len();
        let mut pool = WorkerPool::new(config.max_workers);

        for (index, task) in tasks.into_iter().enumerate() {
            if self.control.is_stop_requested() {
                break;
            }
            if self.control.wait_until_runnable().await == RunState::StopRequested {
                break;
            }

            let slot = pool.acquire().await;
            if self.control.is_stop_requested() {
                break;
            }

            let context = context.clone();
            pool.spawn(slot, async move {
                match run_task(&context, &task).await {
                    TaskOutcome::Succeeded => context.stats.record_success(),
                    TaskOutcome::Failed => context.stats.record_failure(),
                }
            });

            self.observer.on_progress((index + 1) as f64 / total as f64);
        }

        let panicked = pool.join_all().await;
        for _ in 0..panicked {
            stats.record_failure();
        }

        let aborted = self.control.is_stop_requested();
        self.finish(stats.snapshot(), aborted, context.passwords.snapshot(), started)
    }

    fn finish(&self, stats: RunStatistics, aborted: bool, passwords: Vec<String>, started: Instant) -> RunOutcome {
        let phase = if aborted {
            RunPhase::Aborted
        } else {
            RunPhase::Completed
        };
        self.set_phase(phase);
        self.observer.on_finish(&stats, aborted);

        RunOutcome {
            stats,
            aborted,
            phase,
            passwords,
            elapsed: started.elapsed(),
        }
    }
}

/// Worker body: waits at the pause gate, then tries the pool's passwords in
/// order. A dispatched task always ends as a success or a failure; a stop
/// seen by the worker fails the task without further attempts.
async fn run_task<E: ArchiveExtractor>(context: &WorkerContext<E>, task: &Task) -> TaskOutcome {
    let name = task.file_name();

    if context.control.wait_until_runnable().await == RunState::StopRequested {
        context
            .observer
            .on_log(&format!("Stopped before starting: {}", name), LogLevel::Error);
        return TaskOutcome::Failed;
    }

    let candidates = context.passwords.candidates();

    for (attempt, password) in candidates.iter().enumerate() {
        if context.control.is_stop_requested() {
            debug!("stop requested after {} attempt(s) for {}", attempt, name);
            context
                .observer
                .on_log(&format!("Stopped before finishing: {}", name), LogLevel::Error);
            return TaskOutcome::Failed;
        }

        match context
            .extractor
            .attempt(task.archive_path(), task.config(), password)
            .await
        {
            Ok(true) => {
                if context.passwords.promote(password) {
                    debug!("moved winning password for {} to the front of the pool", name);
                }
                context.observer.on_log(&format!("Extracted: {}", name), LogLevel::Success);

                if task.config().delete_source_on_success {
                    delete_source(task.archive_path()).await;
                }
                return TaskOutcome::Succeeded;
            }
            Ok(false) => {
                debug!("attempt {} of {} failed for {}", attempt + 1, candidates.len(), name);
            }
            Err(e) => {
                context
                    .observer
                    .on_log(&format!("Failed: {} ({})", name, e), LogLevel::Error);
                return TaskOutcome::Failed;
            }
        }
    }

    context.observer.on_log(&format!("Failed: {}", name), LogLevel::Error);
    TaskOutcome::Failed
}

/// Removes only the primary volume; sibling parts are left in place.
async fn delete_source(archive: &Path) {
    if let Err(e) = tokio::fs::remove_file(archive).await {
        warn!("could not delete {}: {}", archive.display(), e);
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{EngineKind, OutputMode};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingObserver {
        logs: Mutex<Vec<(String, LogLevel)>>,
        progress: Mutex<Vec<f64>>,
        finished: Mutex<Vec<(RunStatistics, bool)>>,
    }

    impl RecordingObserver {
        fn logs_at(&self, level: LogLevel) -> Vec<String> {
            self.logs
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, l)| *l == level)
                .map(|(m, _)| m.clone())
                .collect()
        }
    }

    impl RunObserver for RecordingObserver {
        fn on_log(&self, message: &str, level: LogLevel) {
            self.logs.lock().unwrap().push((message.to_string(), level));
        }

        fn on_progress(&self, fraction: f64) {
            self.progress.lock().unwrap().push(fraction);
        }

        fn on_finish(&self, stats: &RunStatistics, aborted: bool) {
            self.finished.lock().unwrap().push((*stats, aborted));
        }
    }

    /// Test double: an archive is "encrypted" with the password mapped to its
    /// file name. Unknown names are unencrypted and open with any password.
    #[derive(Default)]
    struct FakeExtractor {
        passwords: HashMap<String, String>,
        attempts: Mutex<Vec<(String, String)>>,
        started: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FakeExtractor {
        fn with_password(mut self, archive: &str, password: &str) -> Self {
            self.passwords.insert(archive.to_string(), password.to_string());
            self
        }

        fn attempts_for(&self, archive: &str) -> Vec<String> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .filter(|(a, _)| a == archive)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ArchiveExtractor for FakeExtractor {
        async fn attempt(&self, archive: &Path, _config: &ExtractionConfig, password: &str) -> Result<bool> {
            let name = archive.file_name().unwrap().to_string_lossy().into_owned();
            self.started.fetch_add(1, Ordering::SeqCst);
            self.attempts.lock().unwrap().push((name.clone(), password.to_string()));

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            Ok(match self.passwords.get(&name) {
                Some(expected) => expected == password,
                None => true,
            })
        }
    }

    fn config(max_workers: usize) -> ExtractionConfig {
        ExtractionConfig {
            engine_kind: EngineKind::Bandizip,
            engine_executable_path: PathBuf::from("/unused"),
            output_mode: OutputMode::CurrentSmart,
            custom_output_path: None,
            delete_source_on_success: false,
            max_workers,
        }
    }

    fn request(source: &Path, manual: &str, config: ExtractionConfig) -> RunRequest {
        RunRequest {
            source_dir: source.to_path_buf(),
            manual_passwords: manual.to_string(),
            config,
        }
    }

    fn touch(path: &Path) {
        fs::write(path, b"data").unwrap();
    }

    #[tokio::test]
    async fn test_missing_source_aborts_with_zero_stats() {
        let temp_dir = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(FakeExtractor::default(), observer.clone());

        let outcome = scheduler
            .run(request(&temp_dir.path().join("missing"), "", config(2)))
            .await;

        assert!(outcome.aborted);
        assert_eq!(outcome.phase, RunPhase::Aborted);
        assert_eq!(outcome.stats, RunStatistics::default());
        assert_eq!(*observer.finished.lock().unwrap(), vec![(RunStatistics::default(), true)]);
    }

    #[tokio::test]
    async fn test_empty_source_completes() {
        let temp_dir = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(FakeExtractor::default(), observer.clone());

        let outcome = scheduler.run(request(temp_dir.path(), "", config(2))).await;

        assert!(!outcome.aborted);
        assert_eq!(scheduler.phase(), RunPhase::Completed);
        assert_eq!(outcome.stats.total, 0);
        assert_eq!(observer.logs_at(LogLevel::Warn).len(), 1);
        assert_eq!(observer.finished.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hint_password_unlocks_archive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a.zip"));
        touch(&root.join("b.rar"));
        fs::write(root.join("note.txt"), "密码: secret").unwrap();

        let extractor = FakeExtractor::default().with_password("b.rar", "secret");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(extractor, observer.clone());

        let outcome = scheduler.run(request(root, "", config(2))).await;

        assert_eq!(
            outcome.stats,
            RunStatistics {
                success: 2,
                fail: 0,
                total: 2
            }
        );
        assert!(!outcome.aborted);
        assert!(outcome.passwords.iter().any(|p| p == "secret"));
        assert_eq!(observer.logs_at(LogLevel::Success).len(), 2);
    }

    #[tokio::test]
    async fn test_manual_passwords_suppress_hint_scan() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.rar"));
        fs::write(root.join("note.txt"), "密码: secret").unwrap();

        let extractor = FakeExtractor::default().with_password("b.rar", "secret");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(extractor, observer.clone());

        let outcome = scheduler.run(request(root, "wrong1 wrong2", config(1))).await;

        assert_eq!(outcome.stats.fail, 1);
        assert_eq!(outcome.passwords, vec!["wrong1", "wrong2"]);
        assert_eq!(
            scheduler.extractor.attempts_for("b.rar"),
            vec!["wrong1", "wrong2"]
        );
    }

    #[tokio::test]
    async fn test_winning_password_is_promoted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a1.rar"));
        touch(&root.join("a2.rar"));

        let extractor = FakeExtractor::default()
            .with_password("a1.rar", "third")
            .with_password("a2.rar", "third");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(extractor, observer);

        let outcome = scheduler.run(request(root, "first second third", config(1))).await;

        assert_eq!(outcome.stats.success, 2);
        assert_eq!(outcome.passwords, vec!["third", "first", "second"]);
        // With one worker the second archive sees the rotated pool
        assert_eq!(
            scheduler.extractor.attempts_for("a1.rar"),
            vec!["first", "second", "third"]
        );
        assert_eq!(scheduler.extractor.attempts_for("a2.rar"), vec!["third"]);
    }

    #[tokio::test]
    async fn test_empty_pool_tries_without_password() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("plain.zip"));

        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(FakeExtractor::default(), observer);

        let outcome = scheduler.run(request(root, "", config(1))).await;
        assert_eq!(outcome.stats.success, 1);
        assert_eq!(scheduler.extractor.attempts_for("plain.zip"), vec![""]);
    }

    #[tokio::test]
    async fn test_secondary_volumes_are_not_dispatched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("m.part1.rar"));
        touch(&root.join("m.part2.rar"));
        touch(&root.join("d.7z.001"));
        touch(&root.join("d.7z.002"));

        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(FakeExtractor::default(), observer.clone());

        let outcome = scheduler.run(request(root, "", config(4))).await;
        assert_eq!(outcome.stats.total, 2);
        assert_eq!(outcome.stats.success, 2);
        assert_eq!(*observer.progress.lock().unwrap(), vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_delete_source_removes_primary_volume_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("m.part1.rar"));
        touch(&root.join("m.part2.rar"));
        touch(&root.join("locked.zip"));

        let extractor = FakeExtractor::default().with_password("locked.zip", "nope");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(extractor, observer);

        let mut cfg = config(2);
        cfg.delete_source_on_success = true;
        let outcome = scheduler.run(request(root, "", cfg)).await;

        assert_eq!(outcome.stats.success, 1);
        assert_eq!(outcome.stats.fail, 1);
        assert!(!root.join("m.part1.rar").exists());
        assert!(root.join("m.part2.rar").exists());
        assert!(root.join("locked.zip").exists(), "failed archives are kept");
    }

    #[tokio::test]
    async fn test_stop_halts_dispatch_and_counts_only_dispatched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..5 {
            touch(&root.join(format!("a{}.zip", i)));
        }

        let gate = Arc::new(Notify::new());
        let extractor = FakeExtractor {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = Arc::new(JobScheduler::with_extractor(extractor, observer.clone()));
        let handle = scheduler.handle();

        let runner = {
            let scheduler = scheduler.clone();
            let root = root.to_path_buf();
            tokio::spawn(async move { scheduler.run(request(&root, "", config(1))).await })
        };

        // Wait until the single worker is inside its first attempt
        while scheduler.extractor.started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.stop());
        gate.notify_one();

        let outcome = tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run finished")
            .unwrap();

        assert!(outcome.aborted);
        assert_eq!(outcome.phase, RunPhase::Aborted);
        assert_eq!(outcome.stats.total, 5);
        assert_eq!(outcome.stats.success, 1, "in-flight attempt completes");
        assert_eq!(outcome.stats.fail, 0);
        assert_eq!(outcome.stats.not_started(), 4);
        assert_eq!(scheduler.extractor.started.load(Ordering::SeqCst), 1);

        // The loop was waiting for the busy slot when the stop arrived
        let dispatched = observer.progress.lock().unwrap().len();
        assert_eq!(dispatched, 1);
        assert_eq!(outcome.stats.success + outcome.stats.fail, dispatched);
        assert_eq!(observer.finished.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_while_waiting_for_a_slot_dispatches_nothing_more() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..4 {
            touch(&root.join(format!("a{}.zip", i)));
        }

        let gate = Arc::new(Notify::new());
        let extractor = FakeExtractor {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = Arc::new(JobScheduler::with_extractor(extractor, observer.clone()));
        let handle = scheduler.handle();

        let runner = {
            let scheduler = scheduler.clone();
            let root = root.to_path_buf();
            tokio::spawn(async move { scheduler.run(request(&root, "", config(2))).await })
        };

        while scheduler.extractor.started.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.stop());

        while !runner.is_finished() {
            gate.notify_one();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let outcome = runner.await.unwrap();

        let dispatched = observer.progress.lock().unwrap().len();
        assert_eq!(dispatched, 2);
        assert_eq!(outcome.stats.success + outcome.stats.fail, dispatched);
        assert_eq!(outcome.stats.not_started(), 2);
        assert_eq!(scheduler.extractor.started.load(Ordering::SeqCst), 2);
        assert!(outcome.aborted);
    }

    #[tokio::test]
    async fn test_stop_between_attempts_fails_the_archive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("locked.rar"));

        let gate = Arc::new(Notify::new());
        let extractor = FakeExtractor {
            gate: Some(gate.clone()),
            ..Default::default()
        }
        .with_password("locked.rar", "p3");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = Arc::new(JobScheduler::with_extractor(extractor, observer.clone()));
        let handle = scheduler.handle();

        let runner = {
            let scheduler = scheduler.clone();
            let root = root.to_path_buf();
            tokio::spawn(async move { scheduler.run(request(&root, "p1 p2 p3", config(1))).await })
        };

        while scheduler.extractor.started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.stop());
        gate.notify_one();

        let outcome = tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run finished")
            .unwrap();

        assert_eq!(scheduler.extractor.attempts_for("locked.rar"), vec!["p1"]);
        assert_eq!(
            outcome.stats,
            RunStatistics {
                success: 0,
                fail: 1,
                total: 1
            }
        );
        assert!(outcome.aborted);
        assert!(observer
            .logs_at(LogLevel::Error)
            .iter()
            .any(|m| m == "Stopped before finishing: locked.rar"));
    }

    #[tokio::test]
    async fn test_blank_manual_passwords_still_suppress_hint_scan() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.rar"));
        fs::write(root.join("note.txt"), "密码: secret").unwrap();

        let extractor = FakeExtractor::default().with_password("b.rar", "secret");
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = JobScheduler::with_extractor(extractor, observer.clone());

        let outcome = scheduler.run(request(root, "   ", config(1))).await;

        assert!(outcome.passwords.is_empty());
        assert_eq!(scheduler.extractor.attempts_for("b.rar"), vec![""]);
        assert_eq!(outcome.stats.fail, 1);
        assert!(!observer
            .logs_at(LogLevel::Info)
            .iter()
            .any(|m| m.contains("password hints")));
    }

    #[tokio::test]
    async fn test_pause_holds_new_tasks_until_resume() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..3 {
            touch(&root.join(format!("a{}.zip", i)));
        }

        let gate = Arc::new(Notify::new());
        let extractor = FakeExtractor {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let observer = Arc::new(RecordingObserver::default());
        let scheduler = Arc::new(JobScheduler::with_extractor(extractor, observer.clone()));
        let handle = scheduler.handle();

        let runner = {
            let scheduler = scheduler.clone();
            let root = root.to_path_buf();
            tokio::spawn(async move { scheduler.run(request(&root, "", config(1))).await })
        };

        while scheduler.extractor.started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.pause());
        assert_eq!(scheduler.phase(), RunPhase::Paused);

        // The in-flight attempt is allowed to finish while paused
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.extractor.started.load(Ordering::SeqCst), 1);
        assert!(!runner.is_finished());

        assert!(handle.resume());
        for expected in 2..=3 {
            while scheduler.extractor.started.load(Ordering::SeqCst) < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            gate.notify_one();
        }

        let outcome = tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run finished")
            .unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.stats.success, 3);
        assert_eq!(observer.logs_at(LogLevel::Warn).len(), 1, "pause notice");
        assert!(observer
            .logs_at(LogLevel::Info)
            .iter()
            .any(|m| m == "Resumed"));
    }
}

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::error;

/// Capacity reserved for one worker.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: Option<OwnedSemaphorePermit>,
}

/// Bounded set of extraction workers.
///
/// At most `capacity` spawned futures run at once. The dispatch loop first
/// waits for a [`WorkerSlot`] and only then decides whether to spawn, so a
/// stop that arrives while it waits never starts another task.
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
    workers: JoinSet<()>,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            workers: JoinSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers currently holding a slot.
    pub fn active(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Waits for a free slot. Dropping the slot unused gives it back.
    pub async fn acquire(&self) -> WorkerSlot {
        // The semaphore is never closed, so this only fails if that changes
        WorkerSlot {
            _permit: self.permits.clone().acquire_owned().await.ok(),
        }
    }

    /// Runs `work` on `slot`. The slot is released when `work` completes.
    pub fn spawn<F>(&mut self, slot: WorkerSlot, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.workers.spawn(async move {
            let _slot = slot;
            work.await;
        });
    }

    /// Waits for every submitted worker. Returns how many of them panicked.
    pub async fn join_all(&mut self) -> usize {
        let mut panicked = 0;
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                error!("extraction worker ended abnormally: {}", e);
                panicked += 1;
            }
        }
        panicked
    }
}

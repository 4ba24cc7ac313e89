use log::{debug, error};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::error::StorageError;

/// Fixed-size pool for blocking units of work.
///
/// At most `size` units run at once; the rest wait for a permit. Each unit runs
/// on tokio's blocking thread set, so the pool requires a tokio runtime.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of units that could start right now without waiting
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `task` on a pooled worker and await its result
    pub async fn run<F, T>(&self, task: F) -> Result<T, StorageError>
    where
        F: FnOnce() -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| StorageError::Worker("worker pool is closed".into()))?;

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task()
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("Worker unit failed: {}", e);
                Err(StorageError::Worker(e.to_string()))
            }
        }
    }

    /// Stop accepting new units; queued callers receive `StorageError::Worker`
    pub fn close(&self) {
        debug!("Closing worker pool of size {}", self.size);
        self.permits.close();
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(4)
    }
}

//! Storage context
//!
//! The host backend and worker pool shared by every handle.

use log::info;
use std::sync::{Arc, OnceLock};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::storage::collision::CollisionPolicy;
use crate::storage::filesystem::{FileSystemHost, default_host};
use crate::worker::WorkerPool;

static SHARED: OnceLock<Arc<StorageContext>> = OnceLock::new();

#[derive(Debug)]
pub struct StorageContext {
    host: Arc<dyn FileSystemHost>,
    pool: WorkerPool,
    default_policy: CollisionPolicy,
}

impl StorageContext {
    pub fn new(config: &StorageConfig) -> Arc<Self> {
        Self::with_host(default_host(), config)
    }

    pub fn with_host(host: Arc<dyn FileSystemHost>, config: &StorageConfig) -> Arc<Self> {
        info!(
            "Storage context using {} backend with {} workers",
            host.backend_name(),
            config.worker_threads
        );
        Arc::new(Self {
            host,
            pool: WorkerPool::new(config.worker_threads),
            default_policy: config.default_collision_policy,
        })
    }

    /// Process-wide context with default configuration, used by the `from_path` factories
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Self::new(&StorageConfig::default())))
    }

    pub fn host(&self) -> &dyn FileSystemHost {
        self.host.as_ref()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn default_policy(&self) -> CollisionPolicy {
        self.default_policy
    }

    /// Run a blocking host call on the worker pool
    pub(crate) async fn run<F, T>(&self, task: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn FileSystemHost) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let host = Arc::clone(&self.host);
        self.pool.run(move || task(host.as_ref())).await
    }
}

//! Worker pool
//!
//! Runs blocking host calls on a bounded set of background threads so that
//! every storage operation can be awaited without stalling the caller's task.

mod pool;

pub use pool::WorkerPool;

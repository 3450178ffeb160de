//! Compute session
//!
//! Aggregation and mining run on a dedicated rayon pool owned by an
//! [`EngineSession`]. The session is the only scoped resource of a run: it
//! is started once and must be closed once all results have been collected
//! into local memory. `close` consumes the session, so a second close does
//! not compile.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Worker pool settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads; `None` uses one per logical CPU
    pub workers: Option<usize>,
}

/// A running compute session
pub struct EngineSession {
    pool: rayon::ThreadPool,
    started: Instant,
    closed: bool,
}

impl EngineSession {
    /// Start the worker pool
    pub fn start(config: &EngineConfig) -> PipelineResult<Self> {
        if config.workers == Some(0) {
            return Err(PipelineError::Config("engine.workers must be at least 1".into()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.unwrap_or(0))
            .thread_name(|i| format!("basketgraph-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::Session(e.to_string()))?;

        info!(workers = pool.current_num_threads(), "engine session started");
        Ok(EngineSession {
            pool,
            started: Instant::now(),
            closed: false,
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the pool; rayon work spawned by `op` uses these workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Tear down the pool and release its workers
    pub fn close(mut self) {
        self.closed = true;
        info!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "engine session closed"
        );
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("engine session dropped without close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_install_uses_session_workers() {
        let session = EngineSession::start(&EngineConfig { workers: Some(2) }).unwrap();
        assert_eq!(session.workers(), 2);

        let threads = session.install(rayon::current_num_threads);
        assert_eq!(threads, 2);

        let sum: u64 = session.install(|| (1..=100u64).into_par_iter().sum());
        assert_eq!(sum, 5050);

        session.close();
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = EngineSession::start(&EngineConfig { workers: Some(0) }).err().unwrap();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}

pub mod context;
pub mod modes;
pub mod task;
mod worker;

pub(crate) use worker::panic_message;

use std::sync::{atomic::Ordering, Arc};
use std::thread;

use tracing::debug;

use crate::errors::{ConfigurationError, PoolError};
use crate::metrics::MetricsCollector;
use crate::quadrature::ErrorEstimator;
use crate::stats::{PoolStatistics, WorkerStats};
use context::{Integrand, PoolContext};
use modes::{BreadthFirst, DepthFirst, SchedulingMode};
use task::Task;
use worker::{worker_loop, WorkerHandle};

/// Split depth cap used when the builder is not given one.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Where a pool is in its lifecycle, as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// No root task has been submitted yet.
    Idle,
    /// Tasks are waiting in the store.
    Running,
    /// The store is empty but workers are still processing tasks.
    Draining,
    /// The store is empty and no task is in flight.
    Completed,
    /// A fatal error stopped the run.
    Aborted,
    /// The stop flag is lowered and workers are exiting.
    ShuttingDown,
}

/// A fixed set of worker threads integrating one function over submitted intervals.
pub struct QuadraturePool<M: SchedulingMode = DepthFirst> {
    ctx: Arc<PoolContext<M>>,
    workers: Vec<WorkerHandle>,
    stats: Vec<Arc<WorkerStats>>,
}

impl QuadraturePool<DepthFirst> {
    /// Builds a depth-first pool with `num_workers` threads and default settings.
    pub fn new<F>(num_workers: usize, integrand: F) -> Result<Self, PoolError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        PoolBuilder::new().num_workers(num_workers).build(integrand)
    }
}

impl<M: SchedulingMode> QuadraturePool<M> {
    /// Enqueues the root task for `[a, b]` with global tolerance `tol`.
    ///
    /// Several roots may be submitted before waiting; their estimates add up.
    pub fn submit_root(&self, a: f64, b: f64, tol: f64) -> Result<(), PoolError> {
        let task = Task::root(a, b, tol)?;
        if let Some(failure) = self.ctx.store.failure() {
            return Err(failure);
        }
        debug!(a, b, tol, "submitting root task");
        self.ctx.submit(task);
        Ok(())
    }

    /// Blocks until no task is pending or in flight.
    ///
    /// Workers keep running afterwards, waiting for more work. If a worker
    /// aborted the run, its error is returned instead.
    pub fn wait_for_completion(&self) -> Result<(), PoolError> {
        self.ctx.store.wait_settled()
    }

    /// True when no task is pending and none is in flight.
    pub fn is_drained(&self) -> bool {
        self.ctx.store.is_drained()
    }

    /// The accumulated estimate. Only meaningful after `wait_for_completion`.
    ///
    /// An aborted run has no result: the error that stopped it is returned
    /// instead of the sum of whichever leaves finished.
    pub fn result(&self) -> Result<f64, PoolError> {
        match self.ctx.store.failure() {
            Some(failure) => Err(failure),
            None => Ok(self.ctx.total()),
        }
    }

    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics {
            workers: self
                .stats
                .iter()
                .enumerate()
                .map(|(id, stats)| stats.snapshot(id))
                .collect(),
        }
    }

    pub fn state(&self) -> PoolState {
        if !self.ctx.running.load(Ordering::Acquire) {
            return PoolState::ShuttingDown;
        }
        let snap = self.ctx.store.snapshot();
        if snap.aborted {
            PoolState::Aborted
        } else if snap.enqueued_total == 0 {
            PoolState::Idle
        } else if snap.pending > 0 {
            PoolState::Running
        } else if snap.active > 0 {
            PoolState::Draining
        } else {
            PoolState::Completed
        }
    }

    pub fn num_workers(&self) -> usize {
        self.stats.len()
    }

    pub fn mode(&self) -> &'static str {
        self.ctx.store.mode()
    }

    /// Stops and joins every worker, returning their final statistics.
    ///
    /// Call after `wait_for_completion`; tasks still pending are processed
    /// before the workers exit.
    pub fn shutdown(mut self) -> Result<PoolStatistics, PoolError> {
        self.stop_and_join()?;
        Ok(self.statistics())
    }

    fn stop_and_join(&mut self) -> Result<(), PoolError> {
        if self.workers.is_empty() {
            return Ok(());
        }
        self.ctx.running.store(false, Ordering::Release);
        self.ctx.store.wake_all();

        let mut first_error = None;
        for worker in &mut self.workers {
            if let Err(err) = worker.join() {
                first_error.get_or_insert(err);
            }
        }
        debug!(workers = self.workers.len(), "quadrature pool shut down");
        self.workers.clear();
        first_error.map_or(Ok(()), Err)
    }
}

impl<M: SchedulingMode> Drop for QuadraturePool<M> {
    fn drop(&mut self) {
        let _ = self.stop_and_join();
    }
}

/// Typed-state builder: the type parameter is the scheduling mode.
pub struct PoolBuilder<M = DepthFirst> {
    num_workers: usize,
    max_depth: u32,
    estimator: ErrorEstimator,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
    mode: M,
}

impl Default for PoolBuilder<DepthFirst> {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder<DepthFirst> {
    /// Starts from one worker per logical CPU, depth-first scheduling, the
    /// absolute error estimator and `DEFAULT_MAX_DEPTH`.
    pub fn new() -> Self {
        Self {
            num_workers: num_cpus::get(),
            max_depth: DEFAULT_MAX_DEPTH,
            estimator: ErrorEstimator::default(),
            metrics_collector: None,
            mode: DepthFirst,
        }
    }

    pub fn breadth_first(self) -> PoolBuilder<BreadthFirst> {
        PoolBuilder {
            num_workers: self.num_workers,
            max_depth: self.max_depth,
            estimator: self.estimator,
            metrics_collector: self.metrics_collector,
            mode: BreadthFirst,
        }
    }
}

impl<M: SchedulingMode> PoolBuilder<M> {
    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn error_estimator(mut self, estimator: ErrorEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    /// Validates the configuration and spawns the workers.
    pub fn build<F>(self, integrand: F) -> Result<QuadraturePool<M>, PoolError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        if self.num_workers == 0 {
            return Err(ConfigurationError::InvalidWorkerCount.into());
        }
        if self.max_depth == 0 {
            return Err(ConfigurationError::InvalidMaxDepth.into());
        }

        let integrand: Integrand = Arc::new(integrand);
        let ctx = Arc::new(PoolContext::new(
            self.mode,
            integrand,
            self.estimator,
            self.max_depth,
            self.metrics_collector,
        ));

        let mut pool = QuadraturePool {
            ctx,
            workers: Vec::with_capacity(self.num_workers),
            stats: Vec::with_capacity(self.num_workers),
        };

        for id in 0..self.num_workers {
            let stats = Arc::new(WorkerStats::new());
            let ctx = Arc::clone(&pool.ctx);
            let worker_stats = Arc::clone(&stats);
            // On failure `pool` is dropped, which joins the workers spawned so far.
            let handle = thread::Builder::new()
                .name(format!("quadpool-worker-{id}"))
                .spawn(move || worker_loop(id, ctx, worker_stats))
                .map_err(|err| PoolError::SpawnFailure {
                    worker: id,
                    message: err.to_string(),
                })?;
            pool.workers.push(WorkerHandle::new(id, handle));
            pool.stats.push(stats);
        }

        debug!(
            workers = self.num_workers,
            mode = pool.mode(),
            max_depth = self.max_depth,
            "quadrature pool started"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_is_rejected() {
        let err = QuadraturePool::new(0, |x| x).err().unwrap();
        assert_eq!(
            err,
            PoolError::Configuration(ConfigurationError::InvalidWorkerCount)
        );
    }

    #[test]
    fn zero_max_depth_is_rejected() {
        let err = PoolBuilder::new()
            .num_workers(1)
            .max_depth(0)
            .build(|x| x)
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn bad_root_is_rejected_before_enqueue() {
        let pool = QuadraturePool::new(2, |x| x).unwrap();
        assert!(pool.submit_root(1.0, 1.0, 1e-6).unwrap_err().is_configuration());
        assert!(pool.submit_root(3.0, 1.0, 1e-6).unwrap_err().is_configuration());
        assert!(pool.submit_root(0.0, 1.0, 0.0).unwrap_err().is_configuration());
        assert_eq!(pool.state(), PoolState::Idle);
        assert_eq!(pool.ctx.store.snapshot().enqueued_total, 0);
        pool.shutdown().unwrap();
    }

    #[test]
    fn state_moves_from_idle_to_completed() {
        let pool = QuadraturePool::new(2, |x| x * x).unwrap();
        assert_eq!(pool.state(), PoolState::Idle);
        pool.submit_root(0.0, 1.0, 1e-8).unwrap();
        pool.wait_for_completion().unwrap();
        assert!(pool.is_drained());
        assert_eq!(pool.state(), PoolState::Completed);
        assert!((pool.result().unwrap() - 1.0 / 3.0).abs() < 1e-12);
        pool.shutdown().unwrap();
    }

    #[test]
    fn builder_selects_mode() {
        let pool = PoolBuilder::new()
            .num_workers(1)
            .breadth_first()
            .build(|x| x)
            .unwrap();
        assert_eq!(pool.mode(), "BreadthFirst");
        assert_eq!(pool.num_workers(), 1);
        pool.shutdown().unwrap();
    }

    #[test]
    fn dropping_the_pool_joins_workers() {
        let pool = QuadraturePool::new(3, f64::sin).unwrap();
        pool.submit_root(0.0, 1.0, 1e-6).unwrap();
        pool.wait_for_completion().unwrap();
        drop(pool);
    }
}

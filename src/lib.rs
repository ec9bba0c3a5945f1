//! # quadpool
//!
//! `quadpool` integrates a real function with recursive adaptive quadrature on a
//! fixed pool of worker threads. Every subdivision step is a task value in a
//! shared store: a worker either resolves a task into a partial integral or
//! splits it into two children that any worker may pick up.
//!
//! ## Features
//! - Trapezoid/Simpson estimate pair with tolerance halving on every split.
//! - Race-free completion detection through an active-task counter.
//! - Depth-first or breadth-first scheduling, chosen at the type level.
//! - Per-worker statistics (evaluations, busy time) with mean/std-dev summaries.
//! - A split depth cap that reports unreachable tolerances instead of hanging.
//! - Pluggable metrics hooks.
//! - Sequential and statically partitioned baselines for comparison.
//!
//! ## Usage
//!
//! ### One-shot integration
//! ```rust
//! let run = quadpool::integrate(|x| x * x, 2.0, 10.0, 1e-7, 4).unwrap();
//! assert!((run.value - 992.0 / 3.0).abs() < 1e-5);
//! println!("mean evaluations per worker: {}", run.statistics.evaluations().mean);
//! ```
//!
//! ### Driving the pool yourself
//! ```rust
//! use quadpool::QuadraturePool;
//!
//! let pool = QuadraturePool::new(4, |x: f64| x.sqrt() * (1.0 - x).powi(2)).unwrap();
//! pool.submit_root(0.0, 1.0, 1e-6).unwrap();
//! pool.wait_for_completion().unwrap();
//!
//! let value = pool.result().unwrap();
//! assert!((value - 16.0 / 105.0).abs() < 1e-5);
//!
//! let stats = pool.shutdown().unwrap();
//! assert_eq!(stats.workers.len(), 4);
//! ```
//!
//! ### Configuring with the builder
//! ```rust
//! use quadpool::{ErrorEstimator, PoolBuilder};
//!
//! let pool = PoolBuilder::new()
//!     .num_workers(2)
//!     .breadth_first()
//!     .max_depth(40)
//!     .error_estimator(ErrorEstimator::Richardson)
//!     .build(f64::cos)
//!     .unwrap();
//!
//! pool.submit_root(0.0, std::f64::consts::FRAC_PI_2, 1e-9).unwrap();
//! pool.wait_for_completion().unwrap();
//! assert!((pool.result().unwrap() - 1.0).abs() < 1e-8);
//! pool.shutdown().unwrap();
//! ```
//!
//! ### Collecting Metrics
//! ```rust
//! use quadpool::{metrics::{AtomicMetricsCollector, QuadratureMetrics}, PoolBuilder};
//! use std::sync::{atomic::Ordering, Arc};
//!
//! let metrics = Arc::new(QuadratureMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let pool = PoolBuilder::new()
//!     .num_workers(2)
//!     .with_metrics_collector(collector)
//!     .build(|x| x * x * x)
//!     .unwrap();
//! pool.submit_root(0.0, 1.0, 1e-6).unwrap();
//! pool.wait_for_completion().unwrap();
//!
//! let enqueued = metrics.enqueued_tasks.load(Ordering::SeqCst);
//! let splits = metrics.split_tasks.load(Ordering::SeqCst);
//! assert_eq!(enqueued, 1 + 2 * splits);
//! pool.shutdown().unwrap();
//! ```

mod errors;
mod macros;
pub mod metrics;
pub mod partitioned;
pub mod pool;
mod quadrature;
pub mod sequential;
pub mod stats;
mod store;

pub use errors::{ConfigurationError, PoolError};
pub use pool::context::Integrand;
pub use pool::modes::{BreadthFirst, DepthFirst, SchedulingMode};
pub use pool::task::Task;
pub use pool::{PoolBuilder, PoolState, QuadraturePool, DEFAULT_MAX_DEPTH};
pub use quadrature::{ErrorEstimator, Estimate};
pub use stats::{PoolStatistics, Summary, WorkerStatistics};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

/// The outcome of a complete pooled integration.
#[derive(Debug, Clone)]
pub struct Integration {
    pub value: f64,
    pub statistics: PoolStatistics,
}

/// Integrates `f` over `[a, b]` on a fresh pool of `num_workers` threads.
///
/// Builds the pool, submits the root task, waits for completion, and tears the
/// pool down again. Nothing outlives the call.
pub fn integrate<F>(
    f: F,
    a: f64,
    b: f64,
    tol: f64,
    num_workers: usize,
) -> Result<Integration, PoolError>
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    let pool = QuadraturePool::new(num_workers, f)?;
    pool.submit_root(a, b, tol)?;
    pool.wait_for_completion()?;
    let value = pool.result()?;
    let statistics = pool.shutdown()?;
    Ok(Integration { value, statistics })
}

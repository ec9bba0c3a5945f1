//! # Macros for `quadpool`
//!
//! Shorthands for building pools and for logging their metrics.

/// Logs the current metrics of a pool as one `tracing` event at `INFO` level.
///
/// # Example
/// ```rust
/// use quadpool::{metrics::{AtomicMetricsCollector, QuadratureMetrics}, log_metrics, PoolBuilder};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(QuadratureMetrics::new());
/// let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
/// let pool = PoolBuilder::new()
///     .num_workers(2)
///     .with_metrics_collector(collector)
///     .build(f64::exp)
///     .unwrap();
///
/// log_metrics!(metrics);
/// pool.shutdown().unwrap();
/// ```
#[macro_export]
macro_rules! log_metrics {
    ($metrics:expr) => {
        $crate::__private::tracing::info!(
            enqueued = $metrics
                .enqueued_tasks
                .load(::std::sync::atomic::Ordering::SeqCst),
            running = $metrics
                .running_tasks
                .load(::std::sync::atomic::Ordering::SeqCst),
            leaves = $metrics
                .leaf_tasks
                .load(::std::sync::atomic::Ordering::SeqCst),
            splits = $metrics
                .split_tasks
                .load(::std::sync::atomic::Ordering::SeqCst),
            workers = $metrics
                .active_workers
                .load(::std::sync::atomic::Ordering::SeqCst),
            "quadrature pool metrics"
        )
    };
}

/// Builds a quadrature pool for an integrand.
///
/// # Examples
/// ```rust
/// use quadpool::quadrature_pool;
///
/// let pool = quadrature_pool!(workers: 4, integrand: |x: f64| x.sin()).unwrap();
/// pool.shutdown().unwrap();
///
/// let pool = quadrature_pool!(workers: 2, integrand: f64::exp, breadth_first: true).unwrap();
/// assert_eq!(pool.mode(), "BreadthFirst");
/// pool.shutdown().unwrap();
/// ```
#[macro_export]
macro_rules! quadrature_pool {
    (workers: $num:expr, integrand: $f:expr) => {
        $crate::PoolBuilder::new().num_workers($num).build($f)
    };
    (workers: $num:expr, integrand: $f:expr, breadth_first: true) => {
        $crate::PoolBuilder::new()
            .num_workers($num)
            .breadth_first()
            .build($f)
    };
    (workers: $num:expr, integrand: $f:expr, max_depth: $depth:expr) => {
        $crate::PoolBuilder::new()
            .num_workers($num)
            .max_depth($depth)
            .build($f)
    };
}

//! Metrics collection for the quadrature pool.
//!
//! This module defines the `MetricsCollector` trait for observing task and worker
//! lifecycle events, and a default implementation backed by atomic counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trait for collecting metrics from the quadrature pool.
///
/// Hooks are called from worker threads and from the driver, outside of any
/// pool lock, so implementations must be cheap and thread-safe.
pub trait MetricsCollector: Send + Sync {
    /// Called when a task becomes visible to workers (root or child).
    fn on_task_enqueued(&self);
    /// Called when a worker takes a task from the store.
    fn on_task_started(&self);
    /// Called when a task resolves into a leaf estimate.
    fn on_task_resolved(&self);
    /// Called when a task splits into two children.
    fn on_task_split(&self);
    /// Called when a worker thread starts.
    fn on_worker_started(&self);
    /// Called when a worker thread stops.
    fn on_worker_stopped(&self);
}

/// Stores metrics for the quadrature pool using atomic counters.
#[derive(Debug, Default)]
pub struct QuadratureMetrics {
    /// Total number of tasks ever enqueued.
    pub enqueued_tasks: AtomicUsize,
    /// Number of tasks currently being processed.
    pub running_tasks: AtomicUsize,
    /// Tasks resolved into a leaf estimate.
    pub leaf_tasks: AtomicUsize,
    /// Tasks split into two children.
    pub split_tasks: AtomicUsize,
    /// Number of worker threads currently alive.
    pub active_workers: AtomicUsize,
}

impl QuadratureMetrics {
    /// Creates a new `QuadratureMetrics` instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A default implementation of `MetricsCollector` using atomic counters.
pub struct AtomicMetricsCollector {
    /// Shared metrics storage.
    pub metrics: Arc<QuadratureMetrics>,
}

impl AtomicMetricsCollector {
    pub fn new(metrics: Arc<QuadratureMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    fn on_task_enqueued(&self) {
        self.metrics.enqueued_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_started(&self) {
        self.metrics.running_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_resolved(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.leaf_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_split(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.split_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_started(&self) {
        self.metrics.active_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_stopped(&self) {
        self.metrics.active_workers.fetch_sub(1, Ordering::SeqCst);
    }
}

//! State shared between a pool and its workers.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

use super::modes::SchedulingMode;
use super::task::Task;
use crate::metrics::MetricsCollector;
use crate::quadrature::ErrorEstimator;
use crate::store::WorkStore;

/// A pure real-valued function to integrate.
pub type Integrand = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Everything one run needs, created per pool and dropped with it.
///
/// The store, the accumulator and the stop flag are independent: no code path
/// holds more than one of their locks at a time.
pub struct PoolContext<M> {
    pub(crate) store: WorkStore<M>,
    accumulator: Mutex<f64>,
    pub(crate) running: AtomicBool,
    pub(crate) integrand: Integrand,
    pub(crate) estimator: ErrorEstimator,
    pub(crate) max_depth: u32,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl<M: SchedulingMode> PoolContext<M> {
    pub(crate) fn new(
        mode: M,
        integrand: Integrand,
        estimator: ErrorEstimator,
        max_depth: u32,
        metrics_collector: Option<Arc<dyn MetricsCollector>>,
    ) -> Self {
        Self {
            store: WorkStore::new(mode),
            accumulator: Mutex::new(0.0),
            running: AtomicBool::new(true),
            integrand,
            estimator,
            max_depth,
            metrics_collector,
        }
    }

    /// Enqueues a task and reports it to the metrics collector.
    pub(crate) fn submit(&self, task: Task) {
        self.store.enqueue(task);
        self.on_metrics(|m| m.on_task_enqueued());
    }

    pub(crate) fn accumulate(&self, value: f64) {
        *self
            .accumulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += value;
    }

    pub(crate) fn total(&self) -> f64 {
        *self
            .accumulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn on_metrics(&self, hook: impl FnOnce(&dyn MetricsCollector)) {
        if let Some(collector) = &self.metrics_collector {
            hook(collector.as_ref());
        }
    }
}

//! Per-worker statistics and their aggregation.
//!
//! Each worker owns one `WorkerStats` slot and is its only writer. The counters
//! are relaxed atomics: the driver reads them only after the store lock has
//! handed off completion, which orders every write before the read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam::utils::CachePadded;

/// Live counters for one worker, padded to its own cache line.
#[derive(Debug, Default)]
pub struct WorkerStats {
    inner: CachePadded<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    evaluations: AtomicU64,
    busy_nanos: AtomicU64,
    tasks: AtomicU64,
    leaves: AtomicU64,
    splits: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_evaluations(&self, n: u64) {
        self.inner.evaluations.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_leaf(&self) {
        self.inner.leaves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_split(&self) {
        self.inner.splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one processed task and the time spent on it.
    pub fn record_task(&self, busy: Duration) {
        let nanos = u64::try_from(busy.as_nanos()).unwrap_or(u64::MAX);
        self.inner.tasks.fetch_add(1, Ordering::Relaxed);
        self.inner.busy_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self, worker: usize) -> WorkerStatistics {
        WorkerStatistics {
            worker,
            evaluations: self.inner.evaluations.load(Ordering::Relaxed),
            busy_time: Duration::from_nanos(self.inner.busy_nanos.load(Ordering::Relaxed)),
            tasks: self.inner.tasks.load(Ordering::Relaxed),
            leaves: self.inner.leaves.load(Ordering::Relaxed),
            splits: self.inner.splits.load(Ordering::Relaxed),
        }
    }
}

/// What one worker did during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatistics {
    pub worker: usize,
    /// Integrand calls made by this worker.
    pub evaluations: u64,
    /// Time spent processing tasks, excluding time blocked on the store.
    pub busy_time: Duration,
    pub tasks: u64,
    pub leaves: u64,
    pub splits: u64,
}

/// Mean and population standard deviation of a per-worker quantity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Statistics for every worker of a pool, in worker order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolStatistics {
    pub workers: Vec<WorkerStatistics>,
}

impl PoolStatistics {
    pub fn evaluations(&self) -> Summary {
        let samples: Vec<f64> = self.workers.iter().map(|w| w.evaluations as f64).collect();
        Summary::from_samples(&samples)
    }

    /// Busy time per worker, in seconds.
    pub fn busy_time(&self) -> Summary {
        let samples: Vec<f64> = self
            .workers
            .iter()
            .map(|w| w.busy_time.as_secs_f64())
            .collect();
        Summary::from_samples(&samples)
    }

    pub fn total_evaluations(&self) -> u64 {
        self.workers.iter().map(|w| w.evaluations).sum()
    }

    pub fn total_tasks(&self) -> u64 {
        self.workers.iter().map(|w| w.tasks).sum()
    }

    pub fn total_leaves(&self) -> u64 {
        self.workers.iter().map(|w| w.leaves).sum()
    }

    pub fn total_splits(&self) -> u64 {
        self.workers.iter().map(|w| w.splits).sum()
    }
}

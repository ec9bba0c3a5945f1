//! Statically partitioned composite trapezoid rule.
//!
//! The non-adaptive baseline for the pool: `[a, b]` is cut into `n` equal
//! steps, and each of `num_threads` threads sums one contiguous block of them.
//! There is no shared store and no load balancing, so per-thread statistics
//! show how evenly fixed work spreads rather than how adaptive work migrates.

use std::panic::AssertUnwindSafe;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::errors::{ConfigurationError, PoolError};
use crate::pool::task::Task;
use crate::stats::{PoolStatistics, WorkerStatistics};
use crate::Integration;

/// Integrates `f` over `[a, b]` with `n` trapezoid steps split across threads.
///
/// Block boundaries are shared by neighbouring threads and evaluated by both,
/// so the total evaluation count is `n + num_threads`.
///
/// # Example
/// ```rust
/// use quadpool::partitioned::integrate_partitioned;
///
/// let run = integrate_partitioned(|x: f64| x * x, 2.0, 10.0, 1_000, 4).unwrap();
/// assert!((run.value - 992.0 / 3.0).abs() < 1e-3);
/// assert_eq!(run.statistics.total_evaluations(), 1_004);
/// ```
pub fn integrate_partitioned<F>(
    f: F,
    a: f64,
    b: f64,
    n: usize,
    num_threads: usize,
) -> Result<Integration, PoolError>
where
    F: Fn(f64) -> f64 + Sync,
{
    if num_threads == 0 {
        return Err(ConfigurationError::InvalidWorkerCount.into());
    }
    if n < num_threads {
        return Err(ConfigurationError::InvalidStepCount { n, num_threads }.into());
    }
    // Same bounds check as a root task; the tolerance is irrelevant here.
    Task::root(a, b, 1.0)?;

    let h = (b - a) / n as f64;
    let block = n / num_threads;
    let f = &f;

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|id| {
                let first = id * block;
                let last = if id + 1 == num_threads { n } else { first + block };
                let handle = scope.spawn(move || {
                    let started = Instant::now();
                    let value = std::panic::catch_unwind(AssertUnwindSafe(|| {
                        trapezoid_block(f, a, h, first, last)
                    }));
                    (value, started.elapsed())
                });
                (id, first, last, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(id, first, last, handle)| (id, first, last, handle.join()))
            .collect()
    });

    let mut value = 0.0;
    let mut workers = Vec::with_capacity(num_threads);
    for (id, first, last, joined) in outcomes {
        let (a_block, b_block) = (a + first as f64 * h, a + last as f64 * h);
        let (sum, busy_time) = joined.map_err(|_| PoolError::JoinError { worker: id })?;
        let sum = sum.map_err(|payload| PoolError::EvaluationFailure {
            worker: id,
            a: a_block,
            b: b_block,
            message: crate::pool::panic_message(payload.as_ref()),
        })?;
        if !sum.is_finite() {
            return Err(PoolError::EvaluationFailure {
                worker: id,
                a: a_block,
                b: b_block,
                message: "integrand produced a non-finite value".to_string(),
            });
        }
        value += sum;
        workers.push(WorkerStatistics {
            worker: id,
            evaluations: (last - first + 1) as u64,
            busy_time,
            tasks: 1,
            leaves: 1,
            splits: 0,
        });
    }

    debug!(n, num_threads, value, "partitioned trapezoid finished");
    Ok(Integration {
        value,
        statistics: PoolStatistics { workers },
    })
}

/// Composite trapezoid over grid points `first..=last` of `a + k * h`.
fn trapezoid_block<F>(f: &F, a: f64, h: f64, first: usize, last: usize) -> f64
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let at = |k: usize| f(a + k as f64 * h);
    let interior: f64 = (first + 1..last).map(at).sum();
    h * ((at(first) + at(last)) / 2.0 + interior)
}

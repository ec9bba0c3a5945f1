//! Worker logic for the quadrature pool

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, trace, warn};

use super::context::PoolContext;
use super::modes::SchedulingMode;
use super::task::Task;
use crate::errors::PoolError;
use crate::quadrature::Estimate;
use crate::stats::WorkerStats;

pub struct WorkerHandle {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn new(id: usize, thread: thread::JoinHandle<()>) -> Self {
        Self {
            id,
            thread: Some(thread),
        }
    }

    /// Joins the thread. Joining twice is a no-op.
    pub fn join(&mut self) -> Result<(), PoolError> {
        match self.thread.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PoolError::JoinError { worker: self.id }),
            None => Ok(()),
        }
    }
}

/// What processing a task turned into.
enum Resolution {
    Leaf(f64),
    Split(Task, Task),
}

/// Marks the task being processed as complete when dropped.
///
/// If the worker is unwinding, the run is aborted first, so the driver is
/// woken with an error and never sees a drained store for a half-finished task.
struct InFlight<'a, M: SchedulingMode> {
    id: usize,
    ctx: &'a PoolContext<M>,
}

impl<M: SchedulingMode> Drop for InFlight<'_, M> {
    fn drop(&mut self) {
        if thread::panicking() {
            abort_on_panic(self.id, self.ctx);
        }
        self.ctx.store.complete();
    }
}

/// Aborts the run if the worker unwinds outside of a task.
struct WorkerGuard<'a, M: SchedulingMode> {
    id: usize,
    ctx: &'a PoolContext<M>,
}

impl<M: SchedulingMode> Drop for WorkerGuard<'_, M> {
    fn drop(&mut self) {
        if thread::panicking() {
            abort_on_panic(self.id, self.ctx);
        }
    }
}

fn abort_on_panic<M: SchedulingMode>(id: usize, ctx: &PoolContext<M>) {
    warn!(worker = id, "worker panicked, aborting run");
    ctx.store.abort(PoolError::JoinError { worker: id });
}

/// Worker thread main loop
pub fn worker_loop<M: SchedulingMode>(
    id: usize,
    ctx: Arc<PoolContext<M>>,
    stats: Arc<WorkerStats>,
) {
    let _guard = WorkerGuard { id, ctx: &*ctx };
    debug!(worker = id, mode = ctx.store.mode(), "worker started");
    ctx.on_metrics(|m| m.on_worker_started());

    while let Some(task) = ctx.store.take(&ctx.running) {
        let _in_flight = InFlight { id, ctx: &*ctx };
        let started = Instant::now();
        ctx.on_metrics(|m| m.on_task_started());

        match process(id, &ctx, &stats, &task) {
            Ok(Resolution::Leaf(value)) => {
                ctx.accumulate(value);
                stats.record_leaf();
                ctx.on_metrics(|m| m.on_task_resolved());
                trace!(worker = id, a = task.a, b = task.b, value, "leaf");
            }
            Ok(Resolution::Split(left, right)) => {
                ctx.submit(left);
                ctx.submit(right);
                stats.record_split();
                ctx.on_metrics(|m| m.on_task_split());
                trace!(worker = id, a = task.a, b = task.b, depth = task.depth, "split");
            }
            Err(err) => {
                warn!(worker = id, error = %err, "aborting run");
                ctx.store.abort(err);
            }
        }

        // Recorded before `_in_flight` completes the task.
        stats.record_task(started.elapsed());
    }

    ctx.on_metrics(|m| m.on_worker_stopped());
    debug!(worker = id, "worker stopped");
}

fn process<M: SchedulingMode>(
    id: usize,
    ctx: &PoolContext<M>,
    stats: &WorkerStats,
    task: &Task,
) -> Result<Resolution, PoolError> {
    let m = task.midpoint();
    let samples = panic::catch_unwind(AssertUnwindSafe(|| {
        let f = &*ctx.integrand;
        (f(task.a), f(m), f(task.b))
    }));

    let (fa, fm, fb) = samples.map_err(|payload| PoolError::EvaluationFailure {
        worker: id,
        a: task.a,
        b: task.b,
        message: panic_message(payload.as_ref()),
    })?;
    stats.record_evaluations(Estimate::EVALUATIONS);

    let estimate = Estimate::from_samples(task.a, task.b, fa, fm, fb);
    if !estimate.is_finite() {
        return Err(PoolError::EvaluationFailure {
            worker: id,
            a: task.a,
            b: task.b,
            message: "integrand produced a non-finite value".to_string(),
        });
    }

    if ctx.estimator.error(&estimate) < task.tol {
        return Ok(Resolution::Leaf(estimate.refined));
    }

    let unreachable = PoolError::ToleranceUnreachable {
        a: task.a,
        b: task.b,
        depth: task.depth,
    };
    if task.depth >= ctx.max_depth {
        return Err(unreachable);
    }
    match task.split() {
        Some((left, right)) => Ok(Resolution::Split(left, right)),
        None => Err(unreachable),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "integrand panicked".to_string()
    }
}

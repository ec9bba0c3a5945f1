//! Single-threaded recursive reference for the pooled integrator.
//!
//! Uses the same estimate, tolerance halving and depth cap as the pool, so a
//! one-worker pool agrees with it up to summation order.

use crate::errors::PoolError;
use crate::pool::task::Task;
use crate::quadrature::{ErrorEstimator, Estimate};

/// Integrates `f` over `[a, b]` by plain recursion on the calling thread.
///
/// # Example
/// ```rust
/// use quadpool::{sequential::integrate_recursive, ErrorEstimator};
///
/// let square = |x: f64| x * x;
/// let value = integrate_recursive(&square, 2.0, 10.0, 1e-7, 64, ErrorEstimator::Absolute);
/// assert!((value.unwrap() - 992.0 / 3.0).abs() < 1e-5);
/// ```
pub fn integrate_recursive<F>(
    f: &F,
    a: f64,
    b: f64,
    tol: f64,
    max_depth: u32,
    estimator: ErrorEstimator,
) -> Result<f64, PoolError>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let root = Task::root(a, b, tol)?;
    resolve(f, &root, max_depth, estimator)
}

fn resolve<F>(
    f: &F,
    task: &Task,
    max_depth: u32,
    estimator: ErrorEstimator,
) -> Result<f64, PoolError>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let (fa, fm, fb) = (f(task.a), f(task.midpoint()), f(task.b));
    let estimate = Estimate::from_samples(task.a, task.b, fa, fm, fb);
    if !estimate.is_finite() {
        return Err(PoolError::EvaluationFailure {
            worker: 0,
            a: task.a,
            b: task.b,
            message: "integrand produced a non-finite value".to_string(),
        });
    }
    if estimator.error(&estimate) < task.tol {
        return Ok(estimate.refined);
    }

    let unreachable = || PoolError::ToleranceUnreachable {
        a: task.a,
        b: task.b,
        depth: task.depth,
    };
    if task.depth >= max_depth {
        return Err(unreachable());
    }
    let (left, right) = task.split().ok_or_else(unreachable)?;
    Ok(resolve(f, &left, max_depth, estimator)? + resolve(f, &right, max_depth, estimator)?)
}

use quadpool::{
    integrate, metrics::MetricsCollector, ConfigurationError, PoolBuilder, PoolError, PoolState,
    QuadraturePool,
};
use std::sync::{mpsc, Arc};
use std::time::Duration;

#[test]
fn test_zero_workers_is_a_configuration_error() {
    let err = integrate(|x| x, 0.0, 1.0, 1e-6, 0).unwrap_err();
    assert_eq!(
        err,
        PoolError::Configuration(ConfigurationError::InvalidWorkerCount)
    );
}

#[test]
fn test_reversed_interval_is_a_configuration_error() {
    let err = integrate(|x| x, 2.0, 1.0, 1e-6, 2).unwrap_err();
    assert!(matches!(
        err,
        PoolError::Configuration(ConfigurationError::InvalidInterval { .. })
    ));

    let err = integrate(|x| x, 1.0, 1.0, 1e-6, 2).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_non_positive_tolerance_is_a_configuration_error() {
    let err = integrate(|x| x, 0.0, 1.0, -1.0, 2).unwrap_err();
    assert_eq!(
        err,
        PoolError::Configuration(ConfigurationError::InvalidTolerance(-1.0))
    );
}

#[test]
fn test_panicking_integrand_aborts_the_run() {
    let pool = QuadraturePool::new(4, |x: f64| {
        if x > 0.7 {
            panic!("domain error");
        }
        x
    })
    .unwrap();

    pool.submit_root(0.0, 1.0, 1e-6).unwrap();
    let err = pool.wait_for_completion().unwrap_err();
    match &err {
        PoolError::EvaluationFailure { message, .. } => assert_eq!(message, "domain error"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(pool.state(), PoolState::Aborted);
    assert_eq!(pool.submit_root(0.0, 0.5, 1e-6).unwrap_err(), err);
    assert_eq!(pool.result().unwrap_err(), err);

    // Only the root was taken, and its evaluation never completed.
    let stats = pool.shutdown().unwrap();
    assert_eq!(stats.total_tasks(), 1);
    assert_eq!(stats.total_evaluations(), 0);
}

#[test]
fn test_non_finite_integrand_is_an_evaluation_failure() {
    let err = integrate(|x: f64| 1.0 / x, 0.0, 1.0, 1e-6, 2).unwrap_err();
    assert!(matches!(err, PoolError::EvaluationFailure { .. }));
}

#[test]
fn test_discontinuity_reports_unreachable_tolerance() {
    let pool = PoolBuilder::new()
        .num_workers(4)
        .max_depth(12)
        .build(|x| if x < 0.3 { 0.0 } else { 1.0 })
        .unwrap();

    pool.submit_root(0.0, 1.0, 1e-12).unwrap();
    let err = pool.wait_for_completion().unwrap_err();
    assert!(matches!(err, PoolError::ToleranceUnreachable { depth: 12, .. }));
    pool.shutdown().unwrap();
}

/// Collector whose split hook panics, killing the worker mid-task.
struct PanickingSplitCollector;

impl MetricsCollector for PanickingSplitCollector {
    fn on_task_enqueued(&self) {}
    fn on_task_started(&self) {}
    fn on_task_resolved(&self) {}
    fn on_task_split(&self) {
        panic!("split hook failed");
    }
    fn on_worker_started(&self) {}
    fn on_worker_stopped(&self) {}
}

#[test]
fn test_panicking_metrics_hook_aborts_instead_of_hanging() {
    let pool = PoolBuilder::new()
        .num_workers(2)
        .with_metrics_collector(Arc::new(PanickingSplitCollector))
        .build(|x: f64| x.sqrt())
        .unwrap();
    pool.submit_root(0.0, 1.0, 1e-6).unwrap();

    let (tx, rx) = mpsc::channel();
    let driver = std::thread::spawn(move || {
        let outcome = pool.wait_for_completion();
        let _ = tx.send(outcome);
        pool
    });

    let outcome = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("wait_for_completion hung after a worker panicked");
    assert!(matches!(outcome, Err(PoolError::JoinError { .. })));

    let pool = driver.join().unwrap();
    assert_eq!(pool.state(), PoolState::Aborted);
    assert!(pool.result().is_err());
    assert!(matches!(
        pool.shutdown(),
        Err(PoolError::JoinError { .. })
    ));
}

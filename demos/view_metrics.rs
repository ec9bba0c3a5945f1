use quadpool::{
    log_metrics,
    metrics::{AtomicMetricsCollector, QuadratureMetrics},
    PoolBuilder,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let metrics = Arc::new(QuadratureMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));

    // Slow integrand so the monitor has something to watch.
    let pool = PoolBuilder::new()
        .num_workers(4)
        .with_metrics_collector(collector)
        .build(|x: f64| {
            thread::sleep(Duration::from_micros(50));
            (-x * x).exp() * (20.0 * x).sin()
        })
        .unwrap();

    let monitoring = Arc::new(AtomicBool::new(true));
    let monitor = {
        let metrics = metrics.clone();
        let monitoring = monitoring.clone();
        thread::spawn(move || {
            while monitoring.load(Ordering::Acquire) {
                log_metrics!(metrics);
                thread::sleep(Duration::from_millis(80));
            }
        })
    };

    pool.submit_root(0.0, 3.0, 1e-5).unwrap();
    pool.wait_for_completion().unwrap();
    let value = pool.result().unwrap();
    let stats = pool.shutdown().unwrap();

    monitoring.store(false, Ordering::Release);
    monitor.join().unwrap();

    log_metrics!(metrics);
    let evaluations = stats.evaluations();
    let busy = stats.busy_time();
    println!("Result: {value:.10}");
    println!(
        "Evaluations per worker: mean {:.1}, std dev {:.1}",
        evaluations.mean, evaluations.std_dev
    );
    println!(
        "Busy time per worker:   mean {:.4}s, std dev {:.4}s",
        busy.mean, busy.std_dev
    );
}

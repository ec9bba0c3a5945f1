//! Compares the pool against the sequential reference on an integrand that
//! needs deep refinement near one endpoint, for a range of worker counts, then
//! shows the statically partitioned trapezoid on the same integrand.

use quadpool::{
    integrate, partitioned::integrate_partitioned, sequential::integrate_recursive,
    ErrorEstimator, DEFAULT_MAX_DEPTH,
};
use std::time::Instant;

fn sqrt_weight(x: f64) -> f64 {
    x.sqrt() * (1.0 - x).powi(2)
}

fn main() {
    let exact = 16.0 / 105.0;

    for tol in [1e-3, 1e-6, 1e-9] {
        let start = Instant::now();
        let sequential = match integrate_recursive(
            &sqrt_weight,
            0.0,
            1.0,
            tol,
            DEFAULT_MAX_DEPTH,
            ErrorEstimator::Absolute,
        ) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("sequential run failed at tol {tol:e}: {err}");
                continue;
            }
        };
        let sequential_time = start.elapsed();
        println!(
            "tol {tol:e}: sequential {sequential:.12} (error {:.3e}) in {sequential_time:?}",
            (sequential - exact).abs()
        );

        for workers in [1, 2, 4, 8, 16] {
            let start = Instant::now();
            match integrate(sqrt_weight, 0.0, 1.0, tol, workers) {
                Ok(run) => {
                    let elapsed = start.elapsed();
                    let evaluations = run.statistics.evaluations();
                    let busy = run.statistics.busy_time();
                    println!(
                        "  {workers:>2} workers: {:.12} (vs sequential {:.3e}) in {elapsed:?}, \
                         evals {:.1} ± {:.1}, busy {:.4}s ± {:.4}s",
                        run.value,
                        (run.value - sequential).abs(),
                        evaluations.mean,
                        evaluations.std_dev,
                        busy.mean,
                        busy.std_dev
                    );
                }
                Err(err) => eprintln!("  {workers:>2} workers failed: {err}"),
            }
        }
    }

    let steps = 1_000_000;
    println!("partitioned trapezoid, {steps} steps:");
    for threads in [1, 2, 4, 8, 16] {
        let start = Instant::now();
        match integrate_partitioned(sqrt_weight, 0.0, 1.0, steps, threads) {
            Ok(run) => {
                let busy = run.statistics.busy_time();
                println!(
                    "  {threads:>2} threads: {:.12} (error {:.3e}) in {:?}, busy {:.4}s ± {:.4}s",
                    run.value,
                    (run.value - exact).abs(),
                    start.elapsed(),
                    busy.mean,
                    busy.std_dev
                );
            }
            Err(err) => eprintln!("  {threads:>2} threads failed: {err}"),
        }
    }
}

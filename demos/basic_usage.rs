use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pool = quadpool::QuadraturePool::new(4, |x| x * x).unwrap();
    pool.submit_root(2.0, 10.0, 1e-7).unwrap();
    pool.wait_for_completion().unwrap();
    let value = pool.result().unwrap();
    println!("Integral of x^2 over [2, 10]: {:.6}", value);
    println!("Exact value:                  {:.6}", 992.0 / 3.0);

    let stats = pool.shutdown().unwrap();
    for worker in &stats.workers {
        println!(
            "worker {}: {} evaluations, {:?} busy",
            worker.worker, worker.evaluations, worker.busy_time
        );
    }
}

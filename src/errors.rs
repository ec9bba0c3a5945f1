//! Error types for the quadrature pool.
//!
//! Configuration problems are reported synchronously, before any task reaches the
//! shared store. Evaluation failures and unreachable tolerances are fatal for a run:
//! the first one recorded aborts the pool and is handed back to the driver.

use thiserror::Error;

/// Invalid input detected while building a pool or submitting a root task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The pool needs at least one worker thread.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    /// The interval is empty, reversed, or has a non-finite endpoint.
    #[error("invalid interval [{a}, {b}]: bounds must be finite with a < b")]
    InvalidInterval { a: f64, b: f64 },
    /// The tolerance is zero, negative, or not finite.
    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    /// A split depth cap of zero would reject every task that needs refinement.
    #[error("maximum split depth must be at least 1")]
    InvalidMaxDepth,
    /// A static partition needs at least one trapezoid step per thread.
    #[error("{n} steps cannot be split across {num_threads} threads")]
    InvalidStepCount { n: usize, num_threads: usize },
}

/// Represents errors that can occur in the quadrature pool.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The integrand panicked, or its estimate on `[a, b]` was not finite.
    #[error("worker {worker} failed to evaluate the integrand on [{a}, {b}]: {message}")]
    EvaluationFailure {
        worker: usize,
        a: f64,
        b: f64,
        message: String,
    },
    /// Refinement hit the split depth cap, or the interval became too narrow to bisect.
    #[error("tolerance unreachable on [{a}, {b}] at split depth {depth}")]
    ToleranceUnreachable { a: f64, b: f64, depth: u32 },
    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker {worker}: {message}")]
    SpawnFailure { worker: usize, message: String },
    /// A worker thread panicked outside task evaluation and could not be joined.
    #[error("worker {worker} panicked or failed to join")]
    JoinError { worker: usize },
}

impl PoolError {
    /// Returns `true` for errors raised by input validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PoolError::Configuration(_))
    }
}

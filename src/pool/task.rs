//! Task abstraction for the quadrature pool.

use crate::errors::{ConfigurationError, PoolError};

/// One quadrature sub-problem: integrate over `[a, b]` to within `tol`.
///
/// Tasks are plain values. A worker consumes each one exactly once and either
/// resolves it into a leaf estimate or splits it into two children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub a: f64,
    pub b: f64,
    pub tol: f64,
    /// Number of bisections between this task and its root.
    pub depth: u32,
}

impl Task {
    /// Validates the bounds and tolerance and builds a root task at depth 0.
    pub fn root(a: f64, b: f64, tol: f64) -> Result<Self, PoolError> {
        if !a.is_finite() || !b.is_finite() || a >= b {
            return Err(ConfigurationError::InvalidInterval { a, b }.into());
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ConfigurationError::InvalidTolerance(tol).into());
        }
        Ok(Self {
            a,
            b,
            tol,
            depth: 0,
        })
    }

    pub fn midpoint(&self) -> f64 {
        self.a + (self.b - self.a) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.b - self.a
    }

    /// Bisects the task, handing each half of the tolerance to one child.
    ///
    /// Returns `None` when the midpoint is not strictly inside `(a, b)`, which
    /// happens once the interval is only a few ulps wide.
    pub fn split(&self) -> Option<(Task, Task)> {
        let m = self.midpoint();
        if !(self.a < m && m < self.b) {
            return None;
        }
        let tol = self.tol / 2.0;
        let depth = self.depth + 1;
        Some((
            Task {
                a: self.a,
                b: m,
                tol,
                depth,
            },
            Task {
                a: m,
                b: self.b,
                tol,
                depth,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_rejects_bad_input() {
        assert!(Task::root(1.0, 1.0, 1e-3).unwrap_err().is_configuration());
        assert!(Task::root(2.0, 1.0, 1e-3).unwrap_err().is_configuration());
        assert!(Task::root(0.0, f64::INFINITY, 1e-3).is_err());
        assert!(Task::root(0.0, 1.0, 0.0).is_err());
        assert!(Task::root(0.0, 1.0, -1e-3).is_err());
        assert!(Task::root(0.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn split_halves_interval_and_tolerance() {
        let root = Task::root(2.0, 10.0, 1e-4).unwrap();
        let (left, right) = root.split().unwrap();
        assert_eq!((left.a, left.b), (2.0, 6.0));
        assert_eq!((right.a, right.b), (6.0, 10.0));
        assert_eq!(left.tol, 5e-5);
        assert_eq!(right.tol, 5e-5);
        assert_eq!(left.depth, 1);
        assert_eq!(right.depth, 1);
    }

    #[test]
    fn split_refuses_unrepresentable_midpoint() {
        let a = 1.0_f64;
        let b = f64::from_bits(a.to_bits() + 1);
        let task = Task {
            a,
            b,
            tol: 1e-3,
            depth: 10,
        };
        assert!(task.split().is_none());
    }
}

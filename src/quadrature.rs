//! The two-rule estimate used to decide whether a task is resolved.
//!
//! Each task samples the integrand at its endpoints and midpoint. The trapezoid
//! rule gives the coarse estimate and Simpson's rule the refined one; how their
//! difference turns into an error estimate is chosen once per pool.

/// How the gap between the coarse and refined estimates is turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorEstimator {
    /// `|refined - coarse|`, compared against the task tolerance as-is.
    #[default]
    Absolute,
    /// `|refined - coarse| / 15`, the Richardson-style scaling.
    Richardson,
}

impl ErrorEstimator {
    pub fn error(&self, estimate: &Estimate) -> f64 {
        let gap = (estimate.refined - estimate.coarse).abs();
        match self {
            ErrorEstimator::Absolute => gap,
            ErrorEstimator::Richardson => gap / 15.0,
        }
    }
}

/// Coarse and refined estimates of the integral over one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Two-point trapezoid rule.
    pub coarse: f64,
    /// Three-point Simpson rule.
    pub refined: f64,
}

impl Estimate {
    /// Function evaluations needed per estimate.
    pub const EVALUATIONS: u64 = 3;

    /// Builds both estimates from samples at `a`, the midpoint, and `b`.
    pub fn from_samples(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> Self {
        let h = b - a;
        Self {
            coarse: h * (fa + fb) / 2.0,
            refined: h * (fa + 4.0 * fm + fb) / 6.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.coarse.is_finite() && self.refined.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simpson_is_exact_for_cubics() {
        let f = |x: f64| 2.0 * x * x * x - x * x + 3.0;
        let (a, b) = (-1.0, 2.0);
        let m = (a + b) / 2.0;
        let est = Estimate::from_samples(a, b, f(a), f(m), f(b));
        let antiderivative = |x: f64| x.powi(4) / 2.0 - x.powi(3) / 3.0 + 3.0 * x;
        let exact = antiderivative(b) - antiderivative(a);
        assert!((est.refined - exact).abs() < 1e-12);
    }

    #[test]
    fn richardson_scales_the_gap() {
        let est = Estimate {
            coarse: 1.0,
            refined: 2.5,
        };
        assert_eq!(ErrorEstimator::Absolute.error(&est), 1.5);
        assert_eq!(ErrorEstimator::Richardson.error(&est), 0.1);
    }
}

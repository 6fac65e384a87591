//! Uniform simulation time grid.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Grid `t_i = i * dt` for `i = 0..=n_steps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    dt: f64,
    n_steps: usize,
}

impl TimeGrid {
    /// Grid covering `[0, t_end]` with step `dt`.
    ///
    /// The step count is `round(t_end / dt)`, so `t_end` need not be an
    /// exact multiple of `dt`.
    pub fn new(dt: f64, t_end: f64) -> SimResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }
        if !(t_end.is_finite() && t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative and finite",
            });
        }
        let steps = (t_end / dt).round();
        if steps >= usize::MAX as f64 {
            return Err(SimError::InvalidArg {
                what: "t_end / dt exceeds the representable step count",
            });
        }
        Ok(Self {
            dt,
            n_steps: steps as usize,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of integration steps `N`.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of grid points `N + 1`.
    pub fn len(&self) -> usize {
        self.n_steps + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn time(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }

    pub fn t_end(&self) -> f64 {
        self.time(self.n_steps)
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.time(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_includes_both_ends() {
        let g = TimeGrid::new(0.1, 10.0).unwrap();
        assert_eq!(g.n_steps(), 100);
        assert_eq!(g.len(), 101);
        let t = g.times();
        assert_eq!(t[0], 0.0);
        assert!((t[100] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn zero_horizon_has_single_point() {
        let g = TimeGrid::new(0.1, 0.0).unwrap();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn invalid_grid() {
        assert!(TimeGrid::new(0.0, 1.0).is_err());
        assert!(TimeGrid::new(-0.1, 1.0).is_err());
        assert!(TimeGrid::new(0.1, -1.0).is_err());
        assert!(TimeGrid::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn step_count_overflow_rejected() {
        let err = TimeGrid::new(1e-10, 1e10).unwrap_err();
        assert!(matches!(err, SimError::InvalidArg { .. }));
        assert!(TimeGrid::new(f64::MIN_POSITIVE, 1.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use mr_core::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn end_time_within_half_step(dt in 1e-3f64..1.0, t_end in 0.0f64..1000.0) {
            let g = TimeGrid::new(dt, t_end).unwrap();
            prop_assert!((g.t_end() - t_end).abs() <= 0.5 * dt * (1.0 + 1e-9));
            prop_assert_eq!(g.times().len(), g.len());
        }

        #[test]
        fn whole_multiples_are_exact(dt in 1e-3f64..1.0, n in 0usize..5000) {
            let g = TimeGrid::new(dt, n as f64 * dt).unwrap();
            prop_assert_eq!(g.n_steps(), n);
            prop_assert!(nearly_equal(g.t_end(), n as f64 * dt, Tolerances::default()));
        }
    }
}

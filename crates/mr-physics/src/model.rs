//! Reactor differential-algebraic model.
//!
//! `derivatives(t, x, u)` returns `dx/dt` and the instantaneous reactivity
//! for a drum angle `u` (degrees). The model holds no mutable state; it is
//! configured once per run.

use serde::{Deserialize, Serialize};

use crate::config::ReactorConfig;
use crate::constants::{PHYSICS, PRECURSOR_GROUPS, PhysicsConstants};
use crate::error::{PhysicsError, PhysicsResult};
use crate::state::{
    COOLANT_TEMP, CR1, FUEL_TEMP, IODINE, MODERATOR_TEMP, N_R, ReactorState, XENON,
};

/// Reference temperatures the feedback terms are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnchors {
    pub fuel_k: f64,
    pub moderator_k: f64,
    pub coolant_k: f64,
}

impl FeedbackAnchors {
    /// Anchors hard-wired for the four-drum layout. They intentionally do not
    /// follow the configured `tf0`/`tm0`.
    pub const FOUR_DRUM: FeedbackAnchors = FeedbackAnchors {
        fuel_k: 900.42,
        moderator_k: 898.261,
        coolant_k: 888.261,
    };

    /// Resolve anchors for a drum layout.
    pub fn resolve(config: &ReactorConfig, constants: &PhysicsConstants) -> PhysicsResult<Self> {
        match config.num_drums {
            8 | 2 | 1 => Ok(FeedbackAnchors {
                fuel_k: config.tf0,
                moderator_k: config.tm0,
                coolant_k: constants.tc0(),
            }),
            4 => Ok(Self::FOUR_DRUM),
            n => Err(PhysicsError::UnsupportedDrumCount { num_drums: n }),
        }
    }
}

/// Derivative of the state vector plus the reactivity it was computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivatives {
    pub d_state: ReactorState,
    pub rho: f64,
}

/// Point-kinetics reactor with xenon/iodine poisoning and a three-node
/// (fuel, moderator, coolant) thermal network.
#[derive(Debug, Clone)]
pub struct ReactorModel {
    config: ReactorConfig,
    constants: &'static PhysicsConstants,
    anchors: FeedbackAnchors,
    /// Fuel-to-moderator conductance (W/K)
    k_fm: f64,
    /// Moderator-to-coolant conductance (W/K)
    k_mc: f64,
}

impl ReactorModel {
    /// Build a model over the shared [`PHYSICS`] table.
    ///
    /// Fails with [`PhysicsError::UnsupportedDrumCount`] unless the layout has
    /// 1, 2, 4 or 8 drums.
    pub fn new(config: ReactorConfig) -> PhysicsResult<Self> {
        Self::with_constants(config, &PHYSICS)
    }

    pub fn with_constants(
        config: ReactorConfig,
        constants: &'static PhysicsConstants,
    ) -> PhysicsResult<Self> {
        let anchors = FeedbackAnchors::resolve(&config, constants)?;
        config.validate(constants)?;

        let k_fm = constants.f_f * constants.p_0 / (config.tf0 - config.tm0);
        let k_mc = constants.p_0 / (config.tm0 - constants.tc0());

        tracing::debug!(
            num_drums = config.num_drums,
            k_fm,
            k_mc,
            "reactor model configured"
        );

        Ok(Self {
            config,
            constants,
            anchors,
            k_fm,
            k_mc,
        })
    }

    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    pub fn constants(&self) -> &'static PhysicsConstants {
        self.constants
    }

    pub fn anchors(&self) -> FeedbackAnchors {
        self.anchors
    }

    /// Total reactivity for drum angle `u` (degrees).
    pub fn reactivity(&self, x: &ReactorState, u: f64) -> f64 {
        let c = self.constants;
        let a = &self.anchors;
        let rho_d1 = self.config.rho_d0 + u * self.config.reactivity_per_degree;
        rho_d1
            + c.alpha_f * (x.0[FUEL_TEMP] - a.fuel_k)
            + c.alpha_c * (x.0[COOLANT_TEMP] - a.coolant_k)
            + c.alpha_m * (x.0[MODERATOR_TEMP] - a.moderator_k)
            - c.sig_x * (x.0[XENON] - self.config.xe0) / c.sum_f
    }

    /// Evaluate the DAE at time `t`. The model is autonomous, so `t` does not
    /// enter the equations.
    pub fn derivatives(&self, _t: f64, x: &ReactorState, u: f64) -> Derivatives {
        let c = self.constants;
        let rho = self.reactivity(x, u);

        let n_r = x.0[N_R];
        let xe = x.0[XENON];
        let iodine = x.0[IODINE];
        let tf = x.0[FUEL_TEMP];
        let tm = x.0[MODERATOR_TEMP];
        let tc = x.0[COOLANT_TEMP];
        let pi = self.config.pi;

        let mut dx = [0.0; 12];

        // Point kinetics
        let mut dn = ((rho - c.beta) / c.l) * n_r;
        for group in 0..PRECURSOR_GROUPS {
            dn += (c.beta_k[group] / c.l) * x.0[CR1 + group];
        }
        dx[N_R] = dn;
        for group in 0..PRECURSOR_GROUPS {
            let lamda = c.lamda_k[group];
            dx[CR1 + group] = lamda * n_r - lamda * x.0[CR1 + group];
        }

        // Xenon / iodine
        dx[XENON] = c.yx * c.sum_f * pi + c.lamda_i * iodine - c.sig_x * xe * pi - c.lamda_x * xe;
        dx[IODINE] = c.yi * c.sum_f * pi - c.lamda_i * iodine;

        // Thermal network
        let (mu_f, mu_m, mu_c) = (c.mu_f(), c.mu_m(), c.mu_c());
        dx[FUEL_TEMP] = c.f_f * c.p_0 / mu_f * n_r - self.k_fm / mu_f * (tf - tc);
        dx[MODERATOR_TEMP] = (1.0 - c.f_f) * c.p_0 / mu_m * n_r
            + (self.k_fm * (tf - tm) - self.k_mc * (tm - tc)) / mu_m;
        dx[COOLANT_TEMP] =
            self.k_mc * (tm - tc) / mu_c - 2.0 * c.m_dot * c.cp_c * (tc - c.t_in) / mu_c;

        Derivatives {
            d_state: ReactorState(dx),
            rho,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial::initial_state;

    fn model(num_drums: u32) -> ReactorModel {
        ReactorModel::new(ReactorConfig::for_drums(num_drums, &PHYSICS)).unwrap()
    }

    #[test]
    fn unsupported_drum_count_is_fatal() {
        for n in [0, 3, 5, 6, 7, 9] {
            let err = ReactorModel::new(ReactorConfig::for_drums(n, &PHYSICS)).unwrap_err();
            assert_eq!(err, PhysicsError::UnsupportedDrumCount { num_drums: n });
        }
    }

    #[test]
    fn four_drum_layout_uses_fixed_anchors() {
        let m = model(4);
        assert_eq!(m.anchors(), FeedbackAnchors::FOUR_DRUM);
        let m8 = model(8);
        assert_eq!(m8.anchors().fuel_k, 1105.0);
        assert_eq!(m8.anchors().moderator_k, 1087.0);
        assert_eq!(m8.anchors().coolant_k, 985.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let m = model(2);
        let x = initial_state(2, 0.7, m.config()).unwrap();
        let a = m.derivatives(3.0, &x, 160.0);
        let b = m.derivatives(3.0, &x, 160.0);
        assert_eq!(a, b);
        assert_eq!(a.d_state.0.map(f64::to_bits), b.d_state.0.map(f64::to_bits));
        assert_eq!(a.rho.to_bits(), b.rho.to_bits());
    }

    #[test]
    fn reactivity_is_linear_in_drum_angle() {
        let m = model(8);
        let x = initial_state(8, 1.0, m.config()).unwrap();
        let r0 = m.derivatives(0.0, &x, 70.0).rho;
        let r1 = m.derivatives(0.0, &x, 71.0).rho;
        assert!((r1 - r0 - 26.11e-5).abs() < 1e-12);
    }

    #[test]
    fn precursors_relax_toward_power() {
        let m = model(1);
        let mut x = initial_state(1, 0.9, m.config()).unwrap();
        x.0[N_R] = 1.0;
        let d = m.derivatives(0.0, &x, 170.0).d_state;
        for group in 0..PRECURSOR_GROUPS {
            assert!(d.0[CR1 + group] > 0.0);
        }
    }

    #[test]
    fn one_drum_equilibrium_is_near_critical() {
        let m = model(1);
        let x = initial_state(1, 0.9, m.config()).unwrap();
        let d = m.derivatives(0.0, &x, 170.0);
        // Under 1 pcm
        assert!(d.rho.abs() < 1e-5);
        // Poisons start at their equilibrium
        assert!(d.d_state.0[IODINE].abs() < 1e-6 * m.config().i0);
        assert!(d.d_state.0[XENON].abs() < 1e-6 * m.config().xe0);
    }

    #[test]
    fn hotter_fuel_lowers_reactivity() {
        let m = model(8);
        let mut x = initial_state(8, 1.0, m.config()).unwrap();
        let base = m.reactivity(&x, 77.56);
        x.0[FUEL_TEMP] += 10.0;
        assert!(m.reactivity(&x, 77.56) < base);
    }
}

//! Reactor configuration and derived equilibrium values.

use mr_core::units::{Temperature, kelvin_of};
use serde::{Deserialize, Serialize};

use crate::constants::PhysicsConstants;
use crate::drums::lookup_drum_parameters;
use crate::error::{PhysicsError, PhysicsResult};

pub const DEFAULT_TF0_K: f64 = 1105.0;
pub const DEFAULT_TM0_K: f64 = 1087.0;

fn default_tf0() -> f64 {
    DEFAULT_TF0_K
}

fn default_tm0() -> f64 {
    DEFAULT_TM0_K
}

/// Equilibrium fission rate and poison concentrations at nominal power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Fission rate `P_0 / (G * Sum_f * V)`
    pub pi: f64,
    /// Equilibrium xenon concentration
    pub xe0: f64,
    /// Equilibrium iodine concentration
    pub i0: f64,
}

impl Equilibrium {
    pub fn from_constants(c: &PhysicsConstants) -> Self {
        let pi = c.p_0 / (c.g * c.sum_f * c.v);
        let xe0 = (c.yi + c.yx) * c.sum_f * pi / (c.lamda_x + c.sig_x * pi);
        let i0 = c.yi * c.sum_f * pi / c.lamda_i;
        Self { pi, xe0, i0 }
    }
}

/// Immutable per-run reactor configuration.
///
/// `tf0`/`tm0` are the fuel and moderator reference temperatures (K). They
/// size the conduction coefficients and anchor the temperature feedback for
/// every layout except four drums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorConfig {
    pub num_drums: u32,
    pub rho_d0: f64,
    pub reactivity_per_degree: f64,
    pub xe0: f64,
    pub i0: f64,
    pub pi: f64,
    #[serde(default = "default_tf0")]
    pub tf0: f64,
    #[serde(default = "default_tm0")]
    pub tm0: f64,
}

impl ReactorConfig {
    /// Build the configuration for a drum layout from the drum table and the
    /// equilibrium derived from `constants`.
    pub fn for_drums(num_drums: u32, constants: &PhysicsConstants) -> Self {
        let drum = lookup_drum_parameters(num_drums);
        let eq = Equilibrium::from_constants(constants);
        Self {
            num_drums,
            rho_d0: drum.rho_d0,
            reactivity_per_degree: drum.reactivity_per_degree,
            xe0: eq.xe0,
            i0: eq.i0,
            pi: eq.pi,
            tf0: DEFAULT_TF0_K,
            tm0: DEFAULT_TM0_K,
        }
    }

    /// Override the fuel and moderator reference temperatures.
    pub fn with_reference_temperatures(mut self, fuel: Temperature, moderator: Temperature) -> Self {
        self.tf0 = kelvin_of(fuel);
        self.tm0 = kelvin_of(moderator);
        self
    }

    /// Check values that would make the thermal network degenerate.
    pub fn validate(&self, constants: &PhysicsConstants) -> PhysicsResult<()> {
        for (v, what) in [
            (self.rho_d0, "rho_d0"),
            (self.reactivity_per_degree, "reactivity_per_degree"),
            (self.xe0, "xe0"),
            (self.i0, "i0"),
            (self.pi, "pi"),
            (self.tf0, "tf0"),
            (self.tm0, "tm0"),
        ] {
            mr_core::ensure_finite(v, what)?;
        }
        if self.tf0 == self.tm0 {
            return Err(PhysicsError::InvalidArg {
                what: "tf0 must differ from tm0",
            });
        }
        if self.tm0 == constants.tc0() {
            return Err(PhysicsError::InvalidArg {
                what: "tm0 must differ from the mean coolant temperature",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PHYSICS;
    use mr_core::k;

    #[test]
    fn equilibrium_balances_poison_odes() {
        let c = &PHYSICS;
        let eq = Equilibrium::from_constants(c);
        let d_iodine = c.yi * c.sum_f * eq.pi - c.lamda_i * eq.i0;
        let d_xenon = c.yx * c.sum_f * eq.pi + c.lamda_i * eq.i0
            - c.sig_x * eq.xe0 * eq.pi
            - c.lamda_x * eq.xe0;
        assert!(d_iodine.abs() < 1e-6 * c.yi * c.sum_f * eq.pi);
        assert!(d_xenon.abs() < 1e-6 * c.yi * c.sum_f * eq.pi);
    }

    #[test]
    fn for_drums_uses_table_and_default_temperatures() {
        let cfg = ReactorConfig::for_drums(2, &PHYSICS);
        assert_eq!(cfg.num_drums, 2);
        assert_eq!(cfg.reactivity_per_degree, 7.33e-5);
        assert_eq!(cfg.tf0, 1105.0);
        assert_eq!(cfg.tm0, 1087.0);
    }

    #[test]
    fn reference_temperature_override() {
        let cfg = ReactorConfig::for_drums(8, &PHYSICS)
            .with_reference_temperatures(k(1100.0), k(1080.0));
        assert_eq!(cfg.tf0, 1100.0);
        assert_eq!(cfg.tm0, 1080.0);
        assert!(cfg.validate(&PHYSICS).is_ok());
    }

    #[test]
    fn serde_defaults_fill_temperatures() {
        let cfg = ReactorConfig::for_drums(1, &PHYSICS);
        let json = format!(
            r#"{{"num_drums":1,"rho_d0":{},"reactivity_per_degree":{},"xe0":{},"i0":{},"pi":{}}}"#,
            cfg.rho_d0, cfg.reactivity_per_degree, cfg.xe0, cfg.i0, cfg.pi
        );
        let parsed: ReactorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tf0, DEFAULT_TF0_K);
        assert_eq!(parsed.tm0, DEFAULT_TM0_K);
    }

    #[test]
    fn degenerate_temperatures_rejected() {
        let mut cfg = ReactorConfig::for_drums(8, &PHYSICS);
        cfg.tm0 = cfg.tf0;
        assert!(cfg.validate(&PHYSICS).is_err());
    }
}

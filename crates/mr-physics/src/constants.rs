//! Physical constants shared by every reactor configuration.
//!
//! Only the drum feedback/actuator parameters vary between runs; everything
//! here is a fixed literal, referenced through [`PHYSICS`].

/// Number of delayed-neutron precursor groups.
pub const PRECURSOR_GROUPS: usize = 6;

/// Immutable table of kinetics, poisoning and thermal constants.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConstants {
    // Xenon / iodine
    /// Xe-135 microscopic absorption cross-section
    pub sig_x: f64,
    /// I-135 fission yield
    pub yi: f64,
    /// Xe-135 direct fission yield
    pub yx: f64,
    /// Xe-135 decay constant (1/s)
    pub lamda_x: f64,
    /// I-135 decay constant (1/s)
    pub lamda_i: f64,
    /// Macroscopic fission cross-section
    pub sum_f: f64,
    /// Energy per fission (J)
    pub g: f64,
    /// Core volume used for the fission-rate estimate
    pub v: f64,

    // Point kinetics
    /// Prompt neutron generation time (s)
    pub l: f64,
    /// Total delayed neutron fraction
    pub beta: f64,
    pub beta_k: [f64; PRECURSOR_GROUPS],
    /// Precursor decay constants (1/s)
    pub lamda_k: [f64; PRECURSOR_GROUPS],

    // Thermal network
    pub cp_f: f64,
    pub cp_m: f64,
    pub cp_c: f64,
    pub m_f: f64,
    pub m_m: f64,
    pub m_c: f64,
    /// Fraction of fission power deposited in the fuel
    pub f_f: f64,
    /// Nominal thermal power (W)
    pub p_0: f64,
    /// Coolant inlet temperature (K)
    pub t_in: f64,
    /// Coolant outlet temperature at nominal power (K)
    pub t_out: f64,
    /// Coolant mass flow rate (kg/s)
    pub m_dot: f64,

    // Temperature feedback (dk/k per K)
    pub alpha_f: f64,
    pub alpha_m: f64,
    pub alpha_c: f64,
}

pub static PHYSICS: PhysicsConstants = PhysicsConstants {
    sig_x: 2.65e-22,
    yi: 0.061,
    yx: 0.002,
    lamda_x: 2.09e-5,
    lamda_i: 2.87e-5,
    sum_f: 0.3358,
    g: 3.2e-11,
    v: 400.0 * 200.0,

    l: 1.68e-3,
    beta: 0.0048,
    beta_k: [
        1.42481e-4, 9.24281e-4, 7.79956e-4, 2.06583e-3, 6.71175e-4, 2.17806e-4,
    ],
    lamda_k: [1.272e-2, 3.174e-2, 1.160e-1, 3.110e-1, 1.400e+0, 3.870e+0],

    cp_f: 977.0,
    cp_m: 1697.0,
    cp_c: 5188.6,
    m_f: 2002.0,
    m_m: 11573.0,
    m_c: 500.0,
    f_f: 0.96,
    p_0: 22e6,
    t_in: 864.0,
    t_out: 1106.0,
    m_dot: 1.75e+1,

    alpha_f: -2.875e-5,
    alpha_m: -3.696e-5,
    alpha_c: 0.0,
};

impl PhysicsConstants {
    /// Fuel heat capacity `M_f * cp_f` (J/K).
    pub fn mu_f(&self) -> f64 {
        self.m_f * self.cp_f
    }

    /// Moderator heat capacity `M_m * cp_m` (J/K).
    pub fn mu_m(&self) -> f64 {
        self.m_m * self.cp_m
    }

    /// Coolant heat capacity `M_c * cp_c` (J/K).
    pub fn mu_c(&self) -> f64 {
        self.m_c * self.cp_c
    }

    /// Mean coolant temperature, used as the coolant feedback anchor.
    pub fn tc0(&self) -> f64 {
        (self.t_in + self.t_out) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_fractions_sum_to_total_beta() {
        let sum: f64 = PHYSICS.beta_k.iter().sum();
        // The tabulated group fractions overshoot beta by about 1.5e-6.
        assert!((sum - PHYSICS.beta).abs() < 2e-6);
    }

    #[test]
    fn derived_thermal_constants() {
        assert_eq!(PHYSICS.tc0(), 985.0);
        assert_eq!(PHYSICS.mu_f(), 2002.0 * 977.0);
        assert_eq!(PHYSICS.p_0, 22e6);
        assert_eq!(PHYSICS.t_in, 864.0);
    }
}

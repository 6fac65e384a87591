//! Reactor state vector.

use serde::{Deserialize, Serialize};

use crate::constants::PRECURSOR_GROUPS;
use crate::error::{PhysicsError, PhysicsResult};

/// Number of state variables.
pub const STATE_LEN: usize = 12;

/// Relative neutron power.
pub const N_R: usize = 0;
/// First delayed-neutron precursor group; groups occupy `CR1..CR1 + 6`.
pub const CR1: usize = 1;
pub const XENON: usize = 7;
pub const IODINE: usize = 8;
pub const FUEL_TEMP: usize = 9;
pub const MODERATOR_TEMP: usize = 10;
pub const COOLANT_TEMP: usize = 11;

/// `[n_r, Cr1..Cr6, X, I, Tf, Tm, Tc]`, temperatures in kelvin.
///
/// The same layout is used for state derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactorState(pub [f64; STATE_LEN]);

impl ReactorState {
    pub fn zeros() -> Self {
        Self([0.0; STATE_LEN])
    }

    /// Build a state from a slice, rejecting anything but 12 elements.
    pub fn from_slice(values: &[f64]) -> PhysicsResult<Self> {
        let arr: [f64; STATE_LEN] =
            values
                .try_into()
                .map_err(|_| PhysicsError::StateLength {
                    expected: STATE_LEN,
                    actual: values.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_array(&self) -> &[f64; STATE_LEN] {
        &self.0
    }

    pub fn power(&self) -> f64 {
        self.0[N_R]
    }

    /// Precursor concentration for group `group` in `0..6`.
    pub fn precursor(&self, group: usize) -> f64 {
        debug_assert!(group < PRECURSOR_GROUPS);
        self.0[CR1 + group]
    }

    pub fn precursors(&self) -> &[f64] {
        &self.0[CR1..CR1 + PRECURSOR_GROUPS]
    }

    pub fn xenon(&self) -> f64 {
        self.0[XENON]
    }

    pub fn iodine(&self) -> f64 {
        self.0[IODINE]
    }

    pub fn fuel_temp(&self) -> f64 {
        self.0[FUEL_TEMP]
    }

    pub fn moderator_temp(&self) -> f64 {
        self.0[MODERATOR_TEMP]
    }

    pub fn coolant_temp(&self) -> f64 {
        self.0[COOLANT_TEMP]
    }

    /// Element-wise sum `self + other`.
    pub fn add(&self, other: &ReactorState) -> ReactorState {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0.iter()) {
            *o += b;
        }
        ReactorState(out)
    }

    /// Element-wise scaling `factor * self`.
    pub fn scale(&self, factor: f64) -> ReactorState {
        let mut out = self.0;
        for o in out.iter_mut() {
            *o *= factor;
        }
        ReactorState(out)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<[f64; STATE_LEN]> for ReactorState {
    fn from(values: [f64; STATE_LEN]) -> Self {
        Self(values)
    }
}

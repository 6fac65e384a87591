//! Documented starting points for each drum layout.

use crate::config::ReactorConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::state::{
    COOLANT_TEMP, CR1, FUEL_TEMP, IODINE, MODERATOR_TEMP, N_R, ReactorState, STATE_LEN, XENON,
};

/// Initial `(Tf, Tm, Tc)` in kelvin for a drum layout.
pub fn initial_temperatures(num_drums: u32) -> PhysicsResult<(f64, f64, f64)> {
    match num_drums {
        8 => Ok((900.0, 898.0, 883.0)),
        4 => Ok((875.0, 873.5, 870.0)),
        2 => Ok((890.0, 888.0, 877.0)),
        1 => Ok((897.0, 895.0, 881.0)),
        n => Err(PhysicsError::UnsupportedDrumCount { num_drums: n }),
    }
}

/// Near-equilibrium state at relative power `power`.
///
/// Power and all six precursor groups start at `power`, xenon and iodine at
/// the configuration's equilibrium concentrations.
pub fn initial_state(
    num_drums: u32,
    power: f64,
    config: &ReactorConfig,
) -> PhysicsResult<ReactorState> {
    let (tf, tm, tc) = initial_temperatures(num_drums)?;
    let mut x = [0.0; STATE_LEN];
    x[N_R] = power;
    for cr in &mut x[CR1..CR1 + 6] {
        *cr = power;
    }
    x[XENON] = config.xe0;
    x[IODINE] = config.i0;
    x[FUEL_TEMP] = tf;
    x[MODERATOR_TEMP] = tm;
    x[COOLANT_TEMP] = tc;
    Ok(ReactorState(x))
}

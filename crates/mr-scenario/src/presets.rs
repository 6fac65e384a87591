//! Built-in load-following profiles and controller gains per drum layout.

use mr_controls::{ControllerConfig, ControllerKind};
use mr_physics::{PhysicsError, PhysicsResult, lookup_drum_parameters};

use crate::reference::Breakpoint;

/// Seconds per profile time unit.
pub const TIME_SCALE_S: f64 = 30.0;
pub const PRESET_DT_S: f64 = 0.1;
pub const PRESET_T_END_S: f64 = 200.0 * TIME_SCALE_S;

const PROFILE_TIMES: [f64; 10] = [0.0, 20.0, 30.0, 50.0, 60.0, 80.0, 90.0, 110.0, 130.0, 200.0];

/// Reactivity per degree the PID gains were tuned against.
const PID_TUNING_REACTIVITY: f64 = 26.11e-5;

fn profile_powers(num_drums: u32) -> PhysicsResult<[f64; 10]> {
    match num_drums {
        8 => Ok([1.0, 1.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 1.0, 1.0]),
        4 => Ok([0.3, 0.3, 1.0, 1.0, 0.6, 0.6, 0.8, 0.8, 1.0, 1.0]),
        2 => Ok([0.7, 0.7, 0.4, 0.4, 0.4, 0.8, 0.8, 0.8, 1.0, 1.0]),
        1 => Ok([0.9, 0.9, 0.7, 0.7, 0.5, 0.5, 0.7, 0.7, 1.0, 1.0]),
        n => Err(PhysicsError::UnsupportedDrumCount { num_drums: n }),
    }
}

/// Load-following breakpoints for a drum layout.
pub fn reference_breakpoints(num_drums: u32) -> PhysicsResult<Vec<Breakpoint>> {
    let powers = profile_powers(num_drums)?;
    Ok(PROFILE_TIMES
        .iter()
        .zip(powers)
        .map(|(&t, power)| Breakpoint {
            time_s: t * TIME_SCALE_S,
            power,
        })
        .collect())
}

/// Tuned gains for `kind` on a drum layout.
pub fn default_controller(kind: ControllerKind, num_drums: u32) -> PhysicsResult<ControllerConfig> {
    // Presets exist only where a profile does.
    profile_powers(num_drums)?;
    let drum = lookup_drum_parameters(num_drums);
    Ok(match kind {
        ControllerKind::Supertwisting => ControllerConfig::Supertwisting {
            lambda: 0.001,
            w: drum.w,
            t_c: 0.5,
            max_val: 180.0,
            min_val: 0.0,
            max_rate: 0.5,
            u0: drum.u0,
        },
        ControllerKind::Pid => {
            let s = PID_TUNING_REACTIVITY / drum.reactivity_per_degree;
            ControllerConfig::Pid {
                kp: 2.0 * s,
                ki: 5.0 * s,
                kd: 0.001 * s,
                kaw: 0.3 * s,
                t_c: 0.2,
                max_val: 180.0,
                min_val: 0.0,
                max_rate: 0.5 * s,
                u0: drum.u0,
            }
        }
    })
}

//! Controller selection and per-loop ownership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorLimits;
use crate::derivative::FilteredDerivative;
use crate::error::{ControlError, ControlResult};
use crate::pid::{PIDController, PIDControllerState};
use crate::supertwisting::{SupertwistingController, SupertwistingState};

/// Available control laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    Supertwisting,
    Pid,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 2] = [ControllerKind::Supertwisting, ControllerKind::Pid];

    /// Short label used in file names and reports.
    pub fn label(self) -> &'static str {
        match self {
            ControllerKind::Supertwisting => "STC",
            ControllerKind::Pid => "PID",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ControllerKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stc" | "supertwisting" => Ok(ControllerKind::Supertwisting),
            "pid" => Ok(ControllerKind::Pid),
            _ => Err(ControlError::UnknownKind {
                name: s.to_string(),
            }),
        }
    }
}

/// Controller parameters as written in scenario files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerConfig {
    Supertwisting {
        lambda: f64,
        w: f64,
        t_c: f64,
        max_val: f64,
        min_val: f64,
        max_rate: f64,
        u0: f64,
    },
    Pid {
        kp: f64,
        ki: f64,
        kd: f64,
        kaw: f64,
        t_c: f64,
        max_val: f64,
        min_val: f64,
        max_rate: f64,
        u0: f64,
    },
}

impl ControllerConfig {
    pub fn kind(&self) -> ControllerKind {
        match self {
            ControllerConfig::Supertwisting { .. } => ControllerKind::Supertwisting,
            ControllerConfig::Pid { .. } => ControllerKind::Pid,
        }
    }

    /// Baseline drum angle the loop starts from.
    pub fn u0(&self) -> f64 {
        match self {
            ControllerConfig::Supertwisting { u0, .. } | ControllerConfig::Pid { u0, .. } => *u0,
        }
    }

    pub fn limits(&self) -> ControlResult<ActuatorLimits> {
        match *self {
            ControllerConfig::Supertwisting {
                max_val,
                min_val,
                max_rate,
                ..
            }
            | ControllerConfig::Pid {
                max_val,
                min_val,
                max_rate,
                ..
            } => ActuatorLimits::new(min_val, max_val, max_rate),
        }
    }
}

/// One control law paired with its private running state.
///
/// Exactly one `Controller` drives one control loop; it is not meant to be
/// shared between loops or called concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    Supertwisting {
        law: SupertwistingController,
        state: SupertwistingState,
    },
    Pid {
        law: PIDController,
        state: PIDControllerState,
    },
}

impl Controller {
    /// Build a controller and its initial state from configuration.
    pub fn from_config(config: &ControllerConfig) -> ControlResult<Self> {
        let limits = config.limits()?;
        match *config {
            ControllerConfig::Supertwisting {
                lambda, w, t_c, u0, ..
            } => {
                let law =
                    SupertwistingController::new(lambda, w, FilteredDerivative::new(t_c)?, limits)?;
                let state = law.initial_state(u0)?;
                Ok(Controller::Supertwisting { law, state })
            }
            ControllerConfig::Pid {
                kp,
                ki,
                kd,
                kaw,
                t_c,
                u0,
                ..
            } => {
                let law = PIDController::new(kp, ki, kd, kaw, FilteredDerivative::new(t_c)?, limits)?;
                let state = law.initial_state(u0)?;
                Ok(Controller::Pid { law, state })
            }
        }
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            Controller::Supertwisting { .. } => ControllerKind::Supertwisting,
            Controller::Pid { .. } => ControllerKind::Pid,
        }
    }

    pub fn limits(&self) -> &ActuatorLimits {
        match self {
            Controller::Supertwisting { law, .. } => &law.limits,
            Controller::Pid { law, .. } => &law.limits,
        }
    }

    /// Most recent applied command.
    pub fn last_command(&self) -> f64 {
        match self {
            Controller::Supertwisting { state, .. } => state.history.command_sat_prev,
            Controller::Pid { state, .. } => state.history.command_sat_prev,
        }
    }

    /// Advance the loop to time `t` and return the applied drum command.
    pub fn update(&mut self, t: f64, measurement: f64, setpoint: f64) -> f64 {
        match self {
            Controller::Supertwisting { law, state } => {
                let (next, command) = law.update(state, t, measurement, setpoint);
                *state = next;
                command
            }
            Controller::Pid { law, state } => {
                let (next, command) = law.update(state, t, measurement, setpoint);
                *state = next;
                command
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn pid_config(max_rate: f64) -> ControllerConfig {
        ControllerConfig::Pid {
            kp: 18.85,
            ki: 47.1,
            kd: 0.0094,
            kaw: 2.83,
            t_c: 0.2,
            max_val: 180.0,
            min_val: 0.0,
            max_rate,
            u0: 170.0,
        }
    }

    fn stc_config(max_rate: f64) -> ControllerConfig {
        ControllerConfig::Supertwisting {
            lambda: 5.0,
            w: 20.0,
            t_c: 0.5,
            max_val: 180.0,
            min_val: 0.0,
            max_rate,
            u0: 170.0,
        }
    }

    proptest! {
        #[test]
        fn commands_stay_in_range_and_rate(
            measurements in prop::collection::vec(-5.0_f64..5.0, 1..200),
            setpoints in prop::collection::vec(-5.0_f64..5.0, 200),
            steps in prop::collection::vec(0.001_f64..1.0, 200),
            max_rate in 0.0_f64..50.0,
            use_pid in any::<bool>(),
        ) {
            let cfg = if use_pid { pid_config(max_rate) } else { stc_config(max_rate) };
            let mut controller = Controller::from_config(&cfg).unwrap();
            let mut t = 0.0;
            let mut prev = controller.last_command();
            for (i, &y) in measurements.iter().enumerate() {
                t += steps[i];
                let u = controller.update(t, y, setpoints[i]);
                prop_assert!((0.0..=180.0).contains(&u));
                prop_assert!((u - prev).abs() <= max_rate * steps[i] + 1e-9);
                prev = u;
            }
        }

        #[test]
        fn pid_zero_error_keeps_integral(
            level in 0.0_f64..2.0,
            steps in prop::collection::vec(0.001_f64..1.0, 1..100),
        ) {
            let mut controller = Controller::from_config(&pid_config(0.5)).unwrap();
            let mut t = 0.0;
            for dt in steps {
                t += dt;
                let u = controller.update(t, level, level);
                prop_assert_eq!(u, 170.0);
                if let Controller::Pid { state, .. } = &controller {
                    prop_assert_eq!(state.integral, 170.0);
                }
            }
        }
    }
}

//! Scenario validation logic.

use mr_physics::{STATE_LEN, SUPPORTED_DRUM_COUNTS};

use crate::reference::ReferenceProfile;
use crate::schema::{ControllerDef, Scenario};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if !SUPPORTED_DRUM_COUNTS.contains(&scenario.num_drums) {
        return Err(ValidationError::Unsupported {
            feature: format!("num_drums = {}", scenario.num_drums),
            reason: format!("supported drum counts are {:?}", SUPPORTED_DRUM_COUNTS),
        });
    }

    let time = &scenario.time;
    if !(time.dt_s.is_finite() && time.dt_s > 0.0) {
        return Err(invalid("time.dt_s", time.dt_s, "must be positive and finite"));
    }
    if !time.t_end_s.is_finite() || time.t_end_s < time.dt_s {
        return Err(invalid(
            "time.t_end_s",
            time.t_end_s,
            "must be finite and at least one time step",
        ));
    }
    if (time.t_end_s / time.dt_s).round() >= usize::MAX as f64 {
        return Err(invalid(
            "time.t_end_s",
            time.t_end_s,
            "too many time steps for dt_s",
        ));
    }

    if let Some(reference) = &scenario.reference {
        ReferenceProfile::new(reference.breakpoints.clone())?;
    }

    if let Some(x0) = &scenario.initial_state {
        if x0.len() != STATE_LEN {
            return Err(invalid(
                "initial_state",
                format!("{} elements", x0.len()),
                "must have exactly 12 elements",
            ));
        }
        if let Some(v) = x0.iter().find(|v| !v.is_finite()) {
            return Err(invalid("initial_state", v, "must be finite"));
        }
    }

    if let Some(reactor) = &scenario.reactor {
        for (field, value) in [("reactor.tf0_k", reactor.tf0_k), ("reactor.tm0_k", reactor.tm0_k)] {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(invalid(field, v, "must be a positive temperature"));
            }
        }
    }

    validate_controller(&scenario.controller)
}

fn validate_controller(def: &ControllerDef) -> Result<(), ValidationError> {
    let gains: Vec<(&str, Option<f64>)> = match def {
        ControllerDef::Supertwisting { lambda, w, t_c, .. } => {
            vec![("lambda", *lambda), ("w", *w), ("t_c", *t_c)]
        }
        ControllerDef::Pid {
            kp,
            ki,
            kd,
            kaw,
            t_c,
            ..
        } => vec![
            ("kp", *kp),
            ("ki", *ki),
            ("kd", *kd),
            ("kaw", *kaw),
            ("t_c", *t_c),
        ],
    };
    for (name, value) in gains {
        if let Some(v) = value
            && !v.is_finite()
        {
            return Err(invalid(&format!("controller.{name}"), v, "must be finite"));
        }
    }

    let act = def.actuator();
    let t_c = match def {
        ControllerDef::Supertwisting { t_c, .. } | ControllerDef::Pid { t_c, .. } => *t_c,
    };
    if let Some(t_c) = t_c
        && t_c <= 0.0
    {
        return Err(invalid("controller.t_c", t_c, "filter constant must be positive"));
    }
    if let Some(rate) = act.max_rate
        && !(rate.is_finite() && rate >= 0.0)
    {
        return Err(invalid("controller.max_rate", rate, "must be non-negative"));
    }
    if let (Some(lo), Some(hi)) = (act.min_val, act.max_val)
        && !(lo < hi)
    {
        return Err(invalid(
            "controller.min_val",
            lo,
            "must be below controller.max_val",
        ));
    }
    Ok(())
}

//! Scenario schema definitions.

use mr_controls::ControllerKind;
use serde::{Deserialize, Serialize};

pub use crate::reference::Breakpoint;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub num_drums: u32,
    pub controller: ControllerDef,
    #[serde(default)]
    pub time: TimeDef,
    /// Power reference; the drum-count preset is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceDef>,
    /// Full 12-element initial state; the drum-count preset is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactor: Option<ReactorOverridesDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default = "default_dt_s")]
    pub dt_s: f64,
    #[serde(default = "default_t_end_s")]
    pub t_end_s: f64,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            dt_s: default_dt_s(),
            t_end_s: default_t_end_s(),
        }
    }
}

fn default_dt_s() -> f64 {
    crate::presets::PRESET_DT_S
}

fn default_t_end_s() -> f64 {
    crate::presets::PRESET_T_END_S
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceDef {
    pub breakpoints: Vec<Breakpoint>,
}

/// Reference temperatures (K) overriding the 1105/1087 defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReactorOverridesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tf0_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm0_k: Option<f64>,
}

/// Controller choice with optional overrides of the preset gains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControllerDef {
    Supertwisting {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lambda: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        w: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t_c: Option<f64>,
        #[serde(flatten)]
        actuator: ActuatorDef,
    },
    Pid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kp: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ki: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kd: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kaw: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t_c: Option<f64>,
        #[serde(flatten)]
        actuator: ActuatorDef,
    },
}

impl ControllerDef {
    /// Controller of `kind` with every parameter taken from the preset.
    pub fn preset(kind: ControllerKind) -> Self {
        match kind {
            ControllerKind::Supertwisting => ControllerDef::Supertwisting {
                lambda: None,
                w: None,
                t_c: None,
                actuator: ActuatorDef::default(),
            },
            ControllerKind::Pid => ControllerDef::Pid {
                kp: None,
                ki: None,
                kd: None,
                kaw: None,
                t_c: None,
                actuator: ActuatorDef::default(),
            },
        }
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            ControllerDef::Supertwisting { .. } => ControllerKind::Supertwisting,
            ControllerDef::Pid { .. } => ControllerKind::Pid,
        }
    }

    pub fn actuator(&self) -> &ActuatorDef {
        match self {
            ControllerDef::Supertwisting { actuator, .. } | ControllerDef::Pid { actuator, .. } => {
                actuator
            }
        }
    }
}

/// Actuator overrides shared by both controller kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActuatorDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u0: Option<f64>,
}

impl Scenario {
    /// Scenario for `num_drums` and `kind` using presets throughout.
    pub fn preset(num_drums: u32, kind: ControllerKind) -> Self {
        Self {
            version: crate::validate::LATEST_VERSION,
            name: format!("{}-drum {}", num_drums, kind.label()),
            num_drums,
            controller: ControllerDef::preset(kind),
            time: TimeDef::default(),
            reference: None,
            initial_state: None,
            reactor: None,
        }
    }

    pub fn with_time(mut self, dt_s: f64, t_end_s: f64) -> Self {
        self.time = TimeDef { dt_s, t_end_s };
        self
    }
}

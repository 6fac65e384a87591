//! Turn a scenario file into a ready-to-run simulation case.

use mr_controls::ControllerConfig;
use mr_core::units::k;
use mr_physics::{PHYSICS, ReactorConfig, ReactorState, initial_state};
use mr_sim::{SimCase, TimeGrid};

use crate::presets::{default_controller, reference_breakpoints};
use crate::reference::ReferenceProfile;
use crate::schema::{ActuatorDef, ControllerDef, Scenario};
use crate::validate::validate_scenario;
use crate::ScenarioResult;

impl Scenario {
    /// Reference profile, either explicit or the drum-count preset.
    pub fn reference_profile(&self) -> ScenarioResult<ReferenceProfile> {
        let breakpoints = match &self.reference {
            Some(def) => def.breakpoints.clone(),
            None => reference_breakpoints(self.num_drums)?,
        };
        Ok(ReferenceProfile::new(breakpoints)?)
    }

    pub fn reactor_config(&self) -> ScenarioResult<ReactorConfig> {
        let mut config = ReactorConfig::for_drums(self.num_drums, &PHYSICS);
        if let Some(overrides) = &self.reactor {
            let tf0 = overrides.tf0_k.unwrap_or(config.tf0);
            let tm0 = overrides.tm0_k.unwrap_or(config.tm0);
            config = config.with_reference_temperatures(k(tf0), k(tm0));
        }
        config.validate(&PHYSICS)?;
        Ok(config)
    }

    /// Preset gains for the chosen controller with file overrides applied.
    pub fn controller_config(&self) -> ScenarioResult<ControllerConfig> {
        let mut config = default_controller(self.controller.kind(), self.num_drums)?;
        match &self.controller {
            ControllerDef::Supertwisting {
                lambda,
                w,
                t_c,
                actuator,
            } => {
                if let ControllerConfig::Supertwisting {
                    lambda: c_lambda,
                    w: c_w,
                    t_c: c_t_c,
                    max_val,
                    min_val,
                    max_rate,
                    u0,
                } = &mut config
                {
                    override_with(c_lambda, *lambda);
                    override_with(c_w, *w);
                    override_with(c_t_c, *t_c);
                    apply_actuator(actuator, max_val, min_val, max_rate, u0);
                }
            }
            ControllerDef::Pid {
                kp,
                ki,
                kd,
                kaw,
                t_c,
                actuator,
            } => {
                if let ControllerConfig::Pid {
                    kp: c_kp,
                    ki: c_ki,
                    kd: c_kd,
                    kaw: c_kaw,
                    t_c: c_t_c,
                    max_val,
                    min_val,
                    max_rate,
                    u0,
                } = &mut config
                {
                    override_with(c_kp, *kp);
                    override_with(c_ki, *ki);
                    override_with(c_kd, *kd);
                    override_with(c_kaw, *kaw);
                    override_with(c_t_c, *t_c);
                    apply_actuator(actuator, max_val, min_val, max_rate, u0);
                }
            }
        }
        config.limits()?;
        Ok(config)
    }

    /// Validate and expand into a simulation case.
    pub fn resolve(&self) -> ScenarioResult<SimCase> {
        validate_scenario(self)?;
        let reactor = self.reactor_config()?;
        let controller = self.controller_config()?;
        let grid = TimeGrid::new(self.time.dt_s, self.time.t_end_s)?;
        let profile = self.reference_profile()?;
        let reference = profile.sample(&grid.times());
        let initial_state = match &self.initial_state {
            Some(values) => ReactorState::from_slice(values)?,
            None => initial_state(self.num_drums, reference[0], &reactor)?,
        };
        tracing::debug!(
            name = %self.name,
            num_drums = self.num_drums,
            controller = %self.controller.kind(),
            n_steps = grid.n_steps(),
            "scenario resolved"
        );
        Ok(SimCase {
            label: self.name.clone(),
            reactor,
            controller,
            grid,
            initial_state,
            reference,
        })
    }
}

fn override_with(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn apply_actuator(
    def: &ActuatorDef,
    max_val: &mut f64,
    min_val: &mut f64,
    max_rate: &mut f64,
    u0: &mut f64,
) {
    override_with(max_val, def.max_val);
    override_with(min_val, def.min_val);
    override_with(max_rate, def.max_rate);
    override_with(u0, def.u0);
}

//! mr-scenario: scenario file format, presets and validation.

pub mod presets;
pub mod reference;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use reference::ReferenceProfile;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario};

use std::path::Path;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Reactor error: {0}")]
    Physics(#[from] mr_physics::PhysicsError),

    #[error("Controller error: {0}")]
    Control(#[from] mr_controls::ControlError),

    #[error("Simulation setup error: {0}")]
    Sim(#[from] mr_sim::SimError),

    #[error("Unsupported file extension: {path}")]
    UnsupportedExtension { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a scenario, picking the format from the file extension.
pub fn load(path: &Path) -> ScenarioResult<Scenario> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let scenario = match ext.as_deref() {
        Some("yaml") | Some("yml") => load_yaml(path)?,
        Some("json") => load_json(path)?,
        _ => {
            return Err(ScenarioError::UnsupportedExtension {
                path: path.display().to_string(),
            });
        }
    };
    tracing::debug!(name = %scenario.name, path = %path.display(), "scenario loaded");
    Ok(scenario)
}

use std::path::PathBuf;

use mr_controls::ControllerKind;
use mr_scenario::{ControllerDef, Scenario, load, load_json, load_yaml, save_json, save_yaml};

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("scenarios")
}

#[test]
fn bundled_scenarios_validate_and_resolve() {
    let files = [
        "01_eight_drum_stc.yaml",
        "02_four_drum_pid.yaml",
        "03_one_drum_step.yaml",
        "04_two_drum_hold.yaml",
    ];
    for rel in files {
        let path = scenarios_dir().join(rel);
        let scenario = load_yaml(&path)
            .unwrap_or_else(|e| panic!("scenario failed to load: {} => {e}", path.display()));
        let case = scenario
            .resolve()
            .unwrap_or_else(|e| panic!("scenario failed to resolve: {} => {e}", path.display()));
        assert_eq!(case.reference.len(), case.grid.len());
    }
}

#[test]
fn step_scenario_keeps_preset_gains_it_does_not_override() {
    let scenario = load(&scenarios_dir().join("03_one_drum_step.yaml")).unwrap();
    assert_eq!(scenario.controller.kind(), ControllerKind::Pid);
    match &scenario.controller {
        ControllerDef::Pid { kp, ki, actuator, .. } => {
            assert_eq!(*kp, Some(0.25));
            assert_eq!(*ki, None);
            assert_eq!(actuator.max_rate, Some(0.5));
        }
        other => panic!("unexpected controller {other:?}"),
    }
    let case = scenario.resolve().unwrap();
    assert_eq!(case.initial_state.power(), 0.9);
    assert_eq!(*case.reference.last().unwrap(), 0.7);
}

#[test]
fn roundtrip_yaml_preset() {
    let scenario = Scenario::preset(8, ControllerKind::Supertwisting).with_time(0.1, 30.0);
    let path = std::env::temp_dir().join("mr_scenario_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), scenario);
}

#[test]
fn roundtrip_json_with_initial_state() {
    let mut scenario = Scenario::preset(2, ControllerKind::Pid).with_time(0.2, 4.0);
    let case = scenario.resolve().unwrap();
    scenario.initial_state = Some(case.initial_state.as_array().to_vec());
    let path = std::env::temp_dir().join("mr_scenario_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    assert_eq!(load_json(&path).unwrap(), scenario);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("mr_scenario.toml");
    std::fs::write(&path, "").unwrap();
    assert!(load(&path).is_err());
}

#[test]
fn three_drum_file_is_rejected() {
    let yaml = "version: 1\nname: bad\nnum_drums: 3\ncontroller:\n  type: Pid\n";
    let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
    assert!(mr_scenario::validate_scenario(&scenario).is_err());
    assert!(scenario.resolve().is_err());
}

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use mr_controls::ControllerKind;
use mr_results::{RunFilter, RunManifest, RunStore, TimeseriesRecord};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(run_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: "test".to_string(),
        timestamp: timestamp.to_string(),
        controller: ControllerKind::Pid,
        num_drums: 4,
        dt_s: 0.1,
        t_end_s: 0.1,
        steps: 1,
        solver_version: "0.1.0".to_string(),
    }
}

fn record(time_s: f64) -> TimeseriesRecord {
    let mut state = [0.0; 12];
    state[0] = 0.3;
    TimeseriesRecord {
        time_s,
        state,
        command: 108.5,
        reactivity: 1.0e-5,
        reference: 0.3,
    }
}

#[test]
fn save_list_load_roundtrip() {
    let scenario_dir = unique_temp_dir("mr_results_scenario");
    fs::create_dir_all(&scenario_dir).expect("failed to create temp scenario dir");
    let scenario_path = scenario_dir.join("scenario.yaml");

    let store = RunStore::for_scenario(&scenario_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with("runs"));

    let records = vec![record(0.0), record(0.1)];
    store
        .save_run(&manifest("run-b", "2026-02-26T00:00:01+00:00"), &records)
        .expect("failed to save run");
    store
        .save_run(&manifest("run-a", "2026-02-26T00:00:00+00:00"), &records)
        .expect("failed to save run");

    let runs = store.list_runs().expect("failed to list runs");
    let ids: Vec<&str> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, ["run-a", "run-b"]);

    assert!(store.has_run("run-a"));
    let loaded_manifest = store.load_manifest("run-a").expect("failed to load manifest");
    assert_eq!(loaded_manifest, manifest("run-a", "2026-02-26T00:00:00+00:00"));

    let loaded_records = store.load_timeseries("run-a").expect("failed to load records");
    assert_eq!(loaded_records, records);
}

#[test]
fn delete_and_missing_runs() {
    let store = RunStore::new(unique_temp_dir("mr_results_delete")).unwrap();
    store
        .save_run(&manifest("gone", "2026-01-01T00:00:00+00:00"), &[record(0.0)])
        .unwrap();
    store.delete_run("gone").unwrap();
    assert!(!store.has_run("gone"));
    assert!(store.load_manifest("gone").is_err());
    assert!(store.load_timeseries("gone").is_err());
    // deleting twice is fine
    store.delete_run("gone").unwrap();
    assert!(store.list_runs().unwrap().is_empty());
}

#[test]
fn listing_filters_on_manifest_fields() {
    let store = RunStore::new(unique_temp_dir("mr_results_filter")).unwrap();
    let ts = "2026-03-01T00:00:00+00:00";
    let mut stc = manifest("stc-8", ts);
    stc.scenario_name = "8-drum STC".to_string();
    stc.controller = ControllerKind::Supertwisting;
    stc.num_drums = 8;
    store.save_run(&stc, &[record(0.0)]).unwrap();
    store.save_run(&manifest("pid-4b", ts), &[record(0.0)]).unwrap();
    store.save_run(&manifest("pid-4a", ts), &[record(0.0)]).unwrap();
    // A stray directory without a manifest is not a run.
    fs::create_dir_all(store.root_dir().join("scratch")).unwrap();

    let ids = |filter: &RunFilter| -> Vec<String> {
        store
            .list_runs_matching(filter)
            .unwrap()
            .into_iter()
            .map(|m| m.run_id)
            .collect()
    };

    // Equal timestamps fall back to run ID order.
    assert_eq!(ids(&RunFilter::default()), ["pid-4a", "pid-4b", "stc-8"]);
    assert_eq!(ids(&RunFilter::scenario("8-drum STC")), ["stc-8"]);
    assert_eq!(ids(&RunFilter::scenario("test")), ["pid-4a", "pid-4b"]);
    let pid_eight = RunFilter {
        controller: Some(ControllerKind::Pid),
        num_drums: Some(8),
        ..RunFilter::default()
    };
    assert!(ids(&pid_eight).is_empty());
    let eight = RunFilter {
        num_drums: Some(8),
        ..RunFilter::default()
    };
    assert_eq!(ids(&eight), ["stc-8"]);
}

#[test]
fn json_values_survive_bit_for_bit() {
    let store = RunStore::new(unique_temp_dir("mr_results_bits")).unwrap();
    let mut rec = record(0.1 * 3.0);
    rec.reactivity = 1.0e-5 / 3.0;
    rec.state[1] = std::f64::consts::PI * 1.0e-7;
    rec.command = 77.56 + 0.1 * 0.2;
    store.save_run(&manifest("bits", "2026-03-02T00:00:00+00:00"), &[rec.clone()]).unwrap();

    let loaded = store.load_timeseries("bits").unwrap();
    assert_eq!(loaded[0].time_s.to_bits(), rec.time_s.to_bits());
    assert_eq!(loaded[0].reactivity.to_bits(), rec.reactivity.to_bits());
    assert_eq!(loaded[0].state[1].to_bits(), rec.state[1].to_bits());
    assert_eq!(loaded[0].command.to_bits(), rec.command.to_bits());
}

//! Content-based hashing for run IDs.

use mr_scenario::Scenario;
use sha2::{Digest, Sha256};

pub fn compute_run_id(scenario: &Scenario, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mr_controls::ControllerKind;

    #[test]
    fn hash_stability() {
        let scenario = Scenario::preset(8, ControllerKind::Pid);
        let hash1 = compute_run_id(&scenario, "v1");
        let hash2 = compute_run_id(&scenario.clone(), "v1");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = Scenario::preset(8, ControllerKind::Pid);
        let b = Scenario::preset(8, ControllerKind::Supertwisting);
        assert_ne!(compute_run_id(&a, "v1"), compute_run_id(&b, "v1"));
        assert_ne!(compute_run_id(&a, "v1"), compute_run_id(&a, "v2"));
    }
}

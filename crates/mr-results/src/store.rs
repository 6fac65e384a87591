//! Run storage API.

use crate::types::{RunManifest, TimeseriesRecord};
use crate::{ResultsError, ResultsResult};
use mr_controls::ControllerKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest criteria for [`RunStore::list_runs_matching`]. Unset fields
/// match every run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunFilter {
    pub scenario_name: Option<String>,
    pub controller: Option<ControllerKind>,
    pub num_drums: Option<u32>,
}

impl RunFilter {
    pub fn scenario(name: impl Into<String>) -> Self {
        Self {
            scenario_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, manifest: &RunManifest) -> bool {
        self.scenario_name
            .as_deref()
            .is_none_or(|name| manifest.scenario_name == name)
            && self.controller.is_none_or(|c| manifest.controller == c)
            && self.num_drums.is_none_or(|n| manifest.num_drums == n)
    }
}

/// Directory of cached runs, one subdirectory per run ID.
#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store kept next to a scenario file, under `.microreactor/runs`.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let scenario_dir = scenario_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "scenario path has no parent directory".to_string(),
            })?;
        Self::new(scenario_dir.join(".microreactor").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        records: &[TimeseriesRecord],
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join("manifest.json"), manifest_json)?;

        let mut timeseries_content = String::new();
        for record in records {
            timeseries_content.push_str(&serde_json::to_string(record)?);
            timeseries_content.push('\n');
        }
        fs::write(run_dir.join("timeseries.jsonl"), timeseries_content)?;

        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<TimeseriesRecord>> {
        let timeseries_path = self.run_dir(run_id).join("timeseries.jsonl");

        if !timeseries_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(timeseries_path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(line)?);
            }
        }

        Ok(records)
    }

    /// All stored runs, oldest first.
    /// Every stored run, oldest first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        self.list_runs_matching(&RunFilter::default())
    }

    /// Stored runs whose manifest passes `filter`, oldest first. Runs saved
    /// in the same second are ordered by run ID.
    pub fn list_runs_matching(&self, filter: &RunFilter) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                // Directories without a readable manifest are skipped.
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && filter.matches(&manifest)
                {
                    runs.push(manifest);
                }
            }
        }

        // RFC 3339 timestamps in UTC sort lexicographically.
        runs.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

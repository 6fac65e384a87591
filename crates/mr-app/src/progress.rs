use mr_sim::SimProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    ResolvingScenario,
    CheckingCache,
    LoadingCachedResult,
    Simulating,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub simulation: Option<SimProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            simulation: None,
        }
    }
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::ResolvingScenario => "resolve",
            RunStage::CheckingCache => "cache",
            RunStage::LoadingCachedResult => "load",
            RunStage::Simulating => "simulate",
            RunStage::SavingResults => "save",
            RunStage::Completed => "done",
        }
    }
}

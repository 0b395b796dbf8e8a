//! Audit trail of one build: which stages ran, which were skipped and why.

use modeling_ops::DividerPlan;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::types::{BuildError, Stage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum StageStatus {
    Completed,
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
    /// Short human-readable summary of what the stage did.
    pub detail: String,
}

/// One fillet call: the stage that issued it and how many edges each
/// selected group contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilletGroup {
    pub stage: Stage,
    pub edge_counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub build_id: Uuid,
    pub name: String,
    pub stages: Vec<StageRecord>,
    pub dividers: Option<DividerPlan>,
    pub fillets: Vec<FilletGroup>,
}

impl BuildReport {
    pub fn new(name: &str) -> Self {
        Self {
            build_id: Uuid::new_v4(),
            name: name.to_string(),
            stages: Vec::new(),
            dividers: None,
            fillets: Vec::new(),
        }
    }

    pub fn completed(&mut self, stage: Stage, detail: impl Into<String>) {
        let detail = detail.into();
        info!(build = %self.build_id, %stage, %detail, "stage completed");
        self.stages.push(StageRecord {
            stage,
            status: StageStatus::Completed,
            detail,
        });
    }

    pub fn skipped(&mut self, stage: Stage, reason: impl Into<String>) {
        let reason = reason.into();
        info!(build = %self.build_id, %stage, %reason, "stage skipped");
        self.stages.push(StageRecord {
            stage,
            status: StageStatus::Skipped {
                reason: reason.clone(),
            },
            detail: reason,
        });
    }

    pub fn fillet(&mut self, stage: Stage, edge_counts: Vec<usize>) {
        self.fillets.push(FilletGroup { stage, edge_counts });
    }

    pub fn status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.status)
    }

    /// True if `stage` ran to completion.
    pub fn ran(&self, stage: Stage) -> bool {
        matches!(self.status(stage), Some(StageStatus::Completed))
    }

    pub fn fillets_in(&self, stage: Stage) -> impl Iterator<Item = &FilletGroup> {
        self.fillets.iter().filter(move |f| f.stage == stage)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lookup() {
        let mut report = BuildReport::new("Box");
        report.completed(Stage::Base, "cell 42x42");
        report.skipped(Stage::MagnetHoles, "magnets not requested");
        assert!(report.ran(Stage::Base));
        assert!(!report.ran(Stage::MagnetHoles));
        assert!(matches!(
            report.status(Stage::MagnetHoles),
            Some(StageStatus::Skipped { .. })
        ));
        assert_eq!(report.status(Stage::Rim), None);
    }

    #[test]
    fn test_report_serializes_stage_status() {
        let mut report = BuildReport::new("Box");
        report.skipped(Stage::Ledge, "too short");
        report.fillet(Stage::TopFillet, vec![8]);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stages"][0]["stage"], "Ledge");
        assert_eq!(value["stages"][0]["status"]["status"], "Skipped");
        assert_eq!(value["fillets"][0]["edge_counts"][0], 8);
    }

    #[test]
    fn test_build_ids_are_unique() {
        assert_ne!(BuildReport::new("a").build_id, BuildReport::new("a").build_id);
    }
}

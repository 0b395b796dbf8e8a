//! Build pipelines for parametric storage models.
//!
//! A build takes one validated parameter set, drives the kernel through a
//! fixed sequence of stages, and hands back a single named body together
//! with a [`BuildReport`]. A failed build never leaves a named body behind.

pub mod box_pipeline;
pub mod holster_pipeline;
pub mod report;
pub mod types;

use container_types::ShapeParams;
use modeling_ops::KernelBundle;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use box_pipeline::build_box;
pub use holster_pipeline::build_holster;
pub use report::{BuildReport, FilletGroup, StageRecord, StageStatus};
pub use types::{BuildConfig, BuildError, BuildOutcome, Stage};

/// A shape plus the settings to build it with, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub shape: ShapeParams,
    #[serde(default)]
    pub config: BuildConfig,
}

/// Validate `config` and `params` and run the matching pipeline.
pub fn build(
    kb: &mut dyn KernelBundle,
    params: &ShapeParams,
    config: &BuildConfig,
) -> Result<BuildOutcome, BuildError> {
    config.validate()?;
    params.validate()?;
    match params {
        ShapeParams::Box(p) => build_box(kb, p, config),
        ShapeParams::Holster(p) => build_holster(kb, p, config),
    }
}

/// Parse a [`BuildRequest`] and build it.
pub fn build_from_json(kb: &mut dyn KernelBundle, json: &str) -> Result<BuildOutcome, BuildError> {
    let request: BuildRequest = serde_json::from_str(json)?;
    info!(name = request.shape.name(), scale = request.config.units.scale, "build request");
    build(kb, &request.shape, &request.config)
}

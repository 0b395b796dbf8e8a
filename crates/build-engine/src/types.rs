use std::fmt;

use container_types::{GeometryError, UnitScale};
use geom_kernel::{BodyHandle, KernelError};
use modeling_ops::{OpError, SelectionError};
use serde::{Deserialize, Serialize};

use crate::report::BuildReport;

/// Named stages of both pipelines, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Base,
    MagnetHoles,
    EdgeRelief,
    GridPattern,
    BoxShell,
    Rim,
    TopFillet,
    Hollow,
    Indent,
    Ledge,
    Scoop,
    Dividers,
    HolsterBase,
    Pocket,
    FrontCut,
    Slot,
    EdgeFillet,
    /// Naming the finished body.
    Finish,
}

impl Stage {
    pub const BOX: [Stage; 12] = [
        Stage::Base,
        Stage::MagnetHoles,
        Stage::EdgeRelief,
        Stage::GridPattern,
        Stage::BoxShell,
        Stage::Rim,
        Stage::TopFillet,
        Stage::Hollow,
        Stage::Indent,
        Stage::Ledge,
        Stage::Scoop,
        Stage::Dividers,
    ];

    pub const HOLSTER: [Stage; 5] = [
        Stage::HolsterBase,
        Stage::Pocket,
        Stage::FrontCut,
        Stage::Slot,
        Stage::EdgeFillet,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Settings shared by every build, independent of the shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub units: UnitScale,
}

impl BuildConfig {
    pub fn with_units(units: UnitScale) -> Self {
        Self { units }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        self.units.validate().map_err(|err| BuildError::Config {
            reason: format!("units: {err}"),
        })
    }
}

/// A finished, named body and the audit trail of how it was built.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub body: BodyHandle,
    pub name: String,
    pub report: BuildReport,
}

/// Errors from a pipeline run. Every failure after validation names its stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("stage {stage}: expected exactly one match for {predicate}, found {matches}")]
    AmbiguousSelection {
        stage: Stage,
        predicate: String,
        matches: usize,
    },

    #[error("stage {stage}: kernel operation failed: {source}")]
    KernelOperationFailed {
        stage: Stage,
        #[source]
        source: KernelError,
    },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

impl BuildError {
    /// Attribute a modeling failure to `stage`.
    pub fn at(stage: Stage, err: impl Into<OpError>) -> Self {
        match err.into() {
            OpError::Kernel(source) | OpError::Selection(SelectionError::Kernel(source)) => {
                BuildError::KernelOperationFailed { stage, source }
            }
            OpError::Selection(SelectionError::Ambiguous {
                kind,
                predicate,
                matches,
            }) => BuildError::AmbiguousSelection {
                stage,
                predicate: format!("{kind} {predicate}"),
                matches,
            },
            OpError::Geometry(GeometryError::InvalidParameter { name, reason }) => {
                BuildError::InvalidParameter { name, reason }
            }
            OpError::Geometry(other) => BuildError::InvalidParameter {
                name: stage.to_string(),
                reason: other.to_string(),
            },
            OpError::InvalidParameter { reason } => BuildError::InvalidParameter {
                name: stage.to_string(),
                reason,
            },
        }
    }

    /// The stage a failure happened in, if it got past validation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            BuildError::AmbiguousSelection { stage, .. }
            | BuildError::KernelOperationFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Tag a modeling result with the stage that produced it.
pub(crate) trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, BuildError>;
}

impl<T, E: Into<OpError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, BuildError> {
        self.map_err(|e| BuildError::at(stage, e))
    }
}

impl From<GeometryError> for BuildError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidParameter { name, reason } => {
                BuildError::InvalidParameter { name, reason }
            }
            other => BuildError::InvalidParameter {
                name: "geometry".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::Config {
            reason: err.to_string(),
        }
    }
}

//! Helper functions: error type, canned parameter sets and build runners.

use build_engine::{BuildConfig, BuildError, BuildOutcome};
use container_types::{BoxParams, HolsterParams, ShapeParams, UnitScale};
use geom_kernel::{MockKernel, OpKind, OpMode, OpRecord};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    #[error("kernel query failed: {0}")]
    Kernel(#[from] geom_kernel::KernelError),

    #[error("selection failed: {0}")]
    Selection(#[from] modeling_ops::SelectionError),

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("no {kind} record in the kernel log")]
    MissingRecord { kind: String },
}

// ── Parameter Sets ──────────────────────────────────────────────────────────

/// Plain 2x2 box, 1.45 slots high, no optional features.
pub fn plain_box() -> BoxParams {
    BoxParams {
        name: "Plain Box".to_string(),
        slots_wide: 2,
        slots_deep: 2,
        slots_high: 1.45,
        divider_count: 0,
        include_scoop: false,
        include_ledge: false,
        include_magnets: false,
        base_only: false,
    }
}

pub fn holster(remote_width: f64, remote_thickness: f64, side_thickness: f64) -> HolsterParams {
    HolsterParams {
        name: "Remote Holster".to_string(),
        remote_width,
        remote_thickness,
        side_thickness,
        ..HolsterParams::default()
    }
}

// ── Build Runners ───────────────────────────────────────────────────────────

/// A finished (or failed) build with the kernel it ran on.
pub struct MockBuild {
    pub kernel: MockKernel,
    pub result: Result<BuildOutcome, BuildError>,
}

impl MockBuild {
    pub fn run(params: ShapeParams) -> Self {
        Self::run_with(params, UnitScale::default())
    }

    pub fn run_with(params: ShapeParams, units: UnitScale) -> Self {
        let mut kernel = MockKernel::with_tolerance(units.epsilon() / 10.0);
        let result = build_engine::build(&mut kernel, &params, &BuildConfig::with_units(units));
        Self { kernel, result }
    }

    pub fn box_(params: BoxParams) -> Self {
        Self::run(ShapeParams::Box(params))
    }

    pub fn holster(params: HolsterParams) -> Self {
        Self::run(ShapeParams::Holster(params))
    }

    /// The outcome, or the build error as a harness error.
    pub fn outcome(&self) -> Result<&BuildOutcome, HarnessError> {
        self.result.as_ref().map_err(|e| HarnessError::Build(e.clone()))
    }

    pub fn error(&self) -> Result<&BuildError, HarnessError> {
        match &self.result {
            Err(e) => Ok(e),
            Ok(outcome) => Err(HarnessError::AssertionFailed {
                detail: format!("expected failure, but {} was built", outcome.name),
            }),
        }
    }

    /// Kernel log entries matching `filter`.
    pub fn records<'a>(
        &'a self,
        filter: impl Fn(&OpKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a OpRecord> + 'a {
        self.kernel.log().iter().filter(move |r| filter(&r.kind))
    }

    /// The first extrude in the log: the body before anything was cut or joined.
    pub fn first_extrude(&self) -> Result<&OpRecord, HarnessError> {
        self.records(|k| matches!(k, OpKind::Extrude { mode: OpMode::NewBody, .. }))
            .next()
            .ok_or_else(|| HarnessError::MissingRecord {
                kind: "new-body extrude".to_string(),
            })
    }
}

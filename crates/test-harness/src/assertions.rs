//! Rich assertion helpers with diagnostic output.
//!
//! Every failure names the check context and includes the build report's
//! stage trail where one is available.

use build_engine::{BuildOutcome, BuildReport, Stage, StageStatus};
use container_types::{Axis, BoundingBox};
use geom_kernel::{BodyHandle, KernelIntrospect, MockKernel, TopoKind};
use modeling_ops::{GeometricSelector, Predicate};

use crate::helpers::HarnessError;

fn stage_trail(report: &BuildReport) -> String {
    report
        .stages
        .iter()
        .map(|r| match &r.status {
            StageStatus::Completed => format!("  {}: {}", r.stage, r.detail),
            StageStatus::Skipped { reason } => format!("  {}: skipped ({})", r.stage, reason),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert `stage` ran to completion.
pub fn assert_stage_ran(report: &BuildReport, stage: Stage, ctx: &str) -> Result<(), HarnessError> {
    if report.ran(stage) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] stage {stage} did not complete. Stages:\n{}",
                stage_trail(report)
            ),
        })
    }
}

/// Assert `stage` was recorded as skipped.
pub fn assert_stage_skipped(
    report: &BuildReport,
    stage: Stage,
    ctx: &str,
) -> Result<(), HarnessError> {
    match report.status(stage) {
        Some(StageStatus::Skipped { .. }) => Ok(()),
        other => Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] expected {stage} skipped, got {other:?}. Stages:\n{}",
                stage_trail(report)
            ),
        }),
    }
}

/// Assert the kernel holds exactly one body and it carries the outcome's name.
pub fn assert_single_named_body(
    kernel: &MockKernel,
    outcome: &BuildOutcome,
    ctx: &str,
) -> Result<(), HarnessError> {
    if kernel.body_count() != 1 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected 1 body, kernel holds {}", kernel.body_count()),
        });
    }
    let name = kernel.body_name(&outcome.body)?;
    if name.as_deref() != Some(outcome.name.as_str()) {
        return Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] body {} is named {name:?}, expected {:?}",
                outcome.body, outcome.name
            ),
        });
    }
    Ok(())
}

/// Assert the number of `kind` elements of `body` matching `predicate`.
pub fn assert_match_count(
    kernel: &MockKernel,
    selector: &GeometricSelector,
    body: &BodyHandle,
    kind: TopoKind,
    predicate: &Predicate,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let found = selector.select_all(kernel, body, kind, predicate)?;
    if found.len() == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] expected {expected} {kind}(s) matching {predicate}, found {}",
                found.len()
            ),
        })
    }
}

/// Assert the fillet calls `stage` made, as edge-group counts per call.
pub fn assert_fillet_groups(
    report: &BuildReport,
    stage: Stage,
    expected_calls: usize,
    groups_per_call: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let calls: Vec<_> = report.fillets_in(stage).collect();
    if calls.len() != expected_calls {
        return Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] {stage}: expected {expected_calls} fillet call(s), got {}",
                calls.len()
            ),
        });
    }
    for (i, call) in calls.iter().enumerate() {
        if call.edge_counts.len() != groups_per_call || call.edge_counts.contains(&0) {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{ctx}] {stage} call {i}: expected {groups_per_call} non-empty groups, got {:?}",
                    call.edge_counts
                ),
            });
        }
    }
    Ok(())
}

/// Assert the extent of `bbox` along `axis` within tolerance.
pub fn assert_extent(
    bbox: &BoundingBox,
    axis: Axis,
    expected: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = bbox.extent(axis);
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] extent along {axis:?}: expected {expected:.4}, got {actual:.4} (tol={tol})"
            ),
        })
    }
}

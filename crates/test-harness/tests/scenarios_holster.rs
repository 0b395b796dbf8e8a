//! End-to-end holster scenarios against MockKernel.

use approx::assert_relative_eq;
use build_engine::Stage;
use container_types::{Axis, UnitScale};
use geom_kernel::{OpKind, OpMode};
use modeling_ops::HolsterDimensions;
use test_harness::assertions::*;
use test_harness::helpers::holster;
use test_harness::MockBuild;

// ── Scenario 4: Base block size ─────────────────────────────────────────

#[test]
fn test_base_block_wraps_remote() {
    let build = MockBuild::holster(holster(80.0, 15.0, 3.0));
    let outcome = build.outcome().unwrap();
    let base = build.first_extrude().unwrap().tool_bounds.unwrap();

    // width + 2 side, thickness + side + back
    assert_extent(&base, Axis::X, 86.0, 1e-9, "base width").unwrap();
    assert_extent(&base, Axis::Y, 21.0, 1e-9, "base depth").unwrap();
    assert_extent(&base, Axis::Z, 47.0, 1e-9, "base height").unwrap();
    assert_single_named_body(&build.kernel, outcome, "holster").unwrap();
}

#[test]
fn test_holster_stage_order() {
    let build = MockBuild::holster(holster(80.0, 15.0, 3.0));
    let outcome = build.outcome().unwrap();
    let order: Vec<Stage> = outcome.report.stages.iter().map(|r| r.stage).collect();
    assert_eq!(order, Stage::HOLSTER.to_vec());
    for stage in Stage::HOLSTER {
        assert_stage_ran(&outcome.report, stage, "holster").unwrap();
    }
}

#[test]
fn test_three_cuts_then_one_fillet() {
    let build = MockBuild::holster(holster(80.0, 15.0, 3.0));
    build.outcome().unwrap();
    let kinds: Vec<&OpKind> = build.kernel.log().iter().map(|r| &r.kind).collect();
    let cuts = kinds
        .iter()
        .filter(|k| matches!(k, OpKind::Extrude { mode: OpMode::Cut, .. }))
        .count();
    assert_eq!(cuts, 3);
    assert!(matches!(kinds[kinds.len() - 2], OpKind::Fillet { rolling_ball: true, .. }));
    assert!(matches!(kinds[kinds.len() - 1], OpKind::Name { .. }));
}

#[test]
fn test_pocket_widened_by_tolerance() {
    let params = holster(80.0, 15.0, 3.0);
    let dims = HolsterDimensions::derive(&params, UnitScale::default()).unwrap();
    let build = MockBuild::holster(params.clone());
    build.outcome().unwrap();
    let pocket = build
        .kernel
        .log()
        .iter()
        .find(|r| matches!(r.kind, OpKind::Extrude { mode: OpMode::Cut, .. }))
        .and_then(|r| r.tool_bounds)
        .unwrap();
    assert_extent(&pocket, Axis::X, 80.0 + params.tolerance, 1e-9, "pocket width").unwrap();
    assert_extent(&pocket, Axis::Z, dims.pocket_depth, 1e-9, "pocket depth").unwrap();
}

#[test]
fn test_slot_centred_on_body() {
    let params = holster(80.0, 15.0, 3.0);
    let build = MockBuild::holster(params.clone());
    build.outcome().unwrap();
    let slot = build
        .kernel
        .log()
        .iter()
        .filter(|r| matches!(r.kind, OpKind::Extrude { mode: OpMode::Cut, .. }))
        .nth(2)
        .and_then(|r| r.tool_bounds)
        .unwrap();
    let centre = (slot.min.x + slot.max.x) / 2.0;
    assert_relative_eq!(centre, 43.0, epsilon = 1e-9);
    assert_extent(&slot, Axis::X, params.front_slot_width, 1e-9, "slot width").unwrap();
}

//! End-to-end divider box scenarios against MockKernel.
//!
//! Each scenario runs the full pipeline and then re-inspects the finished
//! body with the same selector the pipeline uses.

use approx::assert_relative_eq;
use build_engine::Stage;
use container_types::{Axis, BoxParams, ShapeParams, UnitScale};
use geom_kernel::{MockKernel, OpKind, OpMode, TopoKind};
use modeling_ops::{BoxDimensions, BoxPattern, GeometricSelector, Predicate};
use test_harness::assertions::*;
use test_harness::helpers::plain_box;
use test_harness::MockBuild;

fn selector() -> GeometricSelector {
    GeometricSelector::new(&UnitScale::default())
}

fn dims(params: &BoxParams) -> BoxDimensions {
    BoxDimensions::derive(params, UnitScale::default()).unwrap()
}

fn fillet_calls(kernel: &MockKernel) -> usize {
    kernel
        .log()
        .iter()
        .filter(|r| matches!(r.kind, OpKind::Fillet { .. }))
        .count()
}

// ── Scenario 1: Plain 2x2 box ───────────────────────────────────────────

#[test]
fn test_plain_box_completes_through_indent() {
    let params = plain_box();
    let build = MockBuild::box_(params.clone());
    let outcome = build.outcome().unwrap();
    let report = &outcome.report;

    for stage in &Stage::BOX[..9] {
        if *stage == Stage::MagnetHoles {
            continue;
        }
        assert_stage_ran(report, *stage, "plain box").unwrap();
    }
    assert_stage_skipped(report, Stage::MagnetHoles, "plain box").unwrap();
    assert_stage_skipped(report, Stage::Ledge, "plain box").unwrap();
    assert_stage_skipped(report, Stage::Scoop, "plain box").unwrap();
    assert_stage_skipped(report, Stage::Dividers, "plain box").unwrap();
    assert_single_named_body(&build.kernel, outcome, "plain box").unwrap();
}

#[test]
fn test_plain_box_has_one_top_fillet() {
    let build = MockBuild::box_(plain_box());
    let outcome = build.outcome().unwrap();
    assert_fillet_groups(&outcome.report, Stage::TopFillet, 1, 1, "top fillet").unwrap();
    assert_eq!(fillet_calls(&build.kernel), 1);

    // The seed edge propagates round the whole rim crest.
    let filleted = build.kernel.log().iter().find_map(|r| match r.kind {
        OpKind::Fillet {
            seed_edges,
            filleted_edges,
            ..
        } => Some((seed_edges, filleted_edges)),
        _ => None,
    });
    assert_eq!(filleted, Some((1, 8)));
}

#[test]
fn test_plain_box_has_one_cavity_floor() {
    let params = plain_box();
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    let sel = selector();

    let floor = Predicate::from(BoxPattern::new().at(Axis::Z, d.floor_height));
    assert_match_count(&build.kernel, &sel, &outcome.body, TopoKind::Face, &floor, 1, "cavity floor")
        .unwrap();

    // The hollow cut consumed the top face.
    let top = Predicate::from(BoxPattern::new().at(Axis::Z, d.height));
    assert_match_count(&build.kernel, &sel, &outcome.body, TopoKind::Face, &top, 0, "top face")
        .unwrap();
}

#[test]
fn test_plain_box_hollow_depth() {
    let params = plain_box();
    let d = dims(&params);
    let build = MockBuild::box_(params);
    build.outcome().unwrap();
    let hollow = build
        .kernel
        .log()
        .iter()
        .find_map(|r| match r.kind {
            OpKind::Extrude {
                mode: OpMode::Cut,
                distance,
            } if distance < 0.0 => Some((distance, r.tool_bounds)),
            _ => None,
        })
        .unwrap();
    assert_relative_eq!(hollow.0, -d.hollow_depth, epsilon = 1e-9);
    let tool = hollow.1.unwrap();
    assert_relative_eq!(tool.min.z, d.floor_height, epsilon = 1e-9);
    assert_relative_eq!(tool.max.z, d.height, epsilon = 1e-9);
}

// ── Scenario 2: Three dividers ──────────────────────────────────────────

#[test]
fn test_three_dividers_joined_and_filleted() {
    let params = BoxParams {
        divider_count: 3,
        ..plain_box()
    };
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();

    assert_stage_ran(&outcome.report, Stage::Dividers, "dividers").unwrap();
    let divider_joins = build
        .kernel
        .log()
        .iter()
        .filter(|r| {
            matches!(r.kind, OpKind::Extrude { mode: OpMode::Join, distance } if (distance - d.wall).abs() < 1e-9)
        })
        .count();
    assert_eq!(divider_joins, 3);
    assert_fillet_groups(&outcome.report, Stage::Dividers, 3, 2, "dividers").unwrap();

    let plan = outcome.report.dividers.as_ref().unwrap();
    assert_eq!(plan.len(), 3);
    for &x in &plan.positions {
        let centre = x + d.wall / 2.0;
        assert!(centre > 0.0 && centre < d.width, "centre {centre} outside 0..{}", d.width);
    }
    assert!(plan.positions.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_divider_faces_stay_unique() {
    let params = BoxParams {
        divider_count: 3,
        ..plain_box()
    };
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    let sel = selector();
    for &x in &outcome.report.dividers.as_ref().unwrap().positions {
        for plane in [x, x + d.wall] {
            let face = Predicate::from(BoxPattern::new().at(Axis::X, plane));
            assert_match_count(&build.kernel, &sel, &outcome.body, TopoKind::Face, &face, 1, "divider face")
                .unwrap();
        }
    }
}

#[test]
fn test_single_divider_is_centred() {
    let params = BoxParams {
        divider_count: 1,
        ..plain_box()
    };
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let plan = build.outcome().unwrap().report.dividers.clone().unwrap();
    assert_relative_eq!(plan.positions[0] + d.wall / 2.0, d.width / 2.0, epsilon = 1e-9);
}

// ── Scenario 3: Too short for a ledge ───────────────────────────────────

#[test]
fn test_short_box_skips_ledge() {
    let params = BoxParams {
        slots_high: 0.3,
        include_ledge: true,
        ..plain_box()
    };
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    assert_stage_skipped(&outcome.report, Stage::Ledge, "short box").unwrap();
    assert_stage_ran(&outcome.report, Stage::Indent, "short box").unwrap();
    assert_single_named_body(&build.kernel, outcome, "short box").unwrap();
}

#[test]
fn test_tall_box_gets_ledge() {
    let params = BoxParams {
        include_ledge: true,
        ..plain_box()
    };
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    assert_stage_ran(&outcome.report, Stage::Ledge, "tall box").unwrap();
    let ledge = build
        .kernel
        .log()
        .iter()
        .find_map(|r| match r.kind {
            OpKind::Extrude {
                mode: OpMode::Join,
                distance,
            } if (distance - d.usable_span).abs() < 1e-9 => r.tool_bounds,
            _ => None,
        })
        .unwrap();
    assert_extent(&ledge, Axis::Y, d.ledge_projection, 1e-9, "ledge projection").unwrap();
    assert_extent(&ledge, Axis::Z, d.ledge_drop, 1e-9, "ledge drop").unwrap();
}

// ── Optional features ───────────────────────────────────────────────────

#[test]
fn test_scoop_fillets_front_floor_edge() {
    let params = BoxParams {
        include_scoop: true,
        ..plain_box()
    };
    let d = dims(&params);
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    assert_fillet_groups(&outcome.report, Stage::Scoop, 1, 1, "scoop").unwrap();
    let scoop = build
        .kernel
        .log()
        .iter()
        .filter_map(|r| match r.kind {
            OpKind::Fillet {
                radius,
                rolling_ball,
                ..
            } => Some((radius, rolling_ball)),
            _ => None,
        })
        .nth(1)
        .unwrap();
    assert_relative_eq!(scoop.0, d.height / 2.0, epsilon = 1e-9);
    assert!(!scoop.1);
}

#[test]
fn test_every_option_at_once() {
    let params = BoxParams {
        slots_wide: 3,
        slots_deep: 1,
        divider_count: 2,
        include_scoop: true,
        include_ledge: true,
        include_magnets: true,
        ..plain_box()
    };
    let build = MockBuild::box_(params);
    let outcome = build.outcome().unwrap();
    for stage in Stage::BOX {
        assert_stage_ran(&outcome.report, stage, "all options").unwrap();
    }
    assert_single_named_body(&build.kernel, outcome, "all options").unwrap();
}

#[test]
fn test_centimetre_scale_matches_millimetres() {
    let mm = MockBuild::box_(plain_box());
    let cm = MockBuild::run_with(ShapeParams::Box(plain_box()), UnitScale::CENTIMETRES);
    let mm_report = &mm.outcome().unwrap().report;
    let cm_report = &cm.outcome().unwrap().report;
    let stages = |r: &build_engine::BuildReport| {
        r.stages.iter().map(|s| (s.stage, s.status.clone())).collect::<Vec<_>>()
    };
    assert_eq!(stages(mm_report), stages(cm_report));

    let base = cm.first_extrude().unwrap().tool_bounds.unwrap();
    assert_extent(&base, Axis::X, 4.2, 1e-9, "cm cell").unwrap();
}

//! Failure paths: bad parameters, ambiguous selections and kernel refusals.
//! A failed build must name its stage and leave no body behind.

use build_engine::{build, build_from_json, BuildConfig, BuildError, Stage};
use container_types::{BoxParams, HolsterParams, ShapeParams};
use geom_kernel::{Kernel, MockKernel};
use test_harness::helpers::plain_box;
use test_harness::{Fault, FaultyKernel, MockBuild};

fn run_faulty(fault: Fault, params: ShapeParams) -> (FaultyKernel, BuildError) {
    let mut kernel = FaultyKernel::new(fault);
    let err = build(&mut kernel, &params, &BuildConfig::default()).unwrap_err();
    (kernel, err)
}

// ── Parameter Validation ────────────────────────────────────────────────

#[test]
fn test_zero_grid_rejected_before_kernel() {
    let build = MockBuild::box_(BoxParams {
        slots_wide: 0,
        ..plain_box()
    });
    let err = build.error().unwrap();
    assert!(matches!(err, BuildError::InvalidParameter { name, .. } if name == "slots_wide"));
    assert!(build.kernel.log().is_empty());
}

#[test]
fn test_front_above_length_rejected() {
    let build = MockBuild::holster(HolsterParams {
        front_height: 50.0,
        ..HolsterParams::default()
    });
    let err = build.error().unwrap();
    assert!(err.to_string().contains("front_height"), "{err}");
    assert_eq!(err.stage(), None);
}

// ── Unit Configuration ──────────────────────────────────────────────────

#[test]
fn test_bad_units_rejected_as_config_before_kernel() {
    let cases = [
        (r#"{"scale": -1}"#, "scale"),
        (r#"{"scale": 0}"#, "scale"),
        (r#"{"scale": 1e300}"#, "scale"),
        (r#"{"base_epsilon": 0}"#, "base_epsilon"),
        (r#"{"base_epsilon": -0.001}"#, "base_epsilon"),
    ];
    for (units, field) in cases {
        let mut kernel = MockKernel::new();
        let json = format!(r#"{{"shape": {{"type": "Box"}}, "config": {{"units": {units}}}}}"#);
        let err = build_from_json(&mut kernel, &json).unwrap_err();
        match &err {
            BuildError::Config { reason } => assert!(reason.contains(field), "{units}: {reason}"),
            other => panic!("{units}: expected config error, got {other:?}"),
        }
        assert_eq!(err.stage(), None);
        assert!(kernel.log().is_empty(), "{units}: kernel was called");
        assert_eq!(kernel.body_count(), 0);
    }
}

#[test]
fn test_bad_units_checked_before_parameters() {
    let mut kernel = MockKernel::new();
    let params = ShapeParams::Box(BoxParams {
        slots_wide: 0,
        ..plain_box()
    });
    let config = BuildConfig::with_units(container_types::UnitScale {
        scale: f64::NAN,
        ..Default::default()
    });
    let err = build(&mut kernel, &params, &config).unwrap_err();
    assert!(matches!(err, BuildError::Config { .. }), "{err:?}");
}

// ── Ambiguous Selection ─────────────────────────────────────────────────

#[test]
fn test_ambiguous_top_face_aborts_at_hollow() {
    let (kernel, err) = run_faulty(Fault::DuplicateFaces, ShapeParams::Box(plain_box()));
    match &err {
        BuildError::AmbiguousSelection {
            stage,
            predicate,
            matches,
        } => {
            assert_eq!(*stage, Stage::Hollow);
            assert_eq!(*matches, 2);
            assert!(predicate.starts_with("face"), "{predicate}");
        }
        other => panic!("expected ambiguous selection, got {other:?}"),
    }
    assert_eq!(kernel.inner.body_count(), 0, "partial body was not released");
}

// ── Kernel Refusals ─────────────────────────────────────────────────────

#[test]
fn test_rejected_fillet_aborts_at_top_fillet() {
    let (kernel, err) = run_faulty(Fault::RejectFillet, ShapeParams::Box(plain_box()));
    assert!(matches!(
        err,
        BuildError::KernelOperationFailed {
            stage: Stage::TopFillet,
            ..
        }
    ));
    assert_eq!(kernel.inner.body_count(), 0);
}

#[test]
fn test_rejected_sweep_aborts_at_edge_relief() {
    let (kernel, err) = run_faulty(Fault::RejectSweep, ShapeParams::Box(plain_box()));
    assert_eq!(err.stage(), Some(Stage::EdgeRelief));
    assert!(err.to_string().contains("self-intersects"), "{err}");
    assert_eq!(kernel.inner.body_count(), 0);
}

#[test]
fn test_rejected_holster_fillet_releases_body() {
    let (kernel, err) = run_faulty(
        Fault::RejectFillet,
        ShapeParams::Holster(HolsterParams::default()),
    );
    assert_eq!(err.stage(), Some(Stage::EdgeFillet));
    assert_eq!(kernel.inner.body_count(), 0);
}

#[test]
fn test_healthy_wrapper_builds() {
    let mut kernel = FaultyKernel::new(Fault::RejectSweep);
    let outcome = build(
        &mut kernel,
        &ShapeParams::Holster(HolsterParams::default()),
        &BuildConfig::default(),
    )
    .unwrap();
    kernel.release(outcome.body);
    assert_eq!(kernel.inner.body_count(), 0);
}

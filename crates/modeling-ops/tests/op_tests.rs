use container_types::{Axis, BoxParams, HolsterParams, UnitScale, Winding};
use geom_kernel::{FeatureOp, FilletSpec, Kernel, KernelError, KernelIntrospect, MockKernel, TopoKind};
use modeling_ops::{
    execute_extrude_face, execute_extrude_loop, execute_extrude_rect, execute_fillet, execute_pattern_join, execute_sweep,
    sketch, BoxDimensions, BoxPattern, CurvePathBuilder, GeometricSelector, HolsterDimensions, OpError,
    KernelBundle, Predicate,
};

fn setup() -> (BoxDimensions, CurvePathBuilder, GeometricSelector) {
    let units = UnitScale::default();
    let dims = BoxDimensions::derive(&BoxParams::default(), units).unwrap();
    (dims, CurvePathBuilder::new(&units), GeometricSelector::new(&units))
}

/// Shell of the default 2x2 box with the rim swept on.
fn shell_with_rim(kernel: &mut MockKernel) -> geom_kernel::BodyHandle {
    let (dims, paths, _) = setup();
    let outline = paths
        .rounded_rect(dims.width, dims.depth, dims.corner_radius, dims.nesting_depth)
        .unwrap();
    let body = execute_extrude_loop(kernel, &outline.to_loop(), dims.shell_height, FeatureOp::NewBody)
        .unwrap();
    let rail = paths
        .rounded_rect(dims.width, dims.depth, dims.corner_radius, dims.height)
        .unwrap();
    let rim = paths.rim_profile(&dims).unwrap();
    execute_sweep(kernel, &rim, &rail, FeatureOp::Join(&body)).unwrap();
    body
}

// ── Sweep Tests ────────────────────────────────────────────────────────────

#[test]
fn sweep_rejects_creation_order_rail() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let rail = paths.rounded_rect(dims.cell, dims.cell, dims.corner_radius, 0.0).unwrap();
    let s = kernel.create_sketch(rail.plane).unwrap();
    let curves = sketch::add_segments(&mut kernel, &s, rail.creation_order()).unwrap();
    let profile = sketch::emit_loop_profile(&mut kernel, &paths.edge_relief_profile(&dims).unwrap())
        .unwrap();
    let err = kernel.sweep(profile, &curves, FeatureOp::NewBody).unwrap_err();
    assert!(matches!(err, KernelError::InvalidRail { .. }), "got {err:?}");
}

#[test]
fn sweep_accepts_walk_order_rail() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let rail = paths.rounded_rect(dims.cell, dims.cell, dims.corner_radius, 0.0).unwrap();
    assert_eq!(rail.rail().winding(), Winding::Clockwise);
    let relief = paths.edge_relief_profile(&dims).unwrap();
    let body = execute_sweep(&mut kernel, &relief, &rail, FeatureOp::NewBody).unwrap();
    let bb = kernel.body_bounding_box(&body).unwrap();
    // The notch overhangs the cell by the relief overhang.
    assert!((bb.min.x + dims.relief_overhang).abs() < 1e-9);
    assert!((bb.max.z - dims.nesting_depth).abs() < 1e-9);
}

#[test]
fn rim_join_leaves_one_top_face() {
    let mut kernel = MockKernel::new();
    let body = shell_with_rim(&mut kernel);
    let (dims, _, selector) = setup();
    let top = Predicate::from(BoxPattern::new().at(Axis::Z, dims.height));
    let face = selector
        .select_unique(&kernel, &body, TopoKind::Face, &top)
        .unwrap();
    // The rim covers the outer band of the top plane.
    let bb = kernel.bounding_box(face).unwrap();
    assert!((bb.min.x - dims.rim_inset).abs() < 1e-9);
    assert!((bb.max.y - (dims.depth - dims.rim_inset)).abs() < 1e-9);
}

#[test]
fn topmost_rim_edge_is_unique_with_left_filter() {
    let mut kernel = MockKernel::new();
    let body = shell_with_rim(&mut kernel);
    let (dims, _, selector) = setup();
    let left = Predicate::from(BoxPattern::new().at(Axis::X, 0.0));
    let edge = selector.select_topmost_edge(&kernel, &body, &left).unwrap();
    let bb = kernel.bounding_box(edge).unwrap();
    let expected = dims.height + dims.nesting_depth - dims.vertical_clearance;
    assert!((bb.min.z - expected).abs() < 1e-9);

    let any = Predicate::from(BoxPattern::new());
    assert!(selector.select_topmost_edge(&kernel, &body, &any).is_err());
}

// ── Bundle Tests ───────────────────────────────────────────────────────────

#[test]
fn select_then_cut_through_one_bundle() {
    let mut kernel = MockKernel::new();
    let body = shell_with_rim(&mut kernel);
    let (dims, _, selector) = setup();
    let kb: &mut dyn KernelBundle = &mut kernel;
    let top = Predicate::from(BoxPattern::new().at(Axis::Z, dims.height));
    let face = selector
        .select_unique(kb.topology(), &body, TopoKind::Face, &top)
        .unwrap();
    execute_extrude_face(kb, face, -dims.hollow_depth, FeatureOp::Cut(&body)).unwrap();
    // Ids are reissued after the cut and the top plane is hollowed out.
    assert!(kb.topology().bounding_box(face).is_err());
    let left = selector
        .select_all(kb.topology(), &body, TopoKind::Face, &top)
        .unwrap();
    assert!(left.is_empty(), "{} faces still on the top plane", left.len());
}

// ── Pattern Tests ──────────────────────────────────────────────────────────

#[test]
fn pattern_join_merges_copies() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let cell = paths.rounded_rect(dims.cell, dims.cell, dims.corner_radius, 0.0).unwrap();
    let body = execute_extrude_loop(&mut kernel, &cell.to_loop(), dims.nesting_depth, FeatureOp::NewBody)
        .unwrap();
    let copies = execute_pattern_join(&mut kernel, &body, 3, 2, dims.cell).unwrap();
    assert_eq!(copies, 5);
    assert_eq!(kernel.body_count(), 1);
    let bb = kernel.body_bounding_box(&body).unwrap();
    assert!((bb.max.x - 3.0 * dims.cell).abs() < 1e-9);
    assert!((bb.max.y - 2.0 * dims.cell).abs() < 1e-9);
}

#[test]
fn single_cell_pattern_is_noop() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let cell = paths.rounded_rect(dims.cell, dims.cell, dims.corner_radius, 0.0).unwrap();
    let body = execute_extrude_loop(&mut kernel, &cell.to_loop(), dims.nesting_depth, FeatureOp::NewBody)
        .unwrap();
    assert_eq!(execute_pattern_join(&mut kernel, &body, 1, 1, dims.cell).unwrap(), 0);
}

// ── Validation Tests ───────────────────────────────────────────────────────

#[test]
fn fillet_rejects_non_positive_radius() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let holster = HolsterDimensions::derive(&HolsterParams::default(), dims.units).unwrap();
    let base = paths.holster_base_rect(&holster).unwrap();
    let body = execute_extrude_rect(&mut kernel, &base, 10.0, FeatureOp::NewBody).unwrap();
    let edges = kernel.edges(&body).unwrap();
    let spec = FilletSpec {
        radius: -1.0,
        rolling_ball_corner: true,
        is_g2: false,
        tangent_chain: false,
    };
    let err = execute_fillet(&mut kernel, &body, &edges, &spec).unwrap_err();
    assert!(matches!(err, OpError::InvalidParameter { .. }));
}

#[test]
fn fillet_rejects_empty_edge_set() {
    let mut kernel = MockKernel::new();
    let body = kernel.insert_synthetic_body(vec![], vec![]);
    let spec = FilletSpec {
        radius: 0.6,
        rolling_ball_corner: true,
        is_g2: false,
        tangent_chain: true,
    };
    assert!(execute_fillet(&mut kernel, &body, &[], &spec).is_err());
}

#[test]
fn zero_extrude_is_rejected_before_kernel() {
    let mut kernel = MockKernel::new();
    let (dims, paths, _) = setup();
    let cell = paths.rounded_rect(dims.cell, dims.cell, dims.corner_radius, 0.0).unwrap();
    let err = execute_extrude_loop(&mut kernel, &cell.to_loop(), 0.0, FeatureOp::NewBody).unwrap_err();
    assert!(matches!(err, OpError::InvalidParameter { .. }));
    assert!(kernel.log().is_empty());
}

use container_types::{BoundingBox, Point2};

use crate::types::*;

/// Core geometry kernel trait: sketching and feature operations.
/// Implemented by real kernel adapters and by `MockKernel`.
pub trait Kernel {
    /// Open a new sketch on a construction plane.
    fn create_sketch(&mut self, plane: SketchPlane) -> Result<SketchHandle, KernelError>;

    /// Add a straight line to a sketch.
    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: Point2,
        end: Point2,
    ) -> Result<CurveHandle, KernelError>;

    /// Add an arc by center, start point and signed sweep (positive = counter-clockwise).
    fn add_arc(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        start: Point2,
        sweep_angle: f64,
    ) -> Result<CurveHandle, KernelError>;

    /// Add a full circle; returns the disc profile.
    fn add_circle(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        radius: f64,
    ) -> Result<ProfileHandle, KernelError>;

    /// Add an axis-aligned rectangle by two opposite corners; returns its profile.
    fn add_rectangle(
        &mut self,
        sketch: &SketchHandle,
        corner_a: Point2,
        corner_b: Point2,
    ) -> Result<ProfileHandle, KernelError>;

    /// The region bounded by all lines and arcs of a sketch.
    fn loop_profile(&mut self, sketch: &SketchHandle) -> Result<ProfileHandle, KernelError>;

    /// Use a planar face of an existing body as a profile.
    fn face_profile(&mut self, face: KernelId) -> Result<ProfileHandle, KernelError>;

    /// Extrude a profile along its plane normal (negative distance = reverse).
    fn extrude(
        &mut self,
        profile: ProfileHandle,
        distance: f64,
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError>;

    /// Sweep a profile along a closed rail given in walk order.
    fn sweep(
        &mut self,
        profile: ProfileHandle,
        rail: &[CurveHandle],
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError>;

    /// Copy a body on a grid in +X/+Y. Returns the new copies, not the original.
    fn rectangular_pattern(
        &mut self,
        body: &BodyHandle,
        count_x: u32,
        spacing_x: f64,
        count_y: u32,
        spacing_y: f64,
    ) -> Result<Vec<BodyHandle>, KernelError>;

    /// Union `tools` into `target`. The tool handles are consumed.
    fn boolean_join(
        &mut self,
        target: &BodyHandle,
        tools: Vec<BodyHandle>,
    ) -> Result<(), KernelError>;

    /// Constant-radius fillet on a set of edges of one body.
    fn fillet(
        &mut self,
        body: &BodyHandle,
        edges: &[KernelId],
        spec: &FilletSpec,
    ) -> Result<(), KernelError>;

    /// Attach a display name to a body.
    fn set_name(&mut self, body: &BodyHandle, name: &str) -> Result<(), KernelError>;

    /// Drop a body and everything it owns.
    fn release(&mut self, body: BodyHandle);
}

/// Topology introspection trait. Read-only queries on kernel bodies.
pub trait KernelIntrospect {
    /// Current edges of a body.
    fn edges(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError>;

    /// Current faces of a body.
    fn faces(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError>;

    /// Edges bounding a face.
    fn face_edges(&self, face: KernelId) -> Result<Vec<KernelId>, KernelError>;

    /// Axis-aligned bounds of an edge or face.
    fn bounding_box(&self, entity: KernelId) -> Result<BoundingBox, KernelError>;

    /// Axis-aligned bounds of a whole body.
    fn body_bounding_box(&self, body: &BodyHandle) -> Result<BoundingBox, KernelError>;

    /// Display name of a body, if one was set.
    fn body_name(&self, body: &BodyHandle) -> Result<Option<String>, KernelError>;
}

//! A kernel wrapper that injects failures into an otherwise healthy
//! `MockKernel`, for exercising the pipelines' error paths.

use container_types::{BoundingBox, Point2};
use geom_kernel::{
    BodyHandle, CurveHandle, FeatureOp, FilletSpec, Kernel, KernelError, KernelId,
    KernelIntrospect, MockKernel, ProfileHandle, SketchHandle, SketchPlane,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Every face is reported twice, so no face selection is unique.
    DuplicateFaces,
    /// Every fillet request is refused.
    RejectFillet,
    /// Sweeps are refused as if the rail self-intersected.
    RejectSweep,
}

pub struct FaultyKernel {
    pub inner: MockKernel,
    pub fault: Fault,
}

impl FaultyKernel {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: MockKernel::new(),
            fault,
        }
    }
}

impl Kernel for FaultyKernel {
    fn create_sketch(&mut self, plane: SketchPlane) -> Result<SketchHandle, KernelError> {
        self.inner.create_sketch(plane)
    }

    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: Point2,
        end: Point2,
    ) -> Result<CurveHandle, KernelError> {
        self.inner.add_line(sketch, start, end)
    }

    fn add_arc(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        start: Point2,
        sweep_angle: f64,
    ) -> Result<CurveHandle, KernelError> {
        self.inner.add_arc(sketch, center, start, sweep_angle)
    }

    fn add_circle(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        radius: f64,
    ) -> Result<ProfileHandle, KernelError> {
        self.inner.add_circle(sketch, center, radius)
    }

    fn add_rectangle(
        &mut self,
        sketch: &SketchHandle,
        corner_a: Point2,
        corner_b: Point2,
    ) -> Result<ProfileHandle, KernelError> {
        self.inner.add_rectangle(sketch, corner_a, corner_b)
    }

    fn loop_profile(&mut self, sketch: &SketchHandle) -> Result<ProfileHandle, KernelError> {
        self.inner.loop_profile(sketch)
    }

    fn face_profile(&mut self, face: KernelId) -> Result<ProfileHandle, KernelError> {
        self.inner.face_profile(face)
    }

    fn extrude(
        &mut self,
        profile: ProfileHandle,
        distance: f64,
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError> {
        self.inner.extrude(profile, distance, op)
    }

    fn sweep(
        &mut self,
        profile: ProfileHandle,
        rail: &[CurveHandle],
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError> {
        if self.fault == Fault::RejectSweep {
            return Err(KernelError::InvalidRail {
                reason: "rail self-intersects".to_string(),
            });
        }
        self.inner.sweep(profile, rail, op)
    }

    fn rectangular_pattern(
        &mut self,
        body: &BodyHandle,
        count_x: u32,
        spacing_x: f64,
        count_y: u32,
        spacing_y: f64,
    ) -> Result<Vec<BodyHandle>, KernelError> {
        self.inner
            .rectangular_pattern(body, count_x, spacing_x, count_y, spacing_y)
    }

    fn boolean_join(
        &mut self,
        target: &BodyHandle,
        tools: Vec<BodyHandle>,
    ) -> Result<(), KernelError> {
        self.inner.boolean_join(target, tools)
    }

    fn fillet(
        &mut self,
        body: &BodyHandle,
        edges: &[KernelId],
        spec: &FilletSpec,
    ) -> Result<(), KernelError> {
        if self.fault == Fault::RejectFillet {
            return Err(KernelError::FilletFailed {
                reason: format!("radius {} does not fit", spec.radius),
            });
        }
        self.inner.fillet(body, edges, spec)
    }

    fn set_name(&mut self, body: &BodyHandle, name: &str) -> Result<(), KernelError> {
        self.inner.set_name(body, name)
    }

    fn release(&mut self, body: BodyHandle) {
        self.inner.release(body)
    }
}

impl KernelIntrospect for FaultyKernel {
    fn edges(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError> {
        self.inner.edges(body)
    }

    fn faces(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError> {
        let faces = self.inner.faces(body)?;
        if self.fault == Fault::DuplicateFaces {
            Ok(faces.iter().chain(faces.iter()).copied().collect())
        } else {
            Ok(faces)
        }
    }

    fn face_edges(&self, face: KernelId) -> Result<Vec<KernelId>, KernelError> {
        self.inner.face_edges(face)
    }

    fn bounding_box(&self, entity: KernelId) -> Result<BoundingBox, KernelError> {
        self.inner.bounding_box(entity)
    }

    fn body_bounding_box(&self, body: &BodyHandle) -> Result<BoundingBox, KernelError> {
        self.inner.body_bounding_box(body)
    }

    fn body_name(&self, body: &BodyHandle) -> Result<Option<String>, KernelError> {
        self.inner.body_name(body)
    }
}

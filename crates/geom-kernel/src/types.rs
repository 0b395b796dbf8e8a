use container_types::{BoundingBox, Point2, Point3};
use serde::{Deserialize, Serialize};

/// Opaque handle to a body in the geometry kernel.
/// NEVER persisted. Valid only for the kernel session that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) u64);

impl BodyHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Handle to an open sketch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SketchHandle(pub(crate) u64);

/// Handle to one curve (line or arc) inside a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveHandle(pub(crate) u64);

/// Handle to a closed region that can be extruded or swept.
/// Consumed by the feature that uses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileHandle(pub(crate) u64);

/// Transient identifier of an edge or face.
/// Reassigned by every operation that changes the owning body; callers must
/// re-query instead of holding on to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelId(pub u64);

/// Kind of topological element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopoKind {
    Edge,
    Face,
}

impl std::fmt::Display for TopoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopoKind::Edge => f.write_str("edge"),
            TopoKind::Face => f.write_str("face"),
        }
    }
}

/// Construction plane for a sketch. Sketch coordinates (a, b) map to model
/// space as listed; the plane normal is the positive extrusion direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SketchPlane {
    /// (a, b) -> (a, b, z), normal +Z.
    Xy { z: f64 },
    /// (a, b) -> (a, y, b), normal +Y.
    Xz { y: f64 },
    /// (a, b) -> (x, a, b), normal +X.
    Yz { x: f64 },
}

impl SketchPlane {
    pub fn to_world(&self, p: Point2) -> Point3 {
        match *self {
            SketchPlane::Xy { z } => Point3::new(p.x, p.y, z),
            SketchPlane::Xz { y } => Point3::new(p.x, y, p.y),
            SketchPlane::Yz { x } => Point3::new(x, p.x, p.y),
        }
    }

    pub fn normal(&self) -> [f64; 3] {
        match self {
            SketchPlane::Xy { .. } => [0.0, 0.0, 1.0],
            SketchPlane::Xz { .. } => [0.0, 1.0, 0.0],
            SketchPlane::Yz { .. } => [1.0, 0.0, 0.0],
        }
    }

    /// The parallel plane `distance` along the normal.
    pub fn shifted(&self, distance: f64) -> Self {
        match *self {
            SketchPlane::Xy { z } => SketchPlane::Xy { z: z + distance },
            SketchPlane::Xz { y } => SketchPlane::Xz { y: y + distance },
            SketchPlane::Yz { x } => SketchPlane::Yz { x: x + distance },
        }
    }

    /// Model-space box of a sketch-space rectangle lying on this plane.
    pub fn bounds(&self, min: Point2, max: Point2) -> BoundingBox {
        BoundingBox::from_points(&[self.to_world(min), self.to_world(max)])
    }

    pub fn is_vertical(&self) -> bool {
        !matches!(self, SketchPlane::Xy { .. })
    }
}

/// How a new feature combines with existing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureOp<'a> {
    NewBody,
    Join(&'a BodyHandle),
    Cut(&'a BodyHandle),
}

impl FeatureOp<'_> {
    pub fn mode(&self) -> OpMode {
        match self {
            FeatureOp::NewBody => OpMode::NewBody,
            FeatureOp::Join(_) => OpMode::Join,
            FeatureOp::Cut(_) => OpMode::Cut,
        }
    }
}

/// `FeatureOp` without the target, for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpMode {
    NewBody,
    Join,
    Cut,
}

/// Constant-radius fillet request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilletSpec {
    pub radius: f64,
    pub rolling_ball_corner: bool,
    pub is_g2: bool,
    /// Extend the edge set along tangent-continuous neighbours.
    pub tangent_chain: bool,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("body not found: body#{handle}")]
    BodyNotFound { handle: u64 },

    #[error("sketch not found: sketch#{handle}")]
    SketchNotFound { handle: u64 },

    #[error("profile not found or already consumed: profile#{handle}")]
    ProfileNotFound { handle: u64 },

    #[error("curve not found: curve#{handle}")]
    CurveNotFound { handle: u64 },

    #[error("invalid profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("invalid rail: {reason}")]
    InvalidRail { reason: String },

    #[error("extrude failed: {reason}")]
    ExtrudeFailed { reason: String },

    #[error("sweep failed: {reason}")]
    SweepFailed { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("pattern failed: {reason}")]
    PatternFailed { reason: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

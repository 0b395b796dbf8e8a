use geom_kernel::{BodyHandle, FeatureOp, KernelId};

use crate::kernel_ext::KernelBundle;
use crate::paths::{PlanarLoop, PlanarRect};
use crate::sketch;
use crate::types::OpError;

fn check_distance(distance: f64) -> Result<(), OpError> {
    if !distance.is_finite() || distance == 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("extrude distance {distance} must be finite and non-zero"),
        });
    }
    Ok(())
}

/// Sketch `profile` and extrude it along its plane normal.
pub fn execute_extrude_loop(
    kb: &mut dyn KernelBundle,
    profile: &PlanarLoop,
    distance: f64,
    op: FeatureOp<'_>,
) -> Result<BodyHandle, OpError> {
    check_distance(distance)?;
    let handle = sketch::emit_loop_profile(kb, profile)?;
    Ok(kb.extrude(handle, distance, op)?)
}

/// Sketch `rect` and extrude it along its plane normal.
pub fn execute_extrude_rect(
    kb: &mut dyn KernelBundle,
    rect: &PlanarRect,
    distance: f64,
    op: FeatureOp<'_>,
) -> Result<BodyHandle, OpError> {
    check_distance(distance)?;
    let handle = sketch::emit_rect(kb, rect)?;
    Ok(kb.extrude(handle, distance, op)?)
}

/// Extrude an existing planar face of a body.
pub fn execute_extrude_face(
    kb: &mut dyn KernelBundle,
    face: KernelId,
    distance: f64,
    op: FeatureOp<'_>,
) -> Result<BodyHandle, OpError> {
    check_distance(distance)?;
    let handle = kb.face_profile(face)?;
    Ok(kb.extrude(handle, distance, op)?)
}

use geom_kernel::{BodyHandle, FeatureOp};

use crate::kernel_ext::KernelBundle;
use crate::paths::{PlanarLoop, RoundedRect};
use crate::sketch;
use crate::types::OpError;

/// Sweep a cross-section around a rounded-rectangle rail.
///
/// The rail is sketched first, in walk order, then the profile on its own
/// vertical sketch.
pub fn execute_sweep(
    kb: &mut dyn KernelBundle,
    profile: &PlanarLoop,
    rail: &RoundedRect,
    op: FeatureOp<'_>,
) -> Result<BodyHandle, OpError> {
    let curves = sketch::emit_rail(kb, rail)?;
    let handle = sketch::emit_loop_profile(kb, profile)?;
    Ok(kb.sweep(handle, &curves, op)?)
}

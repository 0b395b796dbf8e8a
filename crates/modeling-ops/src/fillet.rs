use geom_kernel::{BodyHandle, FilletSpec, KernelId};

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Execute a fillet operation on specified edges of a solid.
pub fn execute_fillet(
    kb: &mut dyn KernelBundle,
    body: &BodyHandle,
    edges: &[KernelId],
    spec: &FilletSpec,
) -> Result<(), OpError> {
    if spec.radius <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: "fillet radius must be positive".to_string(),
        });
    }
    if edges.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "fillet needs at least one edge".to_string(),
        });
    }
    kb.fillet(body, edges, spec)?;
    Ok(())
}

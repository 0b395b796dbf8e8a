use geom_kernel::BodyHandle;

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Replicate `body` on a `count_x` × `count_y` grid and join every copy back
/// into it. Returns the number of copies joined.
pub fn execute_pattern_join(
    kb: &mut dyn KernelBundle,
    body: &BodyHandle,
    count_x: u32,
    count_y: u32,
    spacing: f64,
) -> Result<usize, OpError> {
    if count_x == 0 || count_y == 0 {
        return Err(OpError::InvalidParameter {
            reason: format!("pattern {count_x} x {count_y} must be at least 1 x 1"),
        });
    }
    let copies = kb.rectangular_pattern(body, count_x, spacing, count_y, spacing)?;
    let n = copies.len();
    if n > 0 {
        kb.boolean_join(body, copies)?;
    }
    Ok(n)
}

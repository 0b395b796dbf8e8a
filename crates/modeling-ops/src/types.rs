use container_types::GeometryError;
use geom_kernel::KernelError;

use crate::select::SelectionError;

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

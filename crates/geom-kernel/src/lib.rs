pub mod mock_kernel;
mod mock_topology;
pub mod traits;
pub mod types;

pub use mock_kernel::{MockKernel, OpKind, OpRecord};
pub use traits::*;
pub use types::*;

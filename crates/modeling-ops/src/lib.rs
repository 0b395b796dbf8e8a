pub mod boolean;
pub mod dimensions;
pub mod extrude;
pub mod fillet;
pub mod kernel_ext;
pub mod paths;
pub mod select;
pub mod sketch;
pub mod sweep;
pub mod types;

pub use boolean::execute_pattern_join;
pub use dimensions::{BoxDimensions, DividerPlan, HolsterDimensions};
pub use extrude::{execute_extrude_face, execute_extrude_loop, execute_extrude_rect};
pub use fillet::execute_fillet;
pub use kernel_ext::KernelBundle;
pub use paths::{CurvePathBuilder, PlanarLoop, PlanarRect, RoundedRect};
pub use select::{AxisRange, BoxPattern, GeometricSelector, Predicate, SelectionError};
pub use sweep::execute_sweep;
pub use types::*;

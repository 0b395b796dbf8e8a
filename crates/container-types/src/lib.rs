pub mod curve;
pub mod error;
pub mod geom;
pub mod params;
pub mod units;

pub use curve::*;
pub use error::*;
pub use geom::*;
pub use params::*;
pub use units::*;

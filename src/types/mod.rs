mod activity;
mod aircraft;
mod altitude;
mod bounds;
mod class;
pub(crate) mod geo_point;
mod pressure;

pub use activity::*;
pub use aircraft::*;
pub use altitude::*;
pub use bounds::*;
pub use class::*;
pub use geo_point::{EARTH_RADIUS, GeoPoint};
pub use pressure::*;

//! Planar geometry primitives
//!
//! [`PlanarPoint`] and the free functions work in a local metric frame
//! (`f64` meters) and back the exact airspace boundary tests. [`FlatPoint`]
//! and [`FlatBoundingBox`] are the quantised integer frame the spatial index
//! runs on.

mod flat;
mod planar;

pub use flat::{FlatBoundingBox, FlatPoint};
pub use planar::{PlanarPoint, closest_point_on_segment, point_in_polygon, segment_intersection};

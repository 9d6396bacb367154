//! Geodesic to planar coordinate transform
//!
//! A [`FlatProjection`] is an equirectangular projection around a fixed
//! center: the x axis is longitude scaled by the cosine of the center
//! latitude, the y axis is latitude. Both axes are independent of each other,
//! so a latitude/longitude box maps exactly onto an axis-aligned planar box.
//! Planar coordinates are quantised to [`UNITS_PER_METER`] integer units.

use crate::geometry::{FlatBoundingBox, FlatPoint, PlanarPoint};
use crate::types::geo_point::normalize_lon;
use crate::types::{EARTH_RADIUS, GeoBounds, GeoPoint};
use std::f64::consts::PI;

/// Integer plane units per meter at the projection center
pub const UNITS_PER_METER: f64 = 4.0;

/// Upper bound in meters for `unproject(project(p))` drifting away from `p`
///
/// Holds for points and projection centers between 60°S and 60°N; quantisation
/// contributes at most `0.125 m · √(1 + (cos φ / cos φ₀)²)`.
pub const MAX_ROUND_TRIP_ERROR: f64 = 0.5;

// Keeps the x scale finite for centers at the poles
const MIN_COS_LAT: f64 = 0.01;

/// Reversible transform between [`GeoPoint`] and the integer [`FlatPoint`] plane
///
/// # Limitations
///
/// Longitudes are wrapped relative to the center, so data sets straddling the
/// anti-meridian as seen from the center are not supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProjection {
    center: GeoPoint,
    cos_lat: f64,
}

impl FlatProjection {
    /// Projection centered at the given location
    pub fn centered_at(center: GeoPoint) -> Self {
        Self {
            center,
            cos_lat: center.lat.cos().max(MIN_COS_LAT),
        }
    }

    /// Projection centered on the bounding box of `points`
    ///
    /// Returns `None` if the slice is empty. The result depends only on the
    /// extreme coordinates, so the same point set always yields the same frame.
    pub fn compute(points: &[GeoPoint]) -> Option<Self> {
        GeoBounds::from_points(points).map(|bounds| Self::from_bounds(&bounds))
    }

    /// Projection centered on the given box
    pub fn from_bounds(bounds: &GeoBounds) -> Self {
        Self::centered_at(bounds.center())
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Project to unquantised planar meters
    pub fn project_planar(&self, point: GeoPoint) -> PlanarPoint {
        PlanarPoint::new(
            normalize_lon(point.lon - self.center.lon) * self.cos_lat * EARTH_RADIUS,
            (point.lat - self.center.lat) * EARTH_RADIUS,
        )
    }

    /// Inverse of [`project_planar`][Self::project_planar]
    pub fn unproject_planar(&self, point: PlanarPoint) -> GeoPoint {
        GeoPoint::new(
            self.center.lat + point.y / EARTH_RADIUS,
            normalize_lon(self.center.lon + point.x / (self.cos_lat * EARTH_RADIUS)),
        )
    }

    /// Project to the nearest integer plane point
    pub fn project(&self, point: GeoPoint) -> FlatPoint {
        let planar = self.project_planar(point);
        FlatPoint::new(to_units(planar.x, f64::round), to_units(planar.y, f64::round))
    }

    /// Inverse of [`project`][Self::project], within [`MAX_ROUND_TRIP_ERROR`]
    pub fn unproject(&self, point: FlatPoint) -> GeoPoint {
        self.unproject_planar(PlanarPoint::new(
            f64::from(point.x) / UNITS_PER_METER,
            f64::from(point.y) / UNITS_PER_METER,
        ))
    }

    /// Project a latitude/longitude box, rounding outwards
    ///
    /// Every point inside `bounds` projects into the returned box.
    pub fn project_bounds(&self, bounds: &GeoBounds) -> FlatBoundingBox {
        let west = normalize_lon(bounds.west - self.center.lon);
        let east = west + (bounds.east - bounds.west).clamp(0.0, 2.0 * PI);
        let scale_x = self.cos_lat * EARTH_RADIUS;

        FlatBoundingBox::new(
            to_units(west * scale_x, f64::floor),
            to_units((bounds.south - self.center.lat) * EARTH_RADIUS, f64::floor),
            to_units(east * scale_x, f64::ceil),
            to_units((bounds.north - self.center.lat) * EARTH_RADIUS, f64::ceil),
        )
    }

    /// Planar box enclosing the circle of `radius` meters around `center`
    pub fn project_range(&self, center: GeoPoint, radius: f64) -> FlatBoundingBox {
        self.project_bounds(&GeoBounds::around(center, radius))
    }
}

impl Default for FlatProjection {
    fn default() -> Self {
        Self::centered_at(GeoPoint::new(0.0, 0.0))
    }
}

// `as` saturates out-of-range values at the i32 limits
fn to_units(meters: f64, round: fn(f64) -> f64) -> i32 {
    round(meters * UNITS_PER_METER) as i32
}

use crate::types::GeoPoint;
use crate::types::geo_point::EARTH_RADIUS;
use std::f64::consts::{FRAC_PI_2, PI};

/// Bounding box for geographic areas
///
/// Represents a rectangular geographic area defined by longitude and latitude bounds.
/// All coordinates are stored in radians.
///
/// # Limitations
///
/// **Anti-meridian handling**: Simple min/max logic is used, so an area crossing the
/// ±180° longitude line produces a box spanning nearly the entire globe instead of
/// the actual smaller region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    /// Create a bounding box from a slice of points
    ///
    /// Returns `None` if the slice is empty.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bounds = Self::from(*first);
        for &point in rest {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Smallest box containing every point within `radius` meters of `center`
    ///
    /// The longitude extent is the exact tangent extent of a spherical cap, so
    /// the box never clips the circle. Caps that reach a pole span all longitudes.
    pub fn around(center: GeoPoint, radius: f64) -> Self {
        let delta = (radius / EARTH_RADIUS).max(0.0);
        let south = (center.lat - delta).max(-FRAC_PI_2);
        let north = (center.lat + delta).min(FRAC_PI_2);

        let sin_delta = delta.sin();
        let cos_lat = center.lat.cos();
        let d_lon = if delta >= FRAC_PI_2 || sin_delta >= cos_lat {
            PI
        } else {
            (sin_delta / cos_lat).asin()
        };

        Self {
            west: center.lon - d_lon,
            south,
            east: center.lon + d_lon,
            north,
        }
    }

    /// Extend bounding box to include a point
    ///
    /// If the point is already inside the bbox, no change is made.
    pub fn extend(&mut self, point: GeoPoint) {
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
        self.north = self.north.max(point.lat);
        self.south = self.south.min(point.lat);
    }

    /// Merge another bounding box into this one
    pub fn merge(&mut self, other: GeoBounds) {
        self.west = self.west.min(other.west);
        self.east = self.east.max(other.east);
        self.north = self.north.max(other.north);
        self.south = self.south.min(other.south);
    }

    /// Geometric center of the box
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// Check whether the point lies inside or on the edge of the box
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }
}

impl From<GeoPoint> for GeoBounds {
    fn from(point: GeoPoint) -> Self {
        Self {
            west: point.lon,
            south: point.lat,
            east: point.lon,
            north: point.lat,
        }
    }
}

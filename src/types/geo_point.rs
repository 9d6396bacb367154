use std::f64::consts::{FRAC_PI_2, PI};

/// Mean earth radius in meters (FAI sphere)
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geodesic location on the earth's surface
///
/// Coordinates are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in radians (positive north)
    pub lat: f64,
    /// Longitude in radians (positive east)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in radians
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point from latitude and longitude in degrees
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::new(lat.to_radians(), lon.to_radians())
    }

    /// Latitude in degrees
    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Longitude in degrees
    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    /// Check that both coordinates are finite and inside the valid range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-FRAC_PI_2..=FRAC_PI_2).contains(&self.lat)
            && (-PI..=PI).contains(&self.lon)
    }

    /// Great-circle distance to `other` in meters (haversine)
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        let d_lat = other.lat - self.lat;
        let d_lon = other.lon - self.lon;

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.cos() * other.lat.cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin()
    }
}

/// Wrap a longitude difference into `[-π, π)`
pub(crate) fn normalize_lon(lon: f64) -> f64 {
    (lon + PI).rem_euclid(2.0 * PI) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_degrees() {
        let point = GeoPoint::from_degrees(45.0, -90.0);
        assert!((point.lat - FRAC_PI_2 / 2.0).abs() < 1e-12);
        assert!((point.lon + FRAC_PI_2).abs() < 1e-12);
        assert!((point.lat_degrees() - 45.0).abs() < 1e-9);
        assert!((point.lon_degrees() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::from_degrees(90.0, 180.0).is_valid());
        assert!(GeoPoint::from_degrees(-90.0, -180.0).is_valid());
        assert!(!GeoPoint::from_degrees(91.0, 0.0).is_valid());
        assert!(!GeoPoint::from_degrees(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn distance_one_degree_of_latitude() {
        let a = GeoPoint::from_degrees(45.0, 7.0);
        let b = GeoPoint::from_degrees(46.0, 7.0);

        // One degree of arc on the FAI sphere
        let expected = EARTH_RADIUS * 1f64.to_radians();
        assert!((a.distance(&b) - expected).abs() < 1e-6);
        assert!((b.distance(&a) - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = GeoPoint::from_degrees(-33.9, 151.2);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn normalize_lon_wraps() {
        assert!((normalize_lon(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_lon(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_lon(0.25) - 0.25).abs() < 1e-12);
    }
}

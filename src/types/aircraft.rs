use crate::types::GeoPoint;

/// Position and altitude of the aircraft as seen by the airspace queries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AircraftState {
    pub location: GeoPoint,
    /// Altitude above mean sea level in meters
    pub altitude: f64,
}

impl AircraftState {
    pub const fn new(location: GeoPoint, altitude: f64) -> Self {
        Self { location, altitude }
    }
}

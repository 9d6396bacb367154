/// ICAO standard sea level pressure in hectopascal
pub const STANDARD_PRESSURE_HPA: f64 = 1013.25;

/// Meters per flight level (100 ft)
const METERS_PER_FLIGHT_LEVEL: f64 = 30.48;

// Barometric formula constants of the ICAO standard atmosphere (troposphere)
const K1: f64 = 0.190263;
const K2: f64 = 8.417286e-5;

/// Atmospheric pressure setting (QNH) used to convert flight levels to altitudes
///
/// Two settings compare equal only if their QNH values are bit-for-bit equal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtmosphericPressure {
    qnh: f64,
}

impl AtmosphericPressure {
    /// Pressure setting with the given QNH in hectopascal
    pub const fn hectopascal(qnh: f64) -> Self {
        Self { qnh }
    }

    /// ICAO standard pressure (1013.25 hPa)
    pub const fn standard() -> Self {
        Self::hectopascal(STANDARD_PRESSURE_HPA)
    }

    /// QNH in hectopascal
    pub fn qnh(&self) -> f64 {
        self.qnh
    }

    /// Static pressure (hPa) found at the given pressure altitude (m)
    pub fn pressure_altitude_to_static_pressure(altitude: f64) -> f64 {
        (STANDARD_PRESSURE_HPA.powf(K1) - K2 * altitude).powf(1.0 / K1)
    }

    /// Altitude above mean sea level (m) at which the given static pressure (hPa) is found
    pub fn static_pressure_to_qnh_altitude(&self, pressure: f64) -> f64 {
        (self.qnh.powf(K1) - pressure.powf(K1)) / K2
    }

    /// Convert a pressure altitude (m) to an altitude above mean sea level (m)
    pub fn pressure_altitude_to_qnh_altitude(&self, altitude: f64) -> f64 {
        self.static_pressure_to_qnh_altitude(Self::pressure_altitude_to_static_pressure(altitude))
    }

    /// Altitude above mean sea level (m) of a flight level under this setting
    pub fn flight_level_to_qnh_altitude(&self, flight_level: f64) -> f64 {
        self.pressure_altitude_to_qnh_altitude(flight_level * METERS_PER_FLIGHT_LEVEL)
    }
}

impl Default for AtmosphericPressure {
    fn default() -> Self {
        Self::standard()
    }
}

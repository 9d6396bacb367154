use crate::types::AtmosphericPressure;

/// Altitude reference of an airspace bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AltitudeReference {
    MeanSeaLevel,
    AboveGroundLevel,
    FlightLevel,
    Unlimited,
}

/// Declared lower or upper bound of an airspace
///
/// `value` is in meters for [`AltitudeReference::MeanSeaLevel`] and
/// [`AltitudeReference::AboveGroundLevel`], a flight level number (hundreds of
/// feet at standard pressure) for [`AltitudeReference::FlightLevel`], and
/// ignored for [`AltitudeReference::Unlimited`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirspaceAltitude {
    pub reference: AltitudeReference,
    pub value: f64,
}

impl AirspaceAltitude {
    /// Altitude above mean sea level in meters
    pub const fn msl(meters: f64) -> Self {
        Self {
            reference: AltitudeReference::MeanSeaLevel,
            value: meters,
        }
    }

    /// Height above the terrain in meters
    pub const fn agl(meters: f64) -> Self {
        Self {
            reference: AltitudeReference::AboveGroundLevel,
            value: meters,
        }
    }

    /// The terrain surface itself (0 AGL)
    pub const fn ground() -> Self {
        Self::agl(0.0)
    }

    /// Pressure altitude expressed as flight level
    pub const fn flight_level(level: f64) -> Self {
        Self {
            reference: AltitudeReference::FlightLevel,
            value: level,
        }
    }

    /// No upper limit
    pub const fn unlimited() -> Self {
        Self {
            reference: AltitudeReference::Unlimited,
            value: 0.0,
        }
    }

    /// Check whether this bound sits on the terrain (0 AGL or below)
    pub fn is_terrain(&self) -> bool {
        self.reference == AltitudeReference::AboveGroundLevel && self.value <= 0.0
    }

    /// Check whether resolving this bound requires the ground elevation
    pub fn needs_ground_level(&self) -> bool {
        self.reference == AltitudeReference::AboveGroundLevel
    }

    /// Check whether resolving this bound depends on the pressure setting
    pub fn needs_pressure(&self) -> bool {
        self.reference == AltitudeReference::FlightLevel
    }

    /// Resolve to an altitude above mean sea level in meters
    ///
    /// Returns `None` for a terrain-referenced bound when the ground
    /// elevation is unknown. [`AltitudeReference::Unlimited`] resolves to
    /// positive infinity.
    pub fn resolve(&self, ground: Option<f64>, pressure: &AtmosphericPressure) -> Option<f64> {
        match self.reference {
            AltitudeReference::MeanSeaLevel => Some(self.value),
            AltitudeReference::AboveGroundLevel => ground.map(|ground| ground + self.value),
            AltitudeReference::FlightLevel => Some(pressure.flight_level_to_qnh_altitude(self.value)),
            AltitudeReference::Unlimited => Some(f64::INFINITY),
        }
    }
}

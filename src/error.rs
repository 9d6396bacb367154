use crate::types::GeoPoint;

/// Errors reported when an airspace is rejected by the database
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Polygon airspace needs at least 3 distinct points, got {points}")]
    DegeneratePolygon { points: usize },

    #[error("Circle airspace radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f64 },

    #[error("Coordinate out of range: {point:?}")]
    CoordinateOutOfRange { point: GeoPoint },
}

pub type Result<T> = std::result::Result<T, Error>;

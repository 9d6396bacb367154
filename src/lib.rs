#![doc = include_str!("../README.md")]

pub use crate::airspace::{Airspace, AirspaceShape, MIN_POLYGON_POINTS};
pub use crate::airspaces::{
    AirspaceDatabase, AirspaceEntry, Airspaces, AirspacesView, Borrowed, Owned, TerrainLookup,
};
pub use crate::config::{Config, UncertainAltitude};
pub use crate::error::{Error, Result};
pub use crate::index::{DEFAULT_NODE_CAPACITY, Query, SpatialIndex};
pub use crate::predicate::*;
pub use crate::projection::{FlatProjection, MAX_ROUND_TRIP_ERROR, UNITS_PER_METER};
pub use crate::sync::SharedAirspaces;
pub use crate::types::*;

mod airspace;
mod airspaces;
mod config;
mod error;
pub mod geometry;
mod index;
mod predicate;
mod projection;
mod sync;
mod types;

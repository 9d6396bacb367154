use crate::index::DEFAULT_NODE_CAPACITY;

/// Handling of vertical bounds that could not be resolved to an altitude
///
/// A terrain-referenced bound stays unresolved until ground levels have been
/// applied, or when the terrain lookup has no elevation for the airspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UncertainAltitude {
    /// Unresolved base counts as the ground, unresolved top as unlimited
    #[default]
    Include,
    /// An aircraft is never inside an airspace with an unresolved bound
    Exclude,
}

/// Database settings fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Policy of the altitude-aware containment test
    pub uncertain_altitude: UncertainAltitude,
    /// Maximum children per spatial index node, at least 2
    pub leaf_capacity: usize,
    /// Initial radius in meters of the expanding nearest airspace search
    pub nearest_search_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uncertain_altitude: UncertainAltitude::Include,
            leaf_capacity: DEFAULT_NODE_CAPACITY,
            nearest_search_radius: 10_000.0,
        }
    }
}

//! Conditions selecting airspaces for synchronisation and nearest lookups

use crate::airspaces::AirspaceEntry;
use crate::config::UncertainAltitude;
use crate::types::AircraftState;

/// Condition on an airspace and its resolved state
///
/// Implemented for every `Fn(&AirspaceEntry) -> bool`.
pub trait AirspacePredicate {
    fn matches(&self, entry: &AirspaceEntry) -> bool;

    /// Predicate accepting what both `self` and `other` accept
    fn and<P>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
        P: AirspacePredicate,
    {
        And(self, other)
    }
}

impl<F> AirspacePredicate for F
where
    F: Fn(&AirspaceEntry) -> bool,
{
    fn matches(&self, entry: &AirspaceEntry) -> bool {
        self(entry)
    }
}

/// Accepts every airspace
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl AirspacePredicate for AlwaysTrue {
    fn matches(&self, _entry: &AirspaceEntry) -> bool {
        true
    }
}

/// Accepts airspaces whose vertical extent overlaps `min..=max` (meters MSL)
///
/// Unresolved bounds are treated as reaching down to the ground or up
/// without limit, so such airspaces are never filtered out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

impl HeightRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl AirspacePredicate for HeightRange {
    fn matches(&self, entry: &AirspaceEntry) -> bool {
        let base = entry.base_altitude().unwrap_or(f64::NEG_INFINITY);
        let top = entry.top_altitude().unwrap_or(f64::INFINITY);
        base <= self.max && top >= self.min
    }
}

/// Accepts airspaces containing the aircraft laterally and vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftInside {
    pub state: AircraftState,
    pub policy: UncertainAltitude,
}

impl AircraftInside {
    /// Uses [`UncertainAltitude::Include`] for unresolved bounds
    pub fn new(state: AircraftState) -> Self {
        Self {
            state,
            policy: UncertainAltitude::default(),
        }
    }

    pub fn with_policy(mut self, policy: UncertainAltitude) -> Self {
        self.policy = policy;
        self
    }
}

impl AirspacePredicate for AircraftInside {
    fn matches(&self, entry: &AirspaceEntry) -> bool {
        entry.contains_altitude(self.state.altitude, self.policy)
            && entry.airspace().inside(self.state.location)
    }
}

/// Conjunction of two predicates, see [`AirspacePredicate::and`]
#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(A, B);

impl<A, B> AirspacePredicate for And<A, B>
where
    A: AirspacePredicate,
    B: AirspacePredicate,
{
    fn matches(&self, entry: &AirspaceEntry) -> bool {
        self.0.matches(entry) && self.1.matches(entry)
    }
}

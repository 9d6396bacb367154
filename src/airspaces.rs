//! The airspace database
//!
//! Airspaces are loaded in two phases: [`Airspaces::add`] stages entities
//! cheaply, [`AirspaceDatabase::optimise`] merges the staged entities into
//! the spatial index. Staged entities are invisible to every query until the
//! next `optimise`.
//!
//! Entities are shared behind [`Arc`], so the owning [`Airspaces`] and any
//! number of [`AirspacesView`]s synchronised from it refer to the same
//! immutable geometry. Resolved altitudes and the activity flag are kept per
//! database in the [`AirspaceEntry`] wrapping each entity.

use crate::airspace::Airspace;
use crate::config::{Config, UncertainAltitude};
use crate::error::Result;
use crate::geometry::FlatBoundingBox;
use crate::index::SpatialIndex;
use crate::predicate::AirspacePredicate;
use crate::projection::FlatProjection;
use crate::types::{
    AircraftState, AirspaceActivity, AtmosphericPressure, EARTH_RADIUS, GeoBounds, GeoPoint,
};
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::marker::PhantomData;
use std::sync::Arc;

// Half the earth's circumference, every point is within this distance
const MAX_SEARCH_RADIUS: f64 = PI * EARTH_RADIUS;

/// Marker for a database owning its airspaces
#[derive(Debug, Clone, Copy)]
pub enum Owned {}

/// Marker for a database viewing airspaces owned by another database
#[derive(Debug, Clone, Copy)]
pub enum Borrowed {}

/// Owning airspace database, filled through [`Airspaces::add`]
pub type Airspaces = AirspaceDatabase<Owned>;

/// Non-owning working copy, filled through
/// [`AirspacesView::synchronise_with`]
pub type AirspacesView = AirspaceDatabase<Borrowed>;

/// Ground elevation source used to resolve terrain-referenced bounds
pub trait TerrainLookup {
    /// Terrain elevation above mean sea level in meters, `None` if unknown
    fn elevation(&self, location: GeoPoint) -> Option<f64>;
}

impl<F> TerrainLookup for F
where
    F: Fn(GeoPoint) -> Option<f64>,
{
    fn elevation(&self, location: GeoPoint) -> Option<f64> {
        self(location)
    }
}

/// An airspace together with its per-database state
#[derive(Debug, Clone)]
pub struct AirspaceEntry {
    airspace: Arc<Airspace>,
    bounds: GeoBounds,
    bbox: FlatBoundingBox,
    ground: Option<f64>,
    base: Option<f64>,
    top: Option<f64>,
    active: bool,
}

impl AirspaceEntry {
    fn new(airspace: Arc<Airspace>) -> Self {
        let bounds = airspace.bounds();
        Self {
            airspace,
            bounds,
            bbox: FlatBoundingBox::new(0, 0, 0, 0),
            ground: None,
            base: None,
            top: None,
            active: true,
        }
    }

    pub fn airspace(&self) -> &Airspace {
        &self.airspace
    }

    /// Shared handle to the airspace
    pub fn shared(&self) -> &Arc<Airspace> {
        &self.airspace
    }

    /// Box enclosing the airspace in the database's projected plane
    pub fn bbox(&self) -> FlatBoundingBox {
        self.bbox
    }

    /// Terrain elevation applied by the last ground level refresh
    pub fn ground_level(&self) -> Option<f64> {
        self.ground
    }

    /// Lower bound in meters above mean sea level, `None` while unresolved
    pub fn base_altitude(&self) -> Option<f64> {
        self.base
    }

    /// Upper bound in meters above mean sea level, `None` while unresolved
    pub fn top_altitude(&self) -> Option<f64> {
        self.top
    }

    /// Whether the airspace is in operation under the database's activity mask
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check whether `altitude` lies within the resolved vertical bounds
    pub fn contains_altitude(&self, altitude: f64, policy: UncertainAltitude) -> bool {
        let (base, top) = match (self.base, self.top, policy) {
            (Some(base), Some(top), _) => (base, top),
            (_, _, UncertainAltitude::Exclude) => return false,
            (base, top, UncertainAltitude::Include) => (
                base.unwrap_or(f64::NEG_INFINITY),
                top.unwrap_or(f64::INFINITY),
            ),
        };
        base <= altitude && altitude <= top
    }

    fn resolve(&mut self, pressure: &AtmosphericPressure) {
        self.base = self.airspace.base().resolve(self.ground, pressure);
        self.top = self.airspace.top().resolve(self.ground, pressure);
    }

    /// Take over the resolved state of `source`, returns whether anything changed
    fn copy_state_from(&mut self, source: &AirspaceEntry) -> bool {
        let changed = !same_bits(self.ground, source.ground)
            || !same_bits(self.base, source.base)
            || !same_bits(self.top, source.top)
            || self.active != source.active;

        self.ground = source.ground;
        self.base = source.base;
        self.top = source.top;
        self.active = source.active;
        changed
    }
}

/// Bitwise equality, so NaN altitudes compare equal to themselves
fn same_bits(a: Option<f64>, b: Option<f64>) -> bool {
    a.map(f64::to_bits) == b.map(f64::to_bits)
}

/// Spatial database of airspaces
///
/// `S` is either [`Owned`] or [`Borrowed`], see [`Airspaces`] and
/// [`AirspacesView`]. Query results borrow the database, so they have to be
/// consumed before the database can be mutated again.
#[derive(Debug, Clone)]
pub struct AirspaceDatabase<S> {
    config: Config,
    projection: FlatProjection,
    entries: Vec<AirspaceEntry>,
    staged: Vec<AirspaceEntry>,
    index: SpatialIndex<usize>,
    pressure: Option<AtmosphericPressure>,
    activity: AirspaceActivity,
    serial: u64,
    ownership: PhantomData<S>,
}

impl<S> AirspaceDatabase<S> {
    fn empty(config: Config) -> Self {
        Self {
            config,
            projection: FlatProjection::default(),
            entries: Vec::new(),
            staged: Vec::new(),
            index: SpatialIndex::new(),
            pressure: None,
            activity: AirspaceActivity::default(),
            serial: 0,
            ownership: PhantomData,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of indexed airspaces, staged ones excluded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of airspaces waiting for the next [`optimise`][Self::optimise]
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Whether every airspace is visible to queries
    pub fn is_indexed(&self) -> bool {
        self.staged.is_empty()
    }

    /// Change counter
    ///
    /// Increases with every mutation and never decreases, two equal values
    /// guarantee equal query results. Calls that cannot change any query
    /// result leave it alone: [`optimise`][Self::optimise] with nothing
    /// staged, and [`set_flight_levels`][Airspaces::set_flight_levels] with
    /// the pressure already applied.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Planar frame shared by every indexed airspace
    pub fn projection(&self) -> &FlatProjection {
        &self.projection
    }

    /// Pressure setting last applied, `None` before the first
    pub fn pressure(&self) -> Option<AtmosphericPressure> {
        self.pressure
    }

    /// Activity mask last applied
    pub fn activity(&self) -> AirspaceActivity {
        self.activity
    }

    /// Every indexed airspace, active or not
    pub fn iter(&self) -> impl Iterator<Item = &AirspaceEntry> {
        self.entries.iter()
    }

    /// Drop every airspace, indexed and staged
    pub fn clear(&mut self) {
        self.entries.clear();
        self.staged.clear();
        self.index = SpatialIndex::new();
        self.projection = FlatProjection::default();
        self.serial += 1;

        tracing::debug!(serial = self.serial, "Cleared airspace database");
    }

    /// Merge staged airspaces into the spatial index
    ///
    /// Recomputes the projection over all airspaces and rebuilds the index.
    /// Without staged airspaces nothing changes.
    pub fn optimise(&mut self) {
        if self.staged.is_empty() {
            debug_assert_eq!(self.index.len(), self.entries.len());
            return;
        }

        let staged = self.staged.len();
        self.entries.append(&mut self.staged);
        self.rebuild();
        self.serial += 1;

        tracing::debug!(
            airspaces = self.entries.len(),
            staged,
            depth = self.index.depth(),
            serial = self.serial,
            "Rebuilt airspace index"
        );
    }

    fn rebuild(&mut self) {
        let mut bounds: Option<GeoBounds> = None;
        for entry in &self.entries {
            match bounds.as_mut() {
                Some(bounds) => bounds.merge(entry.bounds),
                None => bounds = Some(entry.bounds),
            }
        }
        self.projection = bounds
            .map(|bounds| FlatProjection::from_bounds(&bounds))
            .unwrap_or_default();

        // One unit of padding absorbs the rounding of projected query points
        for entry in &mut self.entries {
            entry.bbox = self.projection.project_bounds(&entry.bounds).expanded(1);
        }

        let boxes: Vec<(FlatBoundingBox, usize)> =
            self.entries.iter().map(|entry| entry.bbox).zip(0..).collect();
        self.index = SpatialIndex::with_node_capacity(boxes, self.config.leaf_capacity);
    }

    fn entry(&self, index: &usize) -> &AirspaceEntry {
        &self.entries[*index]
    }

    /// Active airspaces closer than `range` meters to `location`
    ///
    /// Airspaces containing `location` have a distance of zero.
    pub fn query_within_range(
        &self,
        location: GeoPoint,
        range: f64,
    ) -> impl Iterator<Item = &AirspaceEntry> {
        let bbox = self.projection.project_range(location, range);
        self.index
            .query_range(bbox)
            .map(move |index| self.entry(index))
            .filter(move |entry| entry.active && entry.airspace.distance(location) <= range)
    }

    /// Active airspaces whose lateral boundary contains `location`
    pub fn query_inside(&self, location: GeoPoint) -> impl Iterator<Item = &AirspaceEntry> {
        let point = self.projection.project(location);
        self.index
            .query_containing(point)
            .map(move |index| self.entry(index))
            .filter(move |entry| entry.active && entry.airspace.inside(location))
    }

    /// Active airspaces containing the aircraft laterally and vertically
    ///
    /// Unresolved bounds are handled according to
    /// [`Config::uncertain_altitude`].
    pub fn query_inside_aircraft(
        &self,
        state: AircraftState,
    ) -> impl Iterator<Item = &AirspaceEntry> {
        let policy = self.config.uncertain_altitude;
        self.query_inside(state.location)
            .filter(move |entry| entry.contains_altitude(state.altitude, policy))
    }

    /// Active airspaces the path `start → end` crosses or starts inside of
    pub fn query_intersecting(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl Iterator<Item = &AirspaceEntry> {
        let a = self.projection.project(start);
        let b = self.projection.project(end);
        self.index
            .query_intersecting(a, b)
            .map(move |index| self.entry(index))
            .filter(move |entry| {
                entry.active
                    && (entry.airspace.intersects(start, end) || entry.airspace.inside(start))
            })
    }

    /// Call `visitor` for every active airspace whose boundary the path
    /// `start → end` crosses
    ///
    /// With `include_inside`, airspaces containing the path without any
    /// boundary crossing are visited as well. The visiting order is unspecified.
    pub fn visit_intersecting<F>(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        include_inside: bool,
        mut visitor: F,
    ) where
        F: FnMut(&AirspaceEntry),
    {
        let a = self.projection.project(start);
        let b = self.projection.project(end);
        for index in self.index.query_intersecting(a, b) {
            let entry = self.entry(index);
            if !entry.active {
                continue;
            }

            let airspace = &entry.airspace;
            if airspace.intersects(start, end) || (include_inside && airspace.inside(start)) {
                visitor(entry);
            }
        }
    }

    /// Active airspace nearest to `location` among those accepted by `condition`
    ///
    /// Searches outwards starting at [`Config::nearest_search_radius`],
    /// doubling the radius until a match is found or the whole globe is covered.
    pub fn find_nearest<P>(&self, location: GeoPoint, condition: P) -> Option<&AirspaceEntry>
    where
        P: AirspacePredicate,
    {
        if self.entries.is_empty() {
            return None;
        }

        let mut radius = self.config.nearest_search_radius.clamp(1.0, MAX_SEARCH_RADIUS);
        loop {
            let nearest = self
                .query_within_range(location, radius)
                .filter(|entry| condition.matches(entry))
                .map(|entry| (entry.airspace.distance(location), entry))
                .min_by(|(a, _), (b, _)| a.total_cmp(b));

            if let Some((_, entry)) = nearest {
                return Some(entry);
            }
            if radius >= MAX_SEARCH_RADIUS {
                return None;
            }
            radius = (radius * 2.0).min(MAX_SEARCH_RADIUS);
        }
    }
}

impl AirspaceDatabase<Owned> {
    /// Empty database with the default [`Config`]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::empty(config)
    }

    /// Stage an airspace for the next [`optimise`][AirspaceDatabase::optimise]
    ///
    /// The airspace is validated first; a rejected airspace is not stored.
    /// Flight levels are resolved with the current pressure setting, terrain
    /// references stay unresolved until the next
    /// [`set_ground_levels`][Self::set_ground_levels].
    pub fn add(&mut self, airspace: Airspace) -> Result<()> {
        if let Err(error) = airspace.validate() {
            tracing::warn!(name = airspace.name(), %error, "Rejected airspace");
            return Err(error);
        }

        let mut entry = AirspaceEntry::new(Arc::new(airspace));
        entry.resolve(&self.pressure.unwrap_or_default());
        entry.active = entry.airspace.days().matches(self.activity);

        self.staged.push(entry);
        self.serial += 1;
        Ok(())
    }

    /// Resolve terrain-referenced bounds with elevations from `terrain`
    ///
    /// Only airspaces with a terrain-referenced bound are looked up, once each,
    /// at their [`center`][Airspace::center]. Staged airspaces are included.
    pub fn set_ground_levels<T>(&mut self, terrain: &T)
    where
        T: TerrainLookup + ?Sized,
    {
        let pressure = self.pressure.unwrap_or_default();

        let mut resolved = 0;
        let mut unknown = 0;
        for entry in self.entries.iter_mut().chain(self.staged.iter_mut()) {
            if !entry.airspace.needs_ground_level() {
                continue;
            }

            entry.ground = terrain.elevation(entry.airspace.center());
            entry.resolve(&pressure);
            match entry.ground {
                Some(_) => resolved += 1,
                None => unknown += 1,
            }
        }
        self.serial += 1;

        tracing::debug!(resolved, unknown, serial = self.serial, "Applied ground levels");
    }

    /// Resolve flight level bounds with a new pressure setting
    ///
    /// Returns `false` without doing anything if `pressure` is exactly the
    /// setting applied last.
    pub fn set_flight_levels(&mut self, pressure: AtmosphericPressure) -> bool {
        if self.pressure == Some(pressure) {
            return false;
        }

        self.pressure = Some(pressure);
        for entry in self.entries.iter_mut().chain(self.staged.iter_mut()) {
            if entry.airspace.needs_pressure() {
                entry.resolve(&pressure);
            }
        }
        self.serial += 1;

        tracing::debug!(qnh = pressure.qnh(), serial = self.serial, "Applied pressure setting");
        true
    }

    /// Mark airspaces active whose schedule matches `mask`
    pub fn set_activity(&mut self, mask: AirspaceActivity) {
        self.activity = mask;

        let mut active = 0;
        for entry in self.entries.iter_mut().chain(self.staged.iter_mut()) {
            entry.active = entry.airspace.days().matches(mask);
            active += usize::from(entry.active);
        }
        self.serial += 1;

        tracing::debug!(?mask, active, serial = self.serial, "Applied activity mask");
    }
}

impl Default for AirspaceDatabase<Owned> {
    fn default() -> Self {
        Self::new()
    }
}

impl AirspaceDatabase<Borrowed> {
    /// Empty view with the default [`Config`]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::empty(config)
    }

    /// Make this view hold exactly the active airspaces of `master` within
    /// `range` of `location` that satisfy `condition`
    ///
    /// Airspaces are shared with `master`, never copied. Airspaces no longer
    /// wanted are removed, new ones added, and the resolved altitudes and
    /// activity of kept ones refreshed from `master`. The index is only
    /// rebuilt if something changed; returns whether it did.
    pub fn synchronise_with<M, P>(
        &mut self,
        master: &AirspaceDatabase<M>,
        location: GeoPoint,
        range: f64,
        condition: P,
    ) -> bool
    where
        P: AirspacePredicate,
    {
        let wanted: Vec<&AirspaceEntry> = master
            .query_within_range(location, range)
            .filter(|entry| condition.matches(entry))
            .collect();
        let by_airspace: HashMap<*const Airspace, &AirspaceEntry> = wanted
            .iter()
            .map(|entry| (Arc::as_ptr(&entry.airspace), *entry))
            .collect();

        let mut removed = 0_usize;
        let mut refreshed = 0_usize;
        self.entries.retain_mut(|entry| match by_airspace.get(&Arc::as_ptr(&entry.airspace)) {
            Some(source) => {
                refreshed += usize::from(entry.copy_state_from(source));
                true
            }
            None => {
                removed += 1;
                false
            }
        });

        let present: HashSet<*const Airspace> = self
            .entries
            .iter()
            .map(|entry| Arc::as_ptr(&entry.airspace))
            .collect();
        let mut added = 0_usize;
        for source in wanted {
            if !present.contains(&Arc::as_ptr(&source.airspace)) {
                self.entries.push(source.clone());
                added += 1;
            }
        }

        tracing::trace!(added, removed, refreshed, "Synchronised airspace view");

        if added + removed + refreshed == 0 {
            return false;
        }

        self.rebuild();
        self.serial += 1;
        true
    }
}

impl Default for AirspaceDatabase<Borrowed> {
    fn default() -> Self {
        Self::new()
    }
}

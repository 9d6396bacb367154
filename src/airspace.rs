//! Airspace entity and its exact boundary geometry

use crate::error::{Error, Result};
use crate::geometry::{
    PlanarPoint, closest_point_on_segment, point_in_polygon, segment_intersection,
};
use crate::projection::FlatProjection;
use crate::types::{AirspaceActivity, AirspaceAltitude, AirspaceClass, GeoBounds, GeoPoint};

/// Minimum number of distinct vertices of a polygon airspace
pub const MIN_POLYGON_POINTS: usize = 3;

/// Lateral boundary of an airspace
#[derive(Debug, Clone, PartialEq)]
pub enum AirspaceShape {
    /// Implicitly closed ring of vertices
    Polygon(Vec<GeoPoint>),
    /// Circle with radius in meters
    Circle { center: GeoPoint, radius: f64 },
}

/// One regulated volume of airspace
///
/// The lateral boundary and the declared vertical limits never change after
/// construction. Altitudes resolved against terrain and pressure are kept by
/// the database entry wrapping the airspace, see
/// [`AirspaceEntry`][crate::AirspaceEntry].
///
/// # Example
///
/// ```
/// use airspaces::{Airspace, AirspaceAltitude, AirspaceClass, GeoPoint};
///
/// let ctr = Airspace::circle("Innsbruck CTR", GeoPoint::from_degrees(47.26, 11.34), 8_000.0)
///     .with_class(AirspaceClass::ControlZone)
///     .with_vertical(AirspaceAltitude::ground(), AirspaceAltitude::msl(2_900.0));
///
/// assert!(ctr.inside(GeoPoint::from_degrees(47.27, 11.35)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Airspace {
    name: String,
    class: AirspaceClass,
    shape: AirspaceShape,
    base: AirspaceAltitude,
    top: AirspaceAltitude,
    days: AirspaceActivity,
    radio: Option<String>,
}

impl Airspace {
    /// Polygon airspace from its vertices
    ///
    /// A closing vertex repeating the first one is dropped. Defaults to
    /// [`AirspaceClass::Other`], ground to unlimited, active every day.
    pub fn polygon(name: impl Into<String>, mut points: Vec<GeoPoint>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self::with_shape(name, AirspaceShape::Polygon(points))
    }

    /// Circular airspace with `radius` in meters
    pub fn circle(name: impl Into<String>, center: GeoPoint, radius: f64) -> Self {
        Self::with_shape(name, AirspaceShape::Circle { center, radius })
    }

    fn with_shape(name: impl Into<String>, shape: AirspaceShape) -> Self {
        Self {
            name: name.into(),
            class: AirspaceClass::default(),
            shape,
            base: AirspaceAltitude::ground(),
            top: AirspaceAltitude::unlimited(),
            days: AirspaceActivity::default(),
            radio: None,
        }
    }

    pub fn with_class(mut self, class: AirspaceClass) -> Self {
        self.class = class;
        self
    }

    /// Set the declared lower and upper limits
    pub fn with_vertical(mut self, base: AirspaceAltitude, top: AirspaceAltitude) -> Self {
        self.base = base;
        self.top = top;
        self
    }

    pub fn with_days(mut self, days: AirspaceActivity) -> Self {
        self.days = days;
        self
    }

    pub fn with_radio(mut self, radio: impl Into<String>) -> Self {
        self.radio = Some(radio.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> AirspaceClass {
        self.class
    }

    pub fn shape(&self) -> &AirspaceShape {
        &self.shape
    }

    pub fn base(&self) -> &AirspaceAltitude {
        &self.base
    }

    pub fn top(&self) -> &AirspaceAltitude {
        &self.top
    }

    pub fn days(&self) -> AirspaceActivity {
        self.days
    }

    pub fn radio(&self) -> Option<&str> {
        self.radio.as_deref()
    }

    /// Check whether either limit is terrain-referenced
    pub fn needs_ground_level(&self) -> bool {
        self.base.needs_ground_level() || self.top.needs_ground_level()
    }

    /// Check whether either limit is a flight level
    pub fn needs_pressure(&self) -> bool {
        self.base.needs_pressure() || self.top.needs_pressure()
    }

    /// Check the boundary is usable for indexing
    ///
    /// Polygons need [`MIN_POLYGON_POINTS`] distinct consecutive vertices,
    /// circles a positive finite radius, and all coordinates must be valid.
    pub fn validate(&self) -> Result<()> {
        match &self.shape {
            AirspaceShape::Polygon(points) => {
                if let Some(&point) = points.iter().find(|p| !p.is_valid()) {
                    return Err(Error::CoordinateOutOfRange { point });
                }

                let distinct = distinct_vertices(points);
                if distinct < MIN_POLYGON_POINTS {
                    return Err(Error::DegeneratePolygon { points: distinct });
                }
            }
            AirspaceShape::Circle { center, radius } => {
                if !center.is_valid() {
                    return Err(Error::CoordinateOutOfRange { point: *center });
                }
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(Error::InvalidRadius { radius: *radius });
                }
            }
        }
        Ok(())
    }

    /// Latitude/longitude box enclosing the boundary
    ///
    /// Only meaningful for airspaces passing [`validate`][Self::validate]; an
    /// empty polygon reports a point box at the origin.
    pub fn bounds(&self) -> GeoBounds {
        match &self.shape {
            AirspaceShape::Polygon(points) => GeoBounds::from_points(points)
                .unwrap_or_else(|| GeoBounds::from(GeoPoint::new(0.0, 0.0))),
            AirspaceShape::Circle { center, radius } => GeoBounds::around(*center, *radius),
        }
    }

    /// Reference point used for terrain lookups and projection centering
    pub fn center(&self) -> GeoPoint {
        match &self.shape {
            AirspaceShape::Polygon(_) => self.bounds().center(),
            AirspaceShape::Circle { center, .. } => *center,
        }
    }

    /// Check whether a location is inside the lateral boundary
    pub fn inside(&self, location: GeoPoint) -> bool {
        match &self.shape {
            AirspaceShape::Circle { center, radius } => location.distance(center) <= *radius,
            AirspaceShape::Polygon(points) => {
                let projection = FlatProjection::centered_at(location);
                let ring = project_ring(&projection, points);
                point_in_polygon(PlanarPoint::default(), &ring)
            }
        }
    }

    /// Point on the boundary nearest to `location`, whether inside or outside
    pub fn closest_point(&self, location: GeoPoint) -> GeoPoint {
        match &self.shape {
            AirspaceShape::Circle { center, radius } => {
                let projection = FlatProjection::centered_at(*center);
                let offset = projection.project_planar(location);
                let length = offset.length();
                let boundary = if length > 0.0 {
                    offset * (*radius / length)
                } else {
                    PlanarPoint::new(*radius, 0.0)
                };
                projection.unproject_planar(boundary)
            }
            AirspaceShape::Polygon(points) => {
                let projection = FlatProjection::centered_at(location);
                let ring = project_ring(&projection, points);
                let origin = PlanarPoint::default();

                let nearest = edges(&ring)
                    .map(|(a, b)| closest_point_on_segment(origin, a, b))
                    .min_by(|a, b| a.length().total_cmp(&b.length()))
                    .unwrap_or(origin);
                projection.unproject_planar(nearest)
            }
        }
    }

    /// Distance in meters from `location` to the airspace, zero inside
    pub fn distance(&self, location: GeoPoint) -> f64 {
        match &self.shape {
            AirspaceShape::Circle { center, radius } => (location.distance(center) - radius).max(0.0),
            AirspaceShape::Polygon(_) => {
                if self.inside(location) {
                    0.0
                } else {
                    location.distance(&self.closest_point(location))
                }
            }
        }
    }

    /// Check whether the path `start → end` crosses the boundary
    ///
    /// A path lying completely inside (or outside) does not cross.
    pub fn intersects(&self, start: GeoPoint, end: GeoPoint) -> bool {
        match &self.shape {
            AirspaceShape::Circle { center, radius } => {
                let projection = FlatProjection::centered_at(*center);
                let a = projection.project_planar(start);
                let b = projection.project_planar(end);
                let nearest = closest_point_on_segment(PlanarPoint::default(), a, b).length();
                nearest <= *radius && a.length().max(b.length()) >= *radius
            }
            AirspaceShape::Polygon(points) => {
                let projection = FlatProjection::centered_at(start);
                let ring = project_ring(&projection, points);
                let a = PlanarPoint::default();
                let b = projection.project_planar(end);
                edges(&ring).any(|(p, q)| segment_intersection(a, b, p, q).is_some())
            }
        }
    }

    /// Sections of the path `start → end` that lie inside the airspace
    ///
    /// Returns `(enter, exit)` pairs ordered along the path. A section starting
    /// inside begins at `start`, one ending inside finishes at `end`.
    pub fn intersections(&self, start: GeoPoint, end: GeoPoint) -> Vec<(GeoPoint, GeoPoint)> {
        let (projection, crossings) = match &self.shape {
            AirspaceShape::Circle { center, radius } => {
                let projection = FlatProjection::centered_at(*center);
                let a = projection.project_planar(start);
                let b = projection.project_planar(end);
                (projection, circle_crossings(a, b, *radius))
            }
            AirspaceShape::Polygon(points) => {
                let projection = FlatProjection::centered_at(start);
                let ring = project_ring(&projection, points);
                let a = projection.project_planar(start);
                let b = projection.project_planar(end);
                let crossings = edges(&ring)
                    .filter_map(|(p, q)| segment_intersection(a, b, p, q))
                    .collect();
                (projection, crossings)
            }
        };

        let a = projection.project_planar(start);
        let b = projection.project_planar(end);
        let at = |t: f64| projection.unproject_planar(a + (b - a) * t);

        // Touching a corner or grazing a circle yields crossings that do not
        // switch sides, so each piece between crossings is tested on its own
        let mut params = vec![0.0];
        params.extend(sorted_unique(crossings));
        params.push(1.0);

        let mut sections: Vec<(f64, f64)> = Vec::new();
        for piece in params.windows(2) {
            let (from, to) = (piece[0], piece[1]);
            if to <= from || !self.inside(at((from + to) / 2.0)) {
                continue;
            }
            match sections.last_mut() {
                Some(last) if last.1 == from => last.1 = to,
                _ => sections.push((from, to)),
            }
        }

        let point = |t: f64| {
            if t <= 0.0 {
                start
            } else if t >= 1.0 {
                end
            } else {
                at(t)
            }
        };
        sections
            .into_iter()
            .map(|(enter, exit)| (point(enter), point(exit)))
            .collect()
    }
}

fn distinct_vertices(points: &[GeoPoint]) -> usize {
    let mut count = 0;
    let mut prev: Option<&GeoPoint> = None;
    for point in points {
        if prev != Some(point) {
            count += 1;
        }
        prev = Some(point);
    }
    // The ring is closed, a last vertex equal to the first is not distinct
    if count > 1 && points.first() == points.last() {
        count -= 1;
    }
    count
}

fn project_ring(projection: &FlatProjection, points: &[GeoPoint]) -> Vec<PlanarPoint> {
    points.iter().map(|p| projection.project_planar(*p)).collect()
}

/// Consecutive edges of a closed ring
fn edges(ring: &[PlanarPoint]) -> impl Iterator<Item = (PlanarPoint, PlanarPoint)> + '_ {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

/// Path parameters in `[0, 1]` where `a → b` crosses the circle around the origin
fn circle_crossings(a: PlanarPoint, b: PlanarPoint, radius: f64) -> Vec<f64> {
    let d = b - a;
    let qa = d.dot(d);
    if qa == 0.0 {
        return Vec::new();
    }

    let qb = 2.0 * a.dot(d);
    let qc = a.dot(a) - radius * radius;
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let root = discriminant.sqrt();
    [(-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)]
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .collect()
}

fn sorted_unique(mut values: Vec<f64>) -> Vec<f64> {
    const EPSILON: f64 = 1e-12;

    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    values
}

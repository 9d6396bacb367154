use std::ops::{Add, Mul, Sub};

/// Point or vector in a local planar frame, in meters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl Add for PlanarPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PlanarPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PlanarPoint {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Where segment `a1 → a2` first meets segment `b1 → b2`
///
/// Returns the parameter `t ∈ [0, 1]` along `a` of the first common point.
/// Touching endpoints count as an intersection; collinear overlaps report
/// the start of the overlap.
pub fn segment_intersection(
    a1: PlanarPoint,
    a2: PlanarPoint,
    b1: PlanarPoint,
    b2: PlanarPoint,
) -> Option<f64> {
    let r = a2 - a1;
    let s = b2 - b1;
    let qp = b1 - a1;
    let denom = r.cross(s);

    if denom == 0.0 {
        // Parallel: only collinear segments can share points
        let rr = r.dot(r);
        if qp.cross(r) != 0.0 || rr == 0.0 {
            return None;
        }

        let t0 = qp.dot(r) / rr;
        let t1 = t0 + s.dot(r) / rr;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        return (lo <= hi).then_some(lo);
    }

    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
}

/// Even-odd point in polygon test
///
/// The polygon is implicitly closed; points exactly on an edge may fall on
/// either side.
pub fn point_in_polygon(point: PlanarPoint, polygon: &[PlanarPoint]) -> bool {
    let Some(&last) = polygon.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    for &current in polygon {
        if (current.y > point.y) != (prev.y > point.y) {
            let x = current.x + (point.y - current.y) * (prev.x - current.x) / (prev.y - current.y);
            if point.x < x {
                inside = !inside;
            }
        }
        prev = current;
    }
    inside
}

/// Point on segment `a → b` nearest to `point`
pub fn closest_point_on_segment(point: PlanarPoint, a: PlanarPoint, b: PlanarPoint) -> PlanarPoint {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return a;
    }

    let t = ((point - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

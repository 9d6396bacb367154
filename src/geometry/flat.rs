/// Integer point in the projected plane of a [`FlatProjection`][crate::FlatProjection]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlatPoint {
    pub x: i32,
    pub y: i32,
}

impl FlatPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in the projected plane
///
/// Edges are inclusive: boxes sharing an edge overlap, and a point on the
/// edge is contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatBoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl FlatBoundingBox {
    /// Create a box from min/max corners.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box from a slice of points
    ///
    /// Returns `None` if the slice is empty.
    pub fn from_points(points: &[FlatPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bbox = Self::from(*first);
        for &point in rest {
            bbox.extend(point);
        }
        Some(bbox)
    }

    /// Grow the box to include a point
    pub fn extend(&mut self, point: FlatPoint) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Grow the box to include another box
    pub fn merge(&mut self, other: FlatBoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Copy of the box grown by `margin` units on every side
    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: self.max_x.saturating_add(margin),
            max_y: self.max_y.saturating_add(margin),
        }
    }

    /// Center of the box, in `i64` to stay exact for extreme coordinates
    pub fn center(&self) -> (i64, i64) {
        (
            (i64::from(self.min_x) + i64::from(self.max_x)) / 2,
            (i64::from(self.min_y) + i64::from(self.max_y)) / 2,
        )
    }

    /// Whether this box contains the point.
    pub fn contains_point(&self, point: FlatPoint) -> bool {
        self.min_x <= point.x && point.x <= self.max_x && self.min_y <= point.y && point.y <= self.max_y
    }

    /// Whether this box overlaps with another in any way.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Whether the segment `a → b` touches this box (Liang-Barsky clipping)
    pub fn intersects_segment(&self, a: FlatPoint, b: FlatPoint) -> bool {
        let dx = f64::from(b.x) - f64::from(a.x);
        let dy = f64::from(b.y) - f64::from(a.y);

        let clips = [
            (-dx, f64::from(a.x) - f64::from(self.min_x)),
            (dx, f64::from(self.max_x) - f64::from(a.x)),
            (-dy, f64::from(a.y) - f64::from(self.min_y)),
            (dy, f64::from(self.max_y) - f64::from(a.y)),
        ];

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in clips {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
                continue;
            }

            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return false;
                }
                t1 = t1.min(r);
            }
        }
        true
    }
}

impl From<FlatPoint> for FlatBoundingBox {
    fn from(point: FlatPoint) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }
}

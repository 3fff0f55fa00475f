/// Position on the canvas, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Equivalent of `pointAt(0.5)`.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Shortest distance from `p` to any point of the segment.
    pub fn distance_to(&self, p: Point) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return self.start.distance(p);
        }

        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy)
            / len_sq)
            .clamp(0.0, 1.0);
        let closest =
            Point::new(self.start.x + t * dx, self.start.y + t * dy);
        closest.distance(p)
    }
}

/// Axis-aligned rectangle, always stored normalized (`min <= max`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build from any two opposite corners, e.g. the two ends of a drag.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin_size(origin: Point, width: f32, height: f32) -> Self {
        Self::from_corners(origin, origin.translated(width, height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }
}

/// Compare points up to f32 rounding.
#[cfg(test)]
pub(crate) fn assert_near(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-4,
        "expected {expected:?}, got {actual:?}"
    );
}

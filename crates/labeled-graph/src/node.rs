use crate::geometry::{Point, Rect};
use crate::label::{Captions, KeyValue};

/// Diameter used when nothing else is configured.
pub const DEFAULT_NODE_DIAMETER: f32 = 60.0;

/// Circular graph vertex carrying a key/value label pair.
///
/// The position is the top-left corner of the circle's bounding square.
/// Captions are kept in sync with both the position and the label.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    origin: Point,
    diameter: f32,
    label: KeyValue,
    captions: Captions,
}

impl Node {
    pub fn new(origin: Point, diameter: f32) -> Self {
        let label = KeyValue::default();
        let captions = Self::layout_captions(origin, diameter, &label);
        Self {
            origin,
            diameter,
            label,
            captions,
        }
    }

    /// Node whose circle is centred on `center`.
    pub fn centered_at(center: Point, diameter: f32) -> Self {
        let half = diameter / 2.0;
        Self::new(center.translated(-half, -half), diameter)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    pub fn center(&self) -> Point {
        self.origin.translated(self.radius(), self.radius())
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.diameter, self.diameter)
    }

    pub fn label(&self) -> &KeyValue {
        &self.label
    }

    pub fn captions(&self) -> &Captions {
        &self.captions
    }

    pub fn set_key_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.set_label(KeyValue::new(key, value));
    }

    pub fn set_label(&mut self, label: KeyValue) {
        self.label = label;
        self.refresh_captions();
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = self.origin.translated(dx, dy);
        self.refresh_captions();
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center().distance(p) <= self.radius()
    }

    /// Point of the circle in the direction of `target`.
    pub fn boundary_point_towards(&self, target: Point) -> Point {
        let center = self.center();
        let dist = center.distance(target);
        if dist <= f32::EPSILON {
            return center;
        }
        let radius = self.radius();
        center.translated(
            (target.x - center.x) / dist * radius,
            (target.y - center.y) / dist * radius,
        )
    }

    fn refresh_captions(&mut self) {
        self.captions =
            Self::layout_captions(self.origin, self.diameter, &self.label);
    }

    fn layout_captions(
        origin: Point,
        diameter: f32,
        label: &KeyValue,
    ) -> Captions {
        let mid_x = origin.x + diameter / 2.0;
        Captions::layout(
            label,
            Point::new(mid_x, origin.y),
            Point::new(mid_x, origin.y + diameter),
        )
    }
}

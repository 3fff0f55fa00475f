use crate::geometry::{Point, Segment};
use crate::label::{Captions, KeyValue};
use crate::node::Node;

/// How close (in canvas units) a point must be to an edge's line to hit it.
pub const EDGE_HIT_TOLERANCE: f32 = 4.0;

/// Line between two nodes carrying its own key/value label pair.
///
/// An edge does not own its endpoints: the scene graph stores them. The line
/// is derived state, recomputed by [`Edge::adjust`] from the endpoint nodes.
/// An edge that was never adjusted against two nodes has no line and is
/// simply not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    label: KeyValue,
    line: Option<Segment>,
    captions: Captions,
}

impl Default for Edge {
    fn default() -> Self {
        Self::new()
    }
}

impl Edge {
    pub fn new() -> Self {
        let label = KeyValue::default();
        let captions = Captions::layout(&label, Point::ORIGIN, Point::ORIGIN);
        Self {
            label,
            line: None,
            captions,
        }
    }

    pub fn with_label(label: KeyValue) -> Self {
        let mut edge = Self::new();
        edge.set_label(label);
        edge
    }

    pub fn label(&self) -> &KeyValue {
        &self.label
    }

    pub fn line(&self) -> Option<Segment> {
        self.line
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

    /// Recompute the line between the two circles' boundary points.
    ///
    /// With an endpoint missing the edge becomes inert (no line).
    pub fn adjust(&mut self, source: Option<&Node>, dest: Option<&Node>) {
        self.line = match (source, dest) {
            (Some(source), Some(dest)) => Some(Segment::new(
                source.boundary_point_towards(dest.center()),
                dest.boundary_point_towards(source.center()),
            )),
            _ => None,
        };
        self.refresh_captions();
    }

    pub fn contains(&self, p: Point) -> bool {
        self.line
            .is_some_and(|line| line.distance_to(p) <= EDGE_HIT_TOLERANCE)
    }

    fn refresh_captions(&mut self) {
        let center = self
            .line
            .map(|line| line.midpoint())
            .unwrap_or(Point::ORIGIN);
        self.captions = Captions::layout(&self.label, center, center);
    }
}

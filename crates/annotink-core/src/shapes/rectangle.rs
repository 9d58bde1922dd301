//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// An axis-aligned rectangle spanned by two opposite corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Corner where the gesture started.
    pub start: Point,
    /// Opposite corner.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle from two corners, in any order.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn start(&self) -> Point {
        self.start
    }

    fn end(&self) -> Point {
        self.end
    }

    fn set_end(&mut self, end: Point) {
        self.end = end;
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    /// Strict containment: points on the border are outside.
    fn is_in_path(&self, point: Point, scale: f64) -> bool {
        let bounds = self.bounds(scale);
        point.x > bounds.x0 && point.x < bounds.x1 && point.y > bounds.y0 && point.y < bounds.y1
    }

    fn to_path(&self, scale: f64) -> BezPath {
        self.bounds(scale).to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Circle as KurboCircle, Point, Shape as KurboShape, Vec2};
use uuid::Uuid;

/// A circle defined by two opposite corners of a box.
///
/// The center sits on the box's min corner and the radius is the diagonal
/// of the box, so dragging out from the click point grows the circle around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Corner where the gesture started.
    pub start: Point,
    /// Opposite corner.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle from two corners, in any order.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    /// Center in device pixels.
    pub fn center(&self, scale: f64) -> Point {
        self.bounds(scale).origin()
    }

    /// Radius in device pixels.
    pub fn radius(&self, scale: f64) -> f64 {
        let bounds = self.bounds(scale);
        bounds.width().hypot(bounds.height())
    }

    /// Get as a kurbo Circle (device pixels).
    pub fn as_kurbo(&self, scale: f64) -> KurboCircle {
        KurboCircle::new(self.center(scale), self.radius(scale))
    }
}

impl ShapeTrait for Circle {
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

    /// Inclusive containment: points exactly on the circle are inside.
    fn is_in_path(&self, point: Point, scale: f64) -> bool {
        (point - self.center(scale)).hypot() <= self.radius(scale)
    }

    fn to_path(&self, scale: f64) -> BezPath {
        self.as_kurbo(scale).to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_min_corner() {
        let circle = Circle::new(Point::new(13.0, 14.0), Point::new(10.0, 10.0));
        assert_eq!(circle.center(1.0), Point::new(10.0, 10.0));
        assert!((circle.radius(1.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_radius_scales() {
        let circle = Circle::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((circle.radius(2.0) - 10.0).abs() < f64::EPSILON);
        assert_eq!(circle.center(2.0), Point::ZERO);
    }

    #[test]
    fn test_hit_test_on_radius_included() {
        let circle = Circle::new(Point::new(10.0, 10.0), Point::new(13.0, 14.0));
        assert!(circle.is_in_path(Point::new(15.0, 10.0), 1.0));
        assert!(circle.is_in_path(Point::new(10.0, 5.0), 1.0));
        assert!(circle.is_in_path(Point::new(13.0, 14.0), 1.0));
        assert!(!circle.is_in_path(Point::new(15.1, 10.0), 1.0));
    }

    #[test]
    fn test_hit_test_behind_center() {
        // The circle extends above and left of the click point too.
        let circle = Circle::new(Point::new(50.0, 50.0), Point::new(60.0, 50.0));
        assert!(circle.is_in_path(Point::new(42.0, 50.0), 1.0));
    }

    #[test]
    fn test_zero_extent_hits_only_center() {
        let circle = Circle::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(circle.is_in_path(Point::new(5.0, 5.0), 1.0));
        assert!(!circle.is_in_path(Point::new(5.5, 5.0), 1.0));
    }
}

//! Shape definitions for the annotation surface.

mod circle;
mod rectangle;

pub use circle::Circle;
pub use rectangle::Rectangle;

use crate::surface::DrawContext;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
///
/// Every field is optional: a style doubles as a partial update, where
/// `None` means "keep what is already there".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color (None = no outline).
    #[serde(default)]
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width in logical pixels.
    #[serde(default)]
    pub line_width: Option<f64>,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Create an empty style (nothing stroked, nothing filled).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color.into());
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    /// Merge another style into this one. Fields set in `other` win.
    pub fn merge(&mut self, other: &ShapeStyle) {
        if other.stroke_color.is_some() {
            self.stroke_color = other.stroke_color;
        }
        if other.line_width.is_some() {
            self.line_width = other.line_width;
        }
        if other.fill_color.is_some() {
            self.fill_color = other.fill_color;
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Option<Color> {
        self.stroke_color.map(Into::into)
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Into::into)
    }

    /// An outline is drawn only with a color and a positive width.
    pub fn is_stroked(&self) -> bool {
        self.stroke_color.is_some() && self.line_width.is_some_and(|w| w > 0.0)
    }
}

/// Kind of shape created by a pointer-down on empty space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Circle,
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Normalized box spanned by two corners, scaled by the device-pixel ratio.
fn scaled_bounds(start: Point, end: Point, scale: f64) -> Rect {
    let rect = Rect::from_points(start, end);
    Rect::new(
        rect.x0 * scale,
        rect.y0 * scale,
        rect.x1 * scale,
        rect.y1 * scale,
    )
}

/// Common trait for all shapes.
///
/// Coordinates are stored in logical pixels. Anything that depends on the
/// device-pixel ratio takes it as `scale` so shapes stay correct when it
/// changes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Corner where the gesture started.
    fn start(&self) -> Point;

    /// Corner under the pointer when the gesture ended.
    fn end(&self) -> Point;

    /// Move the end corner (resizes the shape).
    fn set_end(&mut self, end: Point);

    /// Move both corners by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Bounding box in device pixels.
    fn bounds(&self, scale: f64) -> Rect {
        scaled_bounds(self.start(), self.end(), scale)
    }

    /// Check if a point (in device pixels) lies inside this shape.
    fn is_in_path(&self, point: Point, scale: f64) -> bool;

    /// Get the path representation for rendering, in device pixels.
    fn to_path(&self, scale: f64) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Merge a partial style into this shape's style.
    fn set_style(&mut self, style: &ShapeStyle) {
        self.style_mut().merge(style);
    }

    /// Paint the shape: fill first (if any), then the outline (if stroked).
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not a finite positive number.
    fn draw(&self, ctx: &mut dyn DrawContext, scale: f64) {
        assert!(
            scale.is_finite() && scale > 0.0,
            "device pixel ratio must be finite and positive, got {scale}"
        );
        let path = self.to_path(scale);
        let style = self.style();
        if let Some(fill) = style.fill() {
            ctx.fill_path(&path, fill);
        }
        if style.is_stroked() {
            if let (Some(color), Some(width)) = (style.stroke(), style.line_width) {
                ctx.stroke_path(&path, color, width * scale);
            }
        }
    }
}

/// Enum wrapper over the closed set of shape variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rectangle),
    Circle(Circle),
}

impl Shape {
    /// Create a zero-extent shape of `kind` anchored at `start`.
    pub fn new(kind: ShapeKind, start: Point) -> Self {
        match kind {
            ShapeKind::Rect => Shape::Rect(Rectangle::new(start, start)),
            ShapeKind::Circle => Shape::Circle(Circle::new(start, start)),
        }
    }

    /// The variant tag.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    fn inner(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rect(s) => s,
            Shape::Circle(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rect(s) => s,
            Shape::Circle(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.inner().id()
    }

    pub fn start(&self) -> Point {
        self.inner().start()
    }

    pub fn end(&self) -> Point {
        self.inner().end()
    }

    pub fn set_end(&mut self, end: Point) {
        self.inner_mut().set_end(end);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.inner_mut().translate(delta);
    }

    pub fn bounds(&self, scale: f64) -> Rect {
        self.inner().bounds(scale)
    }

    pub fn is_in_path(&self, point: Point, scale: f64) -> bool {
        self.inner().is_in_path(point, scale)
    }

    pub fn to_path(&self, scale: f64) -> BezPath {
        self.inner().to_path(scale)
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.inner_mut().style_mut()
    }

    pub fn set_style(&mut self, style: &ShapeStyle) {
        self.inner_mut().set_style(style);
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, scale: f64) {
        self.inner().draw(ctx, scale);
    }
}

//! Contracts for the collaborators the engine talks to but does not own:
//! the drawing surface's stroke history and the 2D drawing context.

use kurbo::BezPath;
use peniko::Color;
use std::cell::RefCell;
use std::rc::Rc;

/// History of the raster drawing surface that hosts the shapes.
///
/// The controller only needs to roll back the single entry the surface
/// records for a pointer-down that turns out to start a drag.
pub trait SurfaceHistory {
    /// Step the surface history back one entry.
    fn undo(&mut self);

    /// Drop entries that are no longer reachable by undo.
    fn clean_unused_nodes(&mut self);
}

/// Surface history shared between the drawing surface and the controller.
///
/// Everything runs on the UI thread, so shared ownership is `Rc<RefCell<_>>`.
pub type SharedSurfaceHistory = Rc<RefCell<dyn SurfaceHistory>>;

/// A 2D drawing target supplied to [`Shape::draw`](crate::shapes::Shape::draw).
///
/// Paths are already in device pixels.
pub trait DrawContext {
    /// Fill the interior of a path.
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Stroke the outline of a path.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);
}

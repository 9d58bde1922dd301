//! Renderer trait abstraction.

use annotink_core::ShapeController;
use kurbo::{Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Empty viewport: {0:?}")]
    EmptyViewport(Size),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The controller whose current shapes are painted.
    pub controller: &'a ShapeController,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Background color (None = leave the surface untouched).
    pub background_color: Option<Color>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(controller: &'a ShapeController, viewport_size: Size) -> Self {
        Self {
            controller,
            viewport_size,
            background_color: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// The full viewport rectangle.
    pub fn viewport(&self) -> Rect {
        self.viewport_size.to_rect()
    }

    /// Reject viewports nothing can be painted into.
    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(RendererError::EmptyViewport(self.viewport_size))
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}

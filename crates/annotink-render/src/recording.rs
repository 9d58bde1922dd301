//! Headless drawing context that records commands instead of painting.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use annotink_core::DrawContext;
use kurbo::{BezPath, Shape as KurboShape};
use peniko::Color;

/// A single recorded drawing operation (device pixels).
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill { path: BezPath, color: Color },
    Stroke { path: BezPath, color: Color, width: f64 },
}

/// Drawing context that appends every operation to a list.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the context empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawContext for RecordingContext {
    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color,
            width,
        });
    }
}

/// Renderer that records a full frame into a [`RecordingContext`].
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    context: RecordingContext,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last built frame.
    pub fn commands(&self) -> &[DrawCommand] {
        self.context.commands()
    }
}

impl Renderer for RecordingRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        self.context.clear();

        if let Some(background) = ctx.background_color {
            self.context.fill_path(&ctx.viewport().to_path(0.1), background);
        }
        ctx.controller.render(&mut self.context);

        log::trace!("Recorded frame with {} commands", self.context.commands().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RendererError;
    use annotink_core::{ShapeController, ShapeKind, ShapeStyle};
    use kurbo::{Point, Size};

    fn controller_with_two_shapes() -> ShapeController {
        let mut controller = ShapeController::new();
        controller.pointer_down(Point::new(10.0, 10.0));
        controller.pointer_move(Point::new(50.0, 40.0));
        controller.pointer_up();

        controller.set_shape_kind(ShapeKind::Circle);
        controller
            .set_shape_style(&ShapeStyle::new().with_fill_color(Color::from_rgba8(255, 0, 0, 255)))
            .unwrap();
        controller.pointer_down(Point::new(100.0, 100.0));
        controller.pointer_move(Point::new(110.0, 100.0));
        controller.pointer_up();
        controller
    }

    #[test]
    fn test_records_fill_before_stroke() {
        let controller = controller_with_two_shapes();
        let mut ctx = RecordingContext::new();
        controller.render(&mut ctx);

        let commands = ctx.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::Stroke { .. }));
        assert!(matches!(commands[1], DrawCommand::Fill { .. }));
        assert!(matches!(commands[2], DrawCommand::Stroke { width, .. } if (width - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_rect_path_in_device_pixels() {
        let mut controller = ShapeController::new();
        controller.set_scale_factor(2.0).unwrap();
        controller.pointer_down(Point::new(10.0, 10.0));
        controller.pointer_move(Point::new(50.0, 40.0));
        controller.pointer_up();

        let mut ctx = RecordingContext::new();
        controller.render(&mut ctx);
        match &ctx.commands()[0] {
            DrawCommand::Stroke { path, width, .. } => {
                let bbox = path.bounding_box();
                assert!((bbox.x0 - 20.0).abs() < 1e-9);
                assert!((bbox.y1 - 80.0).abs() < 1e-9);
                assert!((width - 4.0).abs() < f64::EPSILON);
            }
            other => panic!("expected stroke, got {other:?}"),
        }
    }

    #[test]
    fn test_renderer_paints_background_first() {
        let controller = controller_with_two_shapes();
        let mut renderer = RecordingRenderer::new();
        let ctx = RenderContext::new(&controller, Size::new(800.0, 600.0))
            .with_background(Color::from_rgba8(250, 250, 250, 255));
        renderer.build_scene(&ctx).unwrap();

        assert_eq!(renderer.commands().len(), 4);
        assert!(matches!(renderer.commands()[0], DrawCommand::Fill { .. }));

        // Rebuilding replaces the previous frame.
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(renderer.commands().len(), 4);
    }

    #[test]
    fn test_empty_viewport_rejected() {
        let controller = ShapeController::new();
        let mut renderer = RecordingRenderer::new();
        let ctx = RenderContext::new(&controller, Size::new(0.0, 600.0));
        assert!(matches!(renderer.build_scene(&ctx), Err(RendererError::EmptyViewport(_))));
    }

    #[test]
    fn test_take_commands() {
        let controller = controller_with_two_shapes();
        let mut ctx = RecordingContext::new();
        controller.render(&mut ctx);
        let taken = ctx.take_commands();
        assert_eq!(taken.len(), 3);
        assert!(ctx.commands().is_empty());
    }
}

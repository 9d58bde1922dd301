//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use annotink_core::DrawContext;
use kurbo::{Affine, BezPath, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Drawing context that paints into a borrowed Vello scene.
pub struct VelloContext<'a> {
    scene: &'a mut Scene,
    transform: Affine,
}

impl<'a> VelloContext<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            transform: Affine::IDENTITY,
        }
    }

    /// Apply an extra transform to everything painted through this context.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }
}

impl DrawContext for VelloContext<'_> {
    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.transform, color, None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        let stroke = Stroke::new(width);
        self.scene.stroke(&stroke, self.transform, color, None, path);
    }
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
#[derive(Default)]
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene built by the last frame, ready to hand to a `vello::Renderer`.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        self.scene.reset();

        if let Some(background) = ctx.background_color {
            self.scene.fill(
                Fill::NonZero,
                Affine::IDENTITY,
                background,
                None,
                &ctx.viewport(),
            );
        }

        let mut context = VelloContext::new(&mut self.scene);
        ctx.controller.render(&mut context);
        Ok(())
    }
}

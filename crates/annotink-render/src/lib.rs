//! annotink Render Library
//!
//! Renderer abstraction and drawing contexts for annotink.
//! `RecordingContext` captures draw commands headlessly; the optional
//! `vello-renderer` feature paints into a Vello scene.

mod recording;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordingContext, RecordingRenderer};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{VelloContext, VelloRenderer};

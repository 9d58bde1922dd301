//! annotink Core Library
//!
//! Shape history and pointer interaction engine for the annotink annotation
//! surface: a branch-pruning undo/redo list, hit-testable shapes, and the
//! controller that creates and drags shapes without polluting the drawing
//! surface's own history.

pub mod config;
pub mod controller;
pub mod history;
pub mod input;
pub mod shapes;
pub mod surface;

pub use config::{ConfigError, ConfigResult, ControllerConfig};
pub use controller::{GestureState, ShapeController, ShapeSnapshot};
pub use history::{HistoryList, HistoryNode, NodeId};
pub use input::{MouseButton, PointerEvent};
pub use shapes::{Circle, Rectangle, SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait};
pub use surface::{DrawContext, SharedSurfaceHistory, SurfaceHistory};

//! Pointer-driven shape controller.
//!
//! The controller turns pointer gestures into shapes. A pointer-down on empty
//! space creates a shape and records it as one undoable step; a pointer-down
//! on an existing shape drags it, which is never recorded. The drawing surface
//! hosting the shapes keeps its own stroke history, and the controller rolls
//! back the entry that surface records for a drag's pointer-down so the drag
//! does not show up there either.

use crate::config::{self, ConfigResult, ControllerConfig};
use crate::history::HistoryList;
use crate::input::{MouseButton, PointerEvent};
use crate::shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
use crate::surface::{DrawContext, SharedSurfaceHistory};
use kurbo::Point;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One history entry: the shapes on the canvas, back to front.
pub type ShapeSnapshot = Vec<ShapeId>;

/// State of the current pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No button held.
    #[default]
    Idle,
    /// Sizing a shape created by this gesture.
    Drawing { shape: ShapeId },
    /// Moving an existing shape.
    Dragging {
        shape: ShapeId,
        /// Pointer position (logical pixels) at the last applied delta.
        last_pointer: Point,
    },
}

/// Creates, drags and tracks shapes against the shape history.
///
/// Shapes live in an arena keyed by id; history snapshots hold ids only.
/// Dragging mutates the arena entry, so every snapshot containing a shape
/// sees its latest position.
pub struct ShapeController {
    history: HistoryList<ShapeSnapshot>,
    arena: HashMap<ShapeId, Shape>,
    shape_kind: ShapeKind,
    current_style: ShapeStyle,
    scale_factor: f64,
    gesture: GestureState,
    surface_history: Option<SharedSurfaceHistory>,
    repaint: Option<Box<dyn FnMut()>>,
}

impl Default for ShapeController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeController")
            .field("history_len", &self.history.len())
            .field("arena_len", &self.arena.len())
            .field("shape_kind", &self.shape_kind)
            .field("current_style", &self.current_style)
            .field("scale_factor", &self.scale_factor)
            .field("gesture", &self.gesture)
            .field("has_surface_history", &self.surface_history.is_some())
            .finish_non_exhaustive()
    }
}

impl ShapeController {
    /// Create a controller with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(ControllerConfig::default())
    }

    /// Create a controller from a configuration.
    pub fn with_config(config: ControllerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ControllerConfig) -> Self {
        Self {
            history: HistoryList::new(),
            arena: HashMap::new(),
            shape_kind: config.shape_kind,
            current_style: config.style,
            scale_factor: config.scale_factor,
            gesture: GestureState::Idle,
            surface_history: None,
            repaint: None,
        }
    }

    /// Attach the drawing surface's history (builder form).
    pub fn with_surface_history(mut self, history: SharedSurfaceHistory) -> Self {
        self.surface_history = Some(history);
        self
    }

    /// Attach the drawing surface's history, replacing any previous one.
    pub fn attach_surface_history(&mut self, history: SharedSurfaceHistory) {
        self.surface_history = Some(history);
    }

    /// Detach the drawing surface's history.
    pub fn detach_surface_history(&mut self) -> Option<SharedSurfaceHistory> {
        self.surface_history.take()
    }

    /// Set the callback that asks the host to repaint.
    pub fn set_repaint_callback(&mut self, callback: impl FnMut() + 'static) {
        self.repaint = Some(Box::new(callback));
    }

    // --- Configuration ---

    /// Kind of shape created by the next pointer-down on empty space.
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    /// Change the kind of shape to create. A shape already being drawn or
    /// dragged is unaffected.
    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
    }

    /// Style applied to newly created shapes.
    pub fn current_style(&self) -> &ShapeStyle {
        &self.current_style
    }

    /// Merge a partial style into the style for new shapes.
    pub fn set_shape_style(&mut self, style: &ShapeStyle) -> ConfigResult<()> {
        config::validate_style(style)?;
        self.current_style.merge(style);
        Ok(())
    }

    /// Device pixel ratio of the backing surface.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Update the device pixel ratio.
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> ConfigResult<()> {
        config::validate_scale_factor(scale_factor)?;
        if (self.scale_factor - scale_factor).abs() > f64::EPSILON {
            self.scale_factor = scale_factor;
            self.request_repaint();
        }
        Ok(())
    }

    // --- Queries ---

    /// The shape history (read-only).
    pub fn history(&self) -> &HistoryList<ShapeSnapshot> {
        &self.history
    }

    /// Shapes of the current snapshot, back to front.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.history
            .current_value()
            .into_iter()
            .flatten()
            .filter_map(|id| self.arena.get(id))
    }

    /// Number of shapes in the current snapshot.
    pub fn shape_count(&self) -> usize {
        self.history.current_value().map_or(0, Vec::len)
    }

    /// Get a shape by id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.arena.get(&id)
    }

    /// Topmost shape of the current snapshot under a point (logical pixels).
    pub fn shape_at(&self, position: Point) -> Option<ShapeId> {
        let scale = self.scale_factor;
        let device = Point::new(position.x * scale, position.y * scale);
        self.history
            .current_value()?
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.arena
                    .get(id)
                    .is_some_and(|shape| shape.is_in_path(device, scale))
            })
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, GestureState::Drawing { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging { .. })
    }

    /// Shape being dragged, if any.
    pub fn dragged_shape(&self) -> Option<ShapeId> {
        match self.gesture {
            GestureState::Dragging { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Pointer handling ---

    /// Process a pointer event. Only the left button starts gestures.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Start a gesture at `position` (logical pixels).
    ///
    /// Pending redo history is dropped first: this gesture supersedes it.
    /// Then the topmost shape under the pointer is dragged, or a new shape is
    /// created if there is none.
    pub fn pointer_down(&mut self, position: Point) {
        self.prune_history();

        if let Some(shape) = self.shape_at(position) {
            log::debug!("Dragging shape {shape} from ({}, {})", position.x, position.y);
            self.gesture = GestureState::Dragging {
                shape,
                last_pointer: position,
            };
            self.suppress_surface_history();
        } else {
            let shape = self.create_shape(position);
            log::debug!("Drawing new {:?} {shape} at ({}, {})", self.shape_kind, position.x, position.y);
            self.gesture = GestureState::Drawing { shape };
            self.request_repaint();
        }
    }

    /// Continue the current gesture.
    pub fn pointer_move(&mut self, position: Point) {
        let changed = match &mut self.gesture {
            GestureState::Idle => false,
            GestureState::Drawing { shape } => {
                let id = *shape;
                match self.arena.get_mut(&id) {
                    Some(target) => {
                        target.set_end(position);
                        true
                    }
                    None => false,
                }
            }
            GestureState::Dragging {
                shape,
                last_pointer,
            } => {
                let id = *shape;
                let delta = position - *last_pointer;
                *last_pointer = position;
                match self.arena.get_mut(&id) {
                    Some(target) => {
                        target.translate(delta);
                        true
                    }
                    None => false,
                }
            }
        };

        if changed {
            log::trace!("Pointer move to ({}, {})", position.x, position.y);
            self.request_repaint();
        }
    }

    /// Finish the current gesture. Nothing is recorded here.
    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    /// The pointer left the surface; the gesture stops where it is.
    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        if self.gesture != GestureState::Idle {
            log::debug!("Gesture ended: {:?}", self.gesture);
        }
        self.gesture = GestureState::Idle;
    }

    // --- History ---

    /// Step back one shape creation. Returns whether the canvas changed.
    ///
    /// Ignored while a gesture is in progress.
    pub fn undo(&mut self) -> bool {
        if self.gesture != GestureState::Idle {
            log::debug!("Undo ignored during gesture");
            return false;
        }
        let changed = self.history.can_undo();
        self.history.undo();
        if changed {
            self.request_repaint();
        }
        changed
    }

    /// Step forward one shape creation. Returns whether the canvas changed.
    ///
    /// Ignored while a gesture is in progress.
    pub fn redo(&mut self) -> bool {
        if self.gesture != GestureState::Idle {
            log::debug!("Redo ignored during gesture");
            return false;
        }
        let changed = self.history.can_redo();
        self.history.redo();
        if changed {
            self.request_repaint();
        }
        changed
    }

    /// Remove every shape and all history.
    pub fn clear(&mut self) {
        self.history.clean_all();
        self.arena.clear();
        self.gesture = GestureState::Idle;
        self.request_repaint();
    }

    // --- Rendering ---

    /// Draw the current snapshot back to front.
    pub fn render(&self, ctx: &mut dyn DrawContext) {
        for shape in self.shapes() {
            shape.draw(ctx, self.scale_factor);
        }
    }

    // --- Internals ---

    fn create_shape(&mut self, position: Point) -> ShapeId {
        let mut shape = Shape::new(self.shape_kind, position);
        shape.set_style(&self.current_style);
        let id = shape.id();

        let mut snapshot = self.history.current_value().cloned().unwrap_or_default();
        snapshot.push(id);

        self.arena.insert(id, shape);
        self.history.add(snapshot);
        id
    }

    /// Resolve pending redo branches or a deferred full clear, then drop
    /// shapes no snapshot refers to anymore.
    fn prune_history(&mut self) {
        let before = self.history.len();
        let cleaned_all = self.history.clean_unused_nodes();
        if cleaned_all || self.history.len() != before {
            log::debug!(
                "Pruned shape history: {} -> {} entries (full clear: {cleaned_all})",
                before,
                self.history.len()
            );
            self.collect_unreferenced_shapes();
        }
    }

    fn collect_unreferenced_shapes(&mut self) {
        let mut live = HashSet::new();
        self.history
            .for_each(|node| live.extend(node.value().iter().copied()));
        self.arena.retain(|id, _| live.contains(id));
    }

    /// Roll back the entry the surface recorded for this pointer-down.
    fn suppress_surface_history(&self) {
        let Some(surface) = &self.surface_history else {
            log::debug!("No surface history attached, nothing to suppress");
            return;
        };
        match surface.try_borrow_mut() {
            Ok(mut history) => {
                history.undo();
                history.clean_unused_nodes();
            }
            Err(_) => log::warn!("Surface history is busy; drag start left in its history"),
        }
    }

    fn request_repaint(&mut self) {
        if let Some(repaint) = self.repaint.as_mut() {
            repaint();
        }
    }
}

//! Pointer gestures and listener scopes
//!
//! A drag or resize listens for pointer move and up events on a global scope
//! for as long as it runs. The registration is held by a [`Subscription`]
//! inside the [`Gesture`], so ending, cancelling or dropping the gesture
//! (including dropping the whole session) always unregisters it.

use std::sync::Arc;

use marque_core::{
    drag, resize, resize_text, Frame, GeometryError, GestureAnchor, Layer, LayerId, MinimumSize, Point, ResizeHandle,
    Size,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// ─────────────────────────────────────────────────────────────────────────────
// Listener registry
// ─────────────────────────────────────────────────────────────────────────────

/// Global pointer events a gesture listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Move,
    Up,
}

type Kinds = SmallVec<[PointerEventKind; 2]>;

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    active: FxHashMap<u64, Kinds>,
}

/// Tracks live pointer listener registrations
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for the given events until the subscription is dropped
    pub fn subscribe(&self, kinds: &[PointerEventKind]) -> Subscription {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.active.insert(id, kinds.iter().copied().collect());
        Subscription {
            registry: self.clone(),
            id,
        }
    }

    /// Number of live subscriptions
    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Whether any live subscription listens for `kind`
    pub fn is_listening(&self, kind: PointerEventKind) -> bool {
        self.state
            .lock()
            .active
            .values()
            .any(|kinds| kinds.contains(&kind))
    }

    fn release(&self, id: u64) {
        self.state.lock().active.remove(&id);
    }
}

/// A live listener registration
#[derive(Debug)]
pub struct Subscription {
    registry: ListenerRegistry,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gestures
// ─────────────────────────────────────────────────────────────────────────────

/// What the pointer is doing to the layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

/// Outcome of one pointer move
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureStep {
    pub frame: Frame,
    /// Present when a text resize changed the font size
    pub font_size: Option<f32>,
}

/// An in-progress drag or resize of one layer
#[derive(Debug)]
pub struct Gesture {
    layer: LayerId,
    kind: GestureKind,
    anchor: GestureAnchor,
    start_frame: Frame,
    /// Font size at gesture start, for text layers
    start_font_size: Option<f32>,
    minimum: MinimumSize,
    _subscription: Subscription,
}

impl Gesture {
    pub(crate) fn start(
        layer: &Layer,
        kind: GestureKind,
        pointer: Point,
        canvas: Size,
        listeners: &ListenerRegistry,
    ) -> Result<Self, GeometryError> {
        let anchor = GestureAnchor::new(pointer, layer.frame, canvas)?;
        let start_font_size = match &layer.kind {
            marque_core::LayerKind::Text(style) => Some(style.font_size),
            _ => None,
        };
        Ok(Self {
            layer: layer.id.clone(),
            kind,
            anchor,
            start_frame: layer.frame,
            start_font_size,
            minimum: layer.minimum_size(),
            _subscription: listeners.subscribe(&[PointerEventKind::Move, PointerEventKind::Up]),
        })
    }

    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn start_frame(&self) -> Frame {
        self.start_frame
    }

    pub fn start_font_size(&self) -> Option<f32> {
        self.start_font_size
    }

    /// Compute the layer's frame for the current pointer position
    pub fn step(&self, pointer: Point) -> Result<GestureStep, GeometryError> {
        match self.kind {
            GestureKind::Drag => Ok(GestureStep {
                frame: drag(&self.anchor, pointer)?,
                font_size: None,
            }),
            GestureKind::Resize(handle) => match self.start_font_size {
                Some(font_size) => {
                    let outcome = resize_text(&self.anchor, handle, pointer, font_size)?;
                    Ok(GestureStep {
                        frame: outcome.frame,
                        font_size: outcome.font_size,
                    })
                }
                None => Ok(GestureStep {
                    frame: resize(&self.anchor, handle, pointer, self.minimum)?,
                    font_size: None,
                }),
            },
        }
    }
}

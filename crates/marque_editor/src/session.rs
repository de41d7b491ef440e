//! Editor session state
//!
//! An [`EditorSession`] owns everything one open editor needs: the working
//! scene, its committed history, the selection, the transparency restore
//! point, id allocation, and any in-progress pointer gesture.
//!
//! Layer edits and gestures mutate the working scene directly. Nothing
//! reaches the history until [`EditorSession::commit`] is called at an
//! action boundary; undo and redo discard uncommitted working changes.

use marque_core::{
    Background, EditHistory, FontWeight, GenerationParams, Layer, LayerId, LayerIdGenerator, LayerKind, LayerPatch,
    Point, ResizeHandle, RestorePoint, Scene, ShapeKind, Size, ZOrder,
};
use marque_image::ImagePayload;

use crate::error::{EditorError, Result};
use crate::gesture::{Gesture, GestureKind, GestureStep, ListenerRegistry};

/// One open editor: working scene, history and interaction state
#[derive(Debug)]
pub struct EditorSession {
    working: Scene,
    history: EditHistory<Scene>,
    selection: Option<LayerId>,
    restore: RestorePoint,
    ids: LayerIdGenerator,
    listeners: ListenerRegistry,
    gesture: Option<Gesture>,
    mockup: Option<ImagePayload>,
}

impl EditorSession {
    /// Open an existing scene as history entry 0
    pub fn open(scene: Scene) -> Self {
        let mut restore = RestorePoint::new();
        restore.remember(scene.background());
        tracing::debug!("Editor opened with {} layers", scene.len());
        Self {
            history: EditHistory::new(scene.clone()),
            working: scene,
            selection: None,
            restore,
            ids: LayerIdGenerator::new(),
            listeners: ListenerRegistry::new(),
            gesture: None,
            mockup: None,
        }
    }

    /// Open a single image (a chosen variation or an upload) on white
    pub fn open_image(metadata: GenerationParams, src: ImagePayload) -> Self {
        let mut ids = LayerIdGenerator::new();
        let id = ids.next_free("image", |_| false);
        let mut session = Self::open(Scene::with_placed_logo(metadata, id, src));
        session.ids = ids;
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The working scene, including uncommitted edits
    pub fn scene(&self) -> &Scene {
        &self.working
    }

    pub fn history(&self) -> &EditHistory<Scene> {
        &self.history
    }

    pub fn selection(&self) -> Option<&LayerId> {
        self.selection.as_ref()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selection.as_ref().and_then(|id| self.working.layer(id))
    }

    /// Background the transparency toggle will restore
    pub fn restore_point(&self) -> &Background {
        self.restore.saved()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Latest mockup preview, if any
    pub fn mockup(&self) -> Option<&ImagePayload> {
        self.mockup.as_ref()
    }

    pub fn set_mockup(&mut self, mockup: Option<ImagePayload>) {
        self.mockup = mockup;
    }

    /// Whether the working scene differs from the current history entry
    pub fn is_dirty(&self) -> bool {
        &self.working != self.history.current()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select(&mut self, id: &LayerId) -> Result<()> {
        if !self.working.contains(id) {
            return Err(EditorError::LayerNotFound(id.clone()));
        }
        self.selection = Some(id.clone());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layer edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate an unused `<prefix>-<n>` id
    pub fn next_layer_id(&mut self, prefix: &str) -> LayerId {
        let scene = &self.working;
        self.ids.next_free(prefix, |id| scene.contains(id))
    }

    /// Add a layer on top of the stack and select it
    pub fn add_layer(&mut self, layer: Layer) -> Result<LayerId> {
        let id = layer.id.clone();
        self.working.add_layer(layer)?;
        self.selection = Some(id.clone());
        Ok(id)
    }

    pub fn add_text(&mut self, text: impl Into<String>, font_size: f32, font_weight: FontWeight) -> Result<LayerId> {
        let id = self.next_layer_id("text");
        self.add_layer(Layer::text(id, text, font_size, font_weight))
    }

    pub fn add_shape(&mut self, shape: ShapeKind) -> Result<LayerId> {
        let id = self.next_layer_id("shape");
        self.add_layer(Layer::shape(id, shape))
    }

    pub fn add_image(&mut self, src: ImagePayload) -> Result<LayerId> {
        let id = self.next_layer_id("image");
        self.add_layer(Layer::image(id, src))
    }

    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<()> {
        self.working.update_layer(id, patch)?;
        Ok(())
    }

    /// Remove a layer; clears the selection and any gesture that targeted it
    pub fn delete_layer(&mut self, id: &LayerId) -> Result<Layer> {
        let removed = self.working.delete_layer(id)?;
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        if self.gesture.as_ref().is_some_and(|gesture| gesture.layer() == id) {
            self.gesture = None;
        }
        Ok(removed)
    }

    pub fn reorder(&mut self, id: &LayerId, order: ZOrder) -> Result<i32> {
        Ok(self.working.reorder(id, order)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Background
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the background, remembering the previous opaque one first
    pub fn set_background(&mut self, background: Background) {
        self.restore.remember(self.working.background());
        self.working.replace_background(background);
    }

    /// Swap between transparent and the restore point
    pub fn toggle_transparent(&mut self) -> &Background {
        let next = self.restore.toggle(self.working.background());
        self.working.replace_background(next);
        self.working.background()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gestures
    // ─────────────────────────────────────────────────────────────────────────

    /// Start dragging a layer; `pointer` and `canvas` are in pixels
    pub fn begin_drag(&mut self, id: &LayerId, pointer: Point, canvas: Size) -> Result<()> {
        self.begin_gesture(id, GestureKind::Drag, pointer, canvas)
    }

    /// Start resizing a layer from one of its handles
    pub fn begin_resize(&mut self, id: &LayerId, handle: ResizeHandle, pointer: Point, canvas: Size) -> Result<()> {
        self.begin_gesture(id, GestureKind::Resize(handle), pointer, canvas)
    }

    fn begin_gesture(&mut self, id: &LayerId, kind: GestureKind, pointer: Point, canvas: Size) -> Result<()> {
        let layer = self
            .working
            .layer(id)
            .ok_or_else(|| EditorError::LayerNotFound(id.clone()))?;
        // Any previous gesture is released before the new one subscribes
        self.gesture = None;
        let gesture = Gesture::start(layer, kind, pointer, canvas, &self.listeners)?;
        self.selection = Some(id.clone());
        self.gesture = Some(gesture);
        Ok(())
    }

    /// Apply a pointer move to the active gesture
    ///
    /// Returns `None` when no gesture is running.
    pub fn pointer_move(&mut self, pointer: Point) -> Result<Option<GestureStep>> {
        let Some(gesture) = &self.gesture else {
            return Ok(None);
        };
        let step = gesture.step(pointer)?;
        let mut patch = LayerPatch::new().frame(step.frame);
        if let Some(font_size) = step.font_size {
            patch = patch.font_size(font_size);
        }
        let id = gesture.layer().clone();
        self.working.update_layer(&id, &patch)?;
        Ok(Some(step))
    }

    /// Finish the gesture, keeping its uncommitted result
    pub fn end_gesture(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    /// Abort the gesture and put the layer back where it started
    pub fn cancel_gesture(&mut self) -> Result<()> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(());
        };
        let mut patch = LayerPatch::new().frame(gesture.start_frame());
        if let Some(font_size) = gesture.start_font_size() {
            patch = patch.font_size(font_size);
        }
        self.working.update_layer(gesture.layer(), &patch)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit the working scene with a new description
    ///
    /// The description becomes the scene's `prompt` metadata.
    pub fn commit(&mut self, description: impl Into<String>) {
        self.gesture = None;
        let metadata = GenerationParams {
            prompt: Some(description.into()),
            ..self.working.prompt_metadata().clone()
        };
        self.working.set_prompt_metadata(metadata);
        self.history.commit(self.working.clone());
        self.mockup = None;
    }

    /// Replace an image layer's source and commit
    pub(crate) fn commit_layer_source(
        &mut self,
        id: &LayerId,
        src: ImagePayload,
        description: impl Into<String>,
    ) -> Result<()> {
        self.working.update_layer(id, &LayerPatch::new().src(src))?;
        self.commit(description);
        Ok(())
    }

    /// Swap an image layer for decomposed layers under fresh ids and commit
    pub(crate) fn commit_decomposition(&mut self, id: &LayerId, layers: Vec<Layer>) -> Result<()> {
        let mut fresh = Vec::with_capacity(layers.len());
        for mut layer in layers {
            let scene = &self.working;
            layer.id = self.ids.next_free(layer.kind.name(), |candidate| scene.contains(candidate));
            fresh.push(layer);
        }
        self.working.replace_layer(id, fresh)?;
        self.selection = None;
        self.commit("Vectorized logo");
        Ok(())
    }

    /// Replace the whole scene with one full-canvas image on white and commit
    pub(crate) fn commit_full_canvas(&mut self, src: ImagePayload, description: impl Into<String>) {
        let id = self.next_layer_id("image");
        let scene = Scene::with_full_canvas(self.working.prompt_metadata().clone(), id, src);
        self.working = scene;
        self.selection = None;
        self.restore.remember(self.working.background());
        self.commit(description);
    }

    /// Step back one committed scene
    pub fn undo(&mut self) -> bool {
        let Some(scene) = self.history.undo() else {
            return false;
        };
        let scene = scene.clone();
        self.load(scene);
        true
    }

    /// Step forward one committed scene
    pub fn redo(&mut self) -> bool {
        let Some(scene) = self.history.redo() else {
            return false;
        };
        let scene = scene.clone();
        self.load(scene);
        true
    }

    fn load(&mut self, scene: Scene) {
        self.gesture = None;
        self.working = scene;
        if self
            .selection
            .as_ref()
            .is_some_and(|id| !self.working.contains(id))
        {
            self.selection = None;
        }
        self.restore.remember(self.working.background());
        self.mockup = None;
        tracing::debug!(
            "History at {}/{}",
            self.history.index() + 1,
            self.history.len()
        );
    }

    /// Image source of an image layer
    pub(crate) fn image_source(&self, id: &LayerId) -> Result<ImagePayload> {
        let layer = self
            .working
            .layer(id)
            .ok_or_else(|| EditorError::LayerNotFound(id.clone()))?;
        match &layer.kind {
            LayerKind::Image { src } => Ok(src.clone()),
            _ => Err(EditorError::NotAnImageLayer(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerEventKind;
    use marque_core::{Frame, HexColor};

    fn png(tag: u8) -> ImagePayload {
        ImagePayload::new(vec![tag], "image/png").unwrap()
    }

    fn session() -> EditorSession {
        EditorSession::open_image(GenerationParams::new("Aura"), png(1))
    }

    #[test]
    fn test_open_image_uses_placed_template() {
        let session = session();
        let layer = &session.scene().layers()[0];
        assert_eq!(layer.id.as_str(), "image-1");
        assert_eq!(layer.frame, Frame::new(10.0, 10.0, 80.0, 80.0));
        assert_eq!(layer.z_index, 0);
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_add_image_gets_top_z_and_selection() {
        let mut session = EditorSession::open(Scene::new(GenerationParams::new("Aura")));
        session.add_shape(ShapeKind::Rectangle).unwrap();
        session.add_text("Aura", 48.0, FontWeight::Bold).unwrap();

        let id = session.add_image(png(2)).unwrap();
        assert_eq!(session.scene().layer(&id).unwrap().z_index, 3);
        assert_eq!(session.selection(), Some(&id));
    }

    #[test]
    fn test_ids_skip_existing() {
        let mut session = session();
        let id = session.add_image(png(2)).unwrap();
        assert_eq!(id.as_str(), "image-2");
        assert_eq!(session.add_shape(ShapeKind::Circle).unwrap().as_str(), "shape-3");
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut session = session();
        let id = session.add_shape(ShapeKind::Circle).unwrap();
        session.delete_layer(&id).unwrap();
        assert_eq!(session.selection(), None);
        assert!(matches!(session.select(&id), Err(EditorError::LayerNotFound(_))));
    }

    #[test]
    fn test_background_restore_point() {
        let mut session = session();
        session.set_background(Background::Color(HexColor::parse("#112233").unwrap()));
        assert_eq!(session.restore_point(), &Background::Color(HexColor::WHITE));

        session.toggle_transparent();
        assert!(session.scene().background().is_transparent());
        let restored = session.toggle_transparent().clone();
        assert_eq!(restored, Background::Color(HexColor::parse("#112233").unwrap()));
    }

    #[test]
    fn test_transparent_then_set_then_toggle() {
        let mut session = session();
        session.toggle_transparent();
        session.set_background(Background::Image(png(9)));
        assert_eq!(session.restore_point(), &Background::Color(HexColor::WHITE));
        session.toggle_transparent();
        assert_eq!(session.toggle_transparent(), &Background::Image(png(9)));
    }

    #[test]
    fn test_drag_mutates_working_only() {
        let mut session = session();
        let id = LayerId::new("image-1");
        session
            .begin_drag(&id, Point::new(100.0, 100.0), Size::new(1000.0, 1000.0))
            .unwrap();
        assert_eq!(session.listeners().active_count(), 1);

        session.pointer_move(Point::new(200.0, 150.0)).unwrap();
        session.pointer_move(Point::new(300.0, 200.0)).unwrap();
        assert!(session.end_gesture());

        let frame = session.scene().layer(&id).unwrap().frame;
        assert!((frame.x - 30.0).abs() < 1e-4);
        assert!((frame.y - 20.0).abs() < 1e-4);
        assert_eq!(session.history().len(), 1);
        assert!(session.is_dirty());
        assert!(!session.listeners().is_listening(PointerEventKind::Move));
    }

    #[test]
    fn test_cancel_restores_text_layer() {
        let mut session = session();
        let id = session.add_text("Aura", 40.0, FontWeight::Bold).unwrap();
        session
            .begin_resize(&id, ResizeHandle::South, Point::new(500.0, 550.0), Size::new(1000.0, 1000.0))
            .unwrap();
        session.pointer_move(Point::new(500.0, 650.0)).unwrap();
        session.cancel_gesture().unwrap();

        let layer = session.scene().layer(&id).unwrap();
        assert_eq!(layer.frame, Frame::new(25.0, 45.0, 50.0, 10.0));
        let LayerKind::Text(style) = &layer.kind else {
            panic!("expected text layer");
        };
        assert_eq!(style.font_size, 40.0);
        assert_eq!(session.listeners().active_count(), 0);
    }

    #[test]
    fn test_dropping_session_releases_listeners() {
        let mut session = session();
        let listeners = session.listeners().clone();
        session
            .begin_drag(&LayerId::new("image-1"), Point::ZERO, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(listeners.active_count(), 1);
        drop(session);
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_pointer_move_without_gesture() {
        let mut session = session();
        assert_eq!(session.pointer_move(Point::new(1.0, 1.0)).unwrap(), None);
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut session = session();
        session.add_shape(ShapeKind::Circle).unwrap();
        session.commit("Added a circle");
        assert_eq!(session.scene().prompt_metadata().prompt.as_deref(), Some("Added a circle"));

        assert!(session.undo());
        assert_eq!(session.scene().len(), 1);
        assert_eq!(session.selection(), None);

        assert!(session.redo());
        assert_eq!(session.scene().len(), 2);
        assert!(!session.redo());
    }

    #[test]
    fn test_undo_discards_uncommitted_edits() {
        let mut session = session();
        session.commit("First");
        session.add_shape(ShapeKind::Circle).unwrap();
        assert!(session.undo());
        assert_eq!(session.scene().len(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_full_canvas_commit_resets_background() {
        let mut session = session();
        session.set_background(Background::Image(png(5)));
        session.commit_full_canvas(png(7), "Upscaled to HD");

        let scene = session.scene();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.layers()[0].frame, Frame::FULL);
        assert_eq!(scene.background(), &Background::Color(HexColor::WHITE));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_image_source_rejects_text() {
        let mut session = session();
        let id = session.add_text("Aura", 40.0, FontWeight::Bold).unwrap();
        assert_eq!(session.image_source(&id).unwrap_err(), EditorError::NotAnImageLayer(id));
    }
}

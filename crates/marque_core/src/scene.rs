//! Scene model
//!
//! A [`Scene`] is one editable logo state: the generation parameters that
//! describe it, its layers and its background. Layers are kept in insertion
//! order; [`Scene::paint_order`] derives the order they are drawn and
//! serialized in.

use marque_image::ImagePayload;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::background::Background;
use crate::error::{Result, SceneError};
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::metadata::GenerationParams;

/// Direction for [`Scene::reorder`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZOrder {
    /// Above every other layer
    Front,
    /// Below every other layer
    Back,
}

/// Layers plus background; the unit committed to edit history
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SceneRepr")]
pub struct Scene {
    #[serde(alias = "prompt")]
    prompt_metadata: GenerationParams,
    layers: Vec<Layer>,
    background: Background,
}

/// Unvalidated serialized form
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneRepr {
    #[serde(default, alias = "prompt")]
    prompt_metadata: GenerationParams,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    background: Background,
}

impl TryFrom<SceneRepr> for Scene {
    type Error = SceneError;

    fn try_from(repr: SceneRepr) -> Result<Self> {
        let mut scene = Scene::new(repr.prompt_metadata).with_background(repr.background);
        for layer in repr.layers {
            scene.insert_checked(layer)?;
        }
        Ok(scene)
    }
}

impl Scene {
    /// Create an empty scene on the default white background
    pub fn new(prompt_metadata: GenerationParams) -> Self {
        Self {
            prompt_metadata,
            layers: Vec::new(),
            background: Background::default(),
        }
    }

    /// Open a single image for editing, inset on a white canvas
    pub fn with_placed_logo(prompt_metadata: GenerationParams, id: LayerId, src: ImagePayload) -> Self {
        let mut scene = Self::new(prompt_metadata);
        scene.layers.push(Layer::placed_logo(id, src));
        scene
    }

    /// A flattened AI result covering the whole canvas
    pub fn with_full_canvas(prompt_metadata: GenerationParams, id: LayerId, src: ImagePayload) -> Self {
        let mut scene = Self::new(prompt_metadata);
        scene.layers.push(Layer::full_canvas(id, src));
        scene
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn prompt_metadata(&self) -> &GenerationParams {
        &self.prompt_metadata
    }

    pub fn set_prompt_metadata(&mut self, metadata: GenerationParams) {
        self.prompt_metadata = metadata;
    }

    /// Layers in insertion order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Replace the background, returning the previous one
    pub fn replace_background(&mut self, background: Background) -> Background {
        std::mem::replace(&mut self.background, background)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn max_z(&self) -> Option<i32> {
        self.layers.iter().map(|layer| layer.z_index).max()
    }

    pub fn min_z(&self) -> Option<i32> {
        self.layers.iter().map(|layer| layer.z_index).min()
    }

    /// Layers sorted by ascending z-index, ties in insertion order
    ///
    /// Both the canvas and the prompt compiler use this ordering.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|layer| layer.z_index);
        ordered
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a layer above every existing one
    ///
    /// The layer's z-index is overwritten with `max + 1` (or 1 on an empty
    /// scene). Returns the assigned z-index. Fails without touching the
    /// scene when the top layer already sits at `i32::MAX`.
    pub fn add_layer(&mut self, mut layer: Layer) -> Result<i32> {
        layer.z_index = self
            .max_z()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| SceneError::ZIndexOutOfRange(layer.id.clone()))?;
        let z_index = layer.z_index;
        self.insert_checked(layer)?;
        tracing::debug!("Added layer (z={}), {} layers total", z_index, self.layers.len());
        Ok(z_index)
    }

    /// Merge a partial update into an existing layer
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<()> {
        self.layer_mut(id)?.apply(patch);
        Ok(())
    }

    /// Remove a layer, returning it
    pub fn delete_layer(&mut self, id: &LayerId) -> Result<Layer> {
        let index = self.index_of(id)?;
        Ok(self.layers.remove(index))
    }

    /// Move a layer to the front or back without renumbering the others
    ///
    /// Gaps in the z-index sequence accumulate; only relative order matters.
    pub fn reorder(&mut self, id: &LayerId, order: ZOrder) -> Result<i32> {
        self.index_of(id)?;
        let z_index = match order {
            ZOrder::Front => self.max_z().unwrap_or(0).checked_add(1),
            ZOrder::Back => self.min_z().unwrap_or(0).checked_sub(1),
        }
        .ok_or_else(|| SceneError::ZIndexOutOfRange(id.clone()))?;
        self.layer_mut(id)?.z_index = z_index;
        Ok(z_index)
    }

    /// Remove a layer and append others in its place, keeping their z-indexes
    ///
    /// Used when a flattened image is decomposed back into primitives. The
    /// scene is left untouched if any replacement id is already taken.
    pub fn replace_layer(&mut self, id: &LayerId, replacements: Vec<Layer>) -> Result<()> {
        let index = self.index_of(id)?;

        let mut seen: FxHashSet<&LayerId> = self
            .layers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, layer)| &layer.id)
            .collect();
        for layer in &replacements {
            if !seen.insert(&layer.id) {
                return Err(SceneError::DuplicateLayerId(layer.id.clone()));
            }
        }

        self.layers.remove(index);
        self.layers.extend(replacements);
        Ok(())
    }

    /// Insert a layer keeping its z-index
    pub fn insert_layer(&mut self, layer: Layer) -> Result<()> {
        self.insert_checked(layer)
    }

    fn insert_checked(&mut self, layer: Layer) -> Result<()> {
        if self.contains(&layer.id) {
            return Err(SceneError::DuplicateLayerId(layer.id));
        }
        self.layers.push(layer);
        Ok(())
    }

    fn index_of(&self, id: &LayerId) -> Result<usize> {
        self.layers
            .iter()
            .position(|layer| &layer.id == id)
            .ok_or_else(|| SceneError::LayerNotFound(id.clone()))
    }

    fn layer_mut(&mut self, id: &LayerId) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| &layer.id == id)
            .ok_or_else(|| SceneError::LayerNotFound(id.clone()))
    }
}

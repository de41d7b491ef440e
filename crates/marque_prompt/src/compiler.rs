//! Scene to composition instruction
//!
//! The compiled instruction walks the canvas setup first, then every layer
//! from lowest to highest z-index. Image slots are numbered from 1 in the
//! order they are referenced, and [`CompiledScene::images`] holds the
//! payloads in exactly that order: `Image #k` is `images[k - 1]`.

use std::fmt::Write as _;

use marque_core::{Background, Layer, LayerKind, Scene};
use marque_image::ImagePayload;

const INTRO: &str = "You are a precise graphic design assistant. Your task is to composite several elements onto a canvas. Follow these instructions exactly in order.";

const FINAL_OUTPUT: &str = "\n\n**Final Output**: Your final output must be a single, high-quality PNG image showing the result of the composition.";

/// Which canvas the composition starts from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasMode {
    /// Use the scene's own background
    #[default]
    SceneBackground,
    /// Ignore the scene background and start from a transparent canvas
    Transparent,
}

/// A scene serialized for the image model
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledScene {
    /// Canvas and layer steps, without the closing directive
    pub instruction: String,
    /// Payloads in the order the instruction references them
    pub images: Vec<ImagePayload>,
}

impl CompiledScene {
    /// Full prompt asking for a single flattened PNG
    pub fn prompt(&self) -> String {
        format!("{}{}", self.instruction, FINAL_OUTPUT)
    }
}

/// Compile a scene using its own background
pub fn compile(scene: &Scene) -> CompiledScene {
    compile_with(scene, CanvasMode::SceneBackground)
}

/// Compile a scene, optionally overriding the background with transparency
pub fn compile_with(scene: &Scene, mode: CanvasMode) -> CompiledScene {
    let background = match mode {
        CanvasMode::SceneBackground => scene.background(),
        CanvasMode::Transparent => &Background::Transparent,
    };
    compile_layers(&scene.paint_order(), background)
}

fn compile_layers(ordered: &[&Layer], background: &Background) -> CompiledScene {
    let mut instruction = String::from(INTRO);
    let mut images = Vec::new();

    match background {
        Background::Color(color) => {
            let _ = write!(
                instruction,
                "\n1. **Canvas**: Start with a solid background of this color: {}.",
                color
            );
        }
        Background::Transparent => {
            instruction.push_str("\n1. **Canvas**: Start with a transparent background.");
        }
        Background::Image(payload) => {
            instruction.push_str("\n1. **Canvas**: Use the first provided image as the background.");
            images.push(payload.clone());
        }
    }

    if !ordered.is_empty() {
        let step = if images.is_empty() { 1 } else { 2 };
        let _ = write!(
            instruction,
            "\n{}. **Overlay Layers**: Add the following layers on top of the canvas, in order from lowest to highest z-index.",
            step
        );

        for layer in ordered {
            let frame = &layer.frame;
            match &layer.kind {
                LayerKind::Image { src } => {
                    images.push(src.clone());
                    let _ = write!(
                        instruction,
                        "\n- Type: Image, Image Source: Image #{}, Position: {}% from Top, {}% from Left, Size: {}% Width, {}% Height. Object-fit should be 'contain'.",
                        images.len(),
                        percent(frame.y),
                        percent(frame.x),
                        percent(frame.width),
                        percent(frame.height)
                    );
                }
                LayerKind::Text(style) => {
                    let _ = write!(
                        instruction,
                        "\n- Type: Text, Content: \"{}\", Position: {}% from Top, {}% from Left, Bounding Box Size: {}% Width, {}% Height, Font: {}, {}px, {}, {}, Align: {}, Color: {}.",
                        style.text,
                        percent(frame.y),
                        percent(frame.x),
                        percent(frame.width),
                        percent(frame.height),
                        style.font_family,
                        font_px(style.font_size),
                        style.font_weight,
                        style.font_style,
                        style.text_align,
                        style.color
                    );
                }
                LayerKind::Shape { shape, color } => {
                    let _ = write!(
                        instruction,
                        "\n- Type: Shape, Shape: {}, Position: {}% from Top, {}% from Left, Size: {}% Width, {}% Height, Color: {}.",
                        shape,
                        percent(frame.y),
                        percent(frame.x),
                        percent(frame.width),
                        percent(frame.height),
                        color
                    );
                }
            }
        }
    }

    tracing::debug!(
        "Compiled {} layers into {} chars with {} image(s)",
        ordered.len(),
        instruction.len(),
        images.len()
    );

    CompiledScene { instruction, images }
}

/// One decimal, ties away from zero
fn percent(value: f32) -> String {
    let rounded = (f64::from(value) * 10.0).round() / 10.0;
    format!("{:.1}", rounded)
}

/// Font sizes drop trailing zeros and float noise left by resizing
fn font_px(size: f32) -> f64 {
    (f64::from(size) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use marque_core::{FontWeight, GenerationParams, HexColor, LayerId, ShapeKind};

    fn payload(tag: u8) -> ImagePayload {
        ImagePayload::new(vec![tag; 4], "image/png").unwrap()
    }

    #[test]
    fn test_single_text_layer_on_white() {
        let mut scene = Scene::new(GenerationParams::new("Aura"));
        scene
            .add_layer(Layer::text(LayerId::new("text-1"), "Aura", 48.0, FontWeight::Bold))
            .unwrap();

        let compiled = compile(&scene);
        assert!(compiled.images.is_empty());
        assert_eq!(
            compiled.instruction,
            "You are a precise graphic design assistant. Your task is to composite several elements onto a canvas. Follow these instructions exactly in order.\
             \n1. **Canvas**: Start with a solid background of this color: #FFFFFF.\
             \n1. **Overlay Layers**: Add the following layers on top of the canvas, in order from lowest to highest z-index.\
             \n- Type: Text, Content: \"Aura\", Position: 45.0% from Top, 25.0% from Left, Bounding Box Size: 50.0% Width, 10.0% Height, Font: 'Inter', sans-serif, 48px, bold, normal, Align: center, Color: #000000."
        );
        assert!(compiled.prompt().ends_with("showing the result of the composition."));
    }

    #[test]
    fn test_resized_font_prints_clean_size() {
        let mut scene = Scene::default();
        let mut layer = Layer::text(LayerId::new("text-1"), "Aura", 48.0, FontWeight::Bold);
        layer.frame = marque_core::Frame::new(12.25, 0.05, 33.333_332, 10.0);
        if let LayerKind::Text(style) = &mut layer.kind {
            style.font_size = 48.0_f32 * 1.1;
        }
        scene.add_layer(layer).unwrap();

        let instruction = compile(&scene).instruction;
        assert!(instruction.contains(", 52.8px, "), "{}", instruction);
        assert!(instruction.contains("Position: 0.1% from Top, 12.3% from Left"));
        assert!(instruction.contains("Bounding Box Size: 33.3% Width"));
    }

    #[test]
    fn test_image_slots_follow_reference_order() {
        let mut scene = Scene::new(GenerationParams::new("Aura")).with_background(Background::Image(payload(0)));
        scene.add_layer(Layer::image(LayerId::new("image-a"), payload(1))).unwrap();
        scene.add_layer(Layer::image(LayerId::new("image-b"), payload(2))).unwrap();
        scene
            .reorder(&LayerId::new("image-b"), marque_core::ZOrder::Back)
            .unwrap();

        let compiled = compile(&scene);
        assert_eq!(compiled.images, vec![payload(0), payload(2), payload(1)]);
        assert!(compiled.instruction.contains("\n2. **Overlay Layers**"));
        let first = compiled.instruction.find("Image #2").unwrap();
        let second = compiled.instruction.find("Image #3").unwrap();
        assert!(first < second);
        assert!(!compiled.instruction.contains("Image #4"));
    }

    #[test]
    fn test_transparent_override_drops_background_image() {
        let mut scene = Scene::new(GenerationParams::new("Aura")).with_background(Background::Image(payload(0)));
        scene
            .add_layer(Layer::shape(LayerId::new("shape-1"), ShapeKind::Circle))
            .unwrap();

        let compiled = compile_with(&scene, CanvasMode::Transparent);
        assert!(compiled.images.is_empty());
        assert!(compiled.instruction.contains("Start with a transparent background."));
        assert!(compiled.instruction.contains(
            "\n1. **Overlay Layers**"
        ));
        assert!(compiled.instruction.ends_with(
            "- Type: Shape, Shape: circle, Position: 40.0% from Top, 35.0% from Left, Size: 30.0% Width, 20.0% Height, Color: #6336E4."
        ));
    }

    #[test]
    fn test_empty_scene_has_no_layer_step() {
        let scene = Scene::default().with_background(Background::Color(HexColor::BLACK));
        let compiled = compile(&scene);
        assert!(!compiled.instruction.contains("Overlay Layers"));
        assert!(compiled.instruction.ends_with("#000000."));
    }

    #[test]
    fn test_ties_compile_in_insertion_order() {
        let scene: Scene = {
            let mut scene = Scene::default();
            scene.add_layer(Layer::text(LayerId::new("t1"), "first", 16.0, FontWeight::Normal)).unwrap();
            scene.add_layer(Layer::text(LayerId::new("t2"), "second", 16.0, FontWeight::Normal)).unwrap();
            scene
                .update_layer(&LayerId::new("t2"), &marque_core::LayerPatch::new().z_index(1))
                .unwrap();
            scene
        };
        let compiled = compile(&scene);
        let first = compiled.instruction.find("\"first\"").unwrap();
        let second = compiled.instruction.find("\"second\"").unwrap();
        assert!(first < second);
    }
}

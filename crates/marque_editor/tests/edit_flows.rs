//! End-to-end editor flows against a scripted backend

use marque_ai::testing::{sample_image, ScriptedBackend};
use marque_ai::{AiBridge, BackendReply, BridgeError, OutputKind};
use marque_core::{Background, FontWeight, Frame, GenerationParams, HexColor, LayerId, LayerKind};
use marque_editor::{
    Editor, EditorError, EditorSession, ExportKind, ExportPayload, MockupKind, PlanTier, UserAccount,
};

// ═══════════════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════════════

fn editor() -> (Editor<ScriptedBackend>, ScriptedBackend) {
    let backend = ScriptedBackend::new();
    let session = EditorSession::open_image(GenerationParams::new("Aura Coffee"), sample_image(1));
    (Editor::new(AiBridge::new(backend.clone()), session), backend)
}

fn logo() -> LayerId {
    LayerId::new("image-1")
}

fn free_user() -> UserAccount {
    UserAccount::free("Ada", "ada@example.com")
}

// ═══════════════════════════════════════════════════════════════════════════
// Image layer flows
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn remove_background_then_crop_commits_once() {
    let (editor, backend) = editor();
    backend.push_image(sample_image(2)).push_image(sample_image(3));

    editor.remove_layer_background(&logo()).await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests[0].images, vec![sample_image(1)]);
    assert_eq!(requests[1].images, vec![sample_image(2)]);

    let session = editor.session();
    let layer = session.scene().layer(&logo()).unwrap();
    assert_eq!(layer.image_src(), Some(&sample_image(3)));
    assert_eq!(session.history().len(), 2);
    assert_eq!(
        session.scene().prompt_metadata().prompt.as_deref(),
        Some("Removed background from an image")
    );
    assert!(!editor.is_processing());
}

#[tokio::test]
async fn failed_crop_discards_removal() {
    let (editor, backend) = editor();
    backend
        .push_image(sample_image(2))
        .push_error(BridgeError::transient("503"));

    let err = editor.remove_layer_background(&logo()).await.unwrap_err();
    assert!(matches!(err, EditorError::Bridge(BridgeError::TransientServiceError(_))));

    let session = editor.session();
    assert_eq!(session.scene().layer(&logo()).unwrap().image_src(), Some(&sample_image(1)));
    assert_eq!(session.history().len(), 1);
    assert!(!editor.is_processing());
}

#[tokio::test]
async fn crop_replaces_source() {
    let (editor, backend) = editor();
    backend.push_image(sample_image(4));
    editor.crop_layer(&logo()).await.unwrap();
    assert_eq!(
        editor.session().scene().prompt_metadata().prompt.as_deref(),
        Some("Cropped logo to content")
    );
}

#[tokio::test]
async fn vectorize_replaces_image_with_primitives() {
    let (editor, backend) = editor();
    editor.session().select(&logo()).unwrap();
    backend.push_text(
        r##"[{"type":"shape","shape":"circle","color":"#FF0000","x":30,"y":10,"width":40,"height":40},
            {"type":"text","text":"Aura","y":60,"fontSize":32},
            {"type":"gradient"}]"##,
    );

    editor.vectorize_layer(&logo()).await.unwrap();

    let session = editor.session();
    let scene = session.scene();
    assert!(!scene.contains(&logo()));
    let ids: Vec<_> = scene.layers().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["shape-2", "text-3"]);
    assert_eq!(scene.layers()[1].z_index, 2);
    assert_eq!(session.selection(), None);
    assert_eq!(session.history().len(), 2);
    assert_eq!(backend.requests()[0].output, OutputKind::LayerJson);
}

#[tokio::test]
async fn image_flows_reject_other_layers() {
    let (editor, backend) = editor();
    let text = editor.session().add_text("Aura", 48.0, FontWeight::Bold).unwrap();

    let err = editor.crop_layer(&text).await.unwrap_err();
    assert_eq!(err, EditorError::NotAnImageLayer(text));

    let missing = LayerId::new("image-99");
    let err = editor.vectorize_layer(&missing).await.unwrap_err();
    assert_eq!(err, EditorError::LayerNotFound(missing));
    assert_eq!(backend.request_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Whole-scene flows
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn refine_flattens_to_full_canvas() {
    let (editor, backend) = editor();
    editor
        .session()
        .set_background(Background::Color(HexColor::parse("#101010").unwrap()));
    backend.push_image(sample_image(5)).push_image(sample_image(6));

    editor.refine("  make it bolder ").await.unwrap();

    let session = editor.session();
    let scene = session.scene();
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.layers()[0].frame, Frame::FULL);
    assert_eq!(scene.layers()[0].z_index, 0);
    assert_eq!(scene.layers()[0].image_src(), Some(&sample_image(6)));
    assert_eq!(scene.background(), &Background::Color(HexColor::WHITE));
    assert_eq!(scene.prompt_metadata().prompt.as_deref(), Some("make it bolder"));
    assert!(backend.requests()[1].prompt.contains("make it bolder"));
}

#[tokio::test]
async fn blank_prompt_rejected_before_gate() {
    let (editor, backend) = editor();
    let err = editor.refine("   ").await.unwrap_err();
    assert!(matches!(err, EditorError::EmptyPrompt(_)));
    let err = editor.generate_ai_background("").await.unwrap_err();
    assert!(matches!(err, EditorError::EmptyPrompt(_)));
    assert_eq!(backend.request_count(), 0);
    assert!(!editor.is_processing());
}

#[tokio::test]
async fn ai_background_composites_transparent_first() {
    let (editor, backend) = editor();
    backend.push_image(sample_image(7)).push_image(sample_image(8));

    editor.generate_ai_background("a sunny beach").await.unwrap();

    let requests = backend.requests();
    assert!(requests[0].prompt.contains("Start with a transparent background."));
    assert_eq!(requests[1].images, vec![sample_image(7)]);
    assert!(requests[1].prompt.contains("\"a sunny beach\""));
    assert_eq!(
        editor.session().scene().prompt_metadata().prompt.as_deref(),
        Some("Logo with AI background: a sunny beach")
    );
}

#[tokio::test]
async fn upscale_then_undo_restores_layers() {
    let (editor, backend) = editor();
    editor.session().add_text("Aura", 48.0, FontWeight::Bold).unwrap();
    editor.session().commit("Added name");
    backend.push_image(sample_image(2)).push_image(sample_image(3));

    editor.upscale().await.unwrap();
    assert_eq!(editor.session().scene().len(), 1);

    let mut session = editor.session();
    assert!(session.undo());
    assert_eq!(session.scene().len(), 2);
    assert!(session.redo());
    assert_eq!(session.scene().prompt_metadata().prompt.as_deref(), Some("Upscaled to HD"));
}

#[tokio::test]
async fn blocked_result_leaves_history_alone() {
    let (editor, backend) = editor();
    backend
        .push_image(sample_image(2))
        .push(Ok(BackendReply::blocked("SAFETY")));

    let err = editor.refine("add flames").await.unwrap_err();
    assert!(err.user_message().contains("safety"));
    assert_eq!(editor.session().history().len(), 1);
}

#[tokio::test]
async fn busy_gate_rejects_second_flow() {
    let (editor, backend) = editor();
    let ticket = editor.gate().begin("Vectorizing logo...").unwrap();

    let err = editor.upscale().await.unwrap_err();
    assert_eq!(err, EditorError::Busy("Vectorizing logo...".into()));
    assert_eq!(backend.request_count(), 0);

    drop(ticket);
    backend.push_image(sample_image(2)).push_image(sample_image(3));
    assert!(editor.upscale().await.is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// Mockups and export
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn mockup_is_preview_only() {
    let (editor, backend) = editor();
    backend.push_image(sample_image(2)).push_image(sample_image(3));

    let mockup = editor.mockup(MockupKind::TShirt).await.unwrap();
    assert_eq!(mockup, sample_image(3));
    assert!(backend.requests()[1].prompt.contains("a black t-shirt."));

    let mut session = editor.session();
    assert_eq!(session.mockup(), Some(&sample_image(3)));
    assert_eq!(session.history().len(), 1);

    session.commit("Moved things");
    assert_eq!(session.mockup(), None);
}

#[tokio::test]
async fn svg_export_needs_paid_plan() {
    let (editor, backend) = editor();
    let err = editor.export(ExportKind::Svg, &free_user()).await.unwrap_err();
    assert_eq!(err, EditorError::PlanRestricted("SVG export"));
    assert_eq!(backend.request_count(), 0);

    backend
        .push_image(sample_image(2))
        .push_text("Here you go:\n<svg viewBox=\"0 0 1 1\"></svg>\nEnjoy");
    let pro = free_user().with_plan(PlanTier::Pro);
    let file = editor.export(ExportKind::Svg, &pro).await.unwrap();
    assert_eq!(file.file_name, "aura_coffee_logo.svg");
    assert_eq!(file.payload, ExportPayload::Svg("<svg viewBox=\"0 0 1 1\"></svg>".into()));
}

#[tokio::test]
async fn png_exports_do_not_commit() {
    let (editor, backend) = editor();
    backend.push_image(sample_image(2)).push_image(sample_image(3));

    let png = editor.export(ExportKind::Png, &free_user()).await.unwrap();
    assert_eq!(png.file_name, "aura_coffee_logo.png");
    assert_eq!(png.payload, ExportPayload::Image(sample_image(2)));

    let transparent = editor
        .export(ExportKind::TransparentPng, &free_user())
        .await
        .unwrap();
    assert_eq!(transparent.payload, ExportPayload::Image(sample_image(3)));
    assert!(backend.requests()[1].prompt.contains("transparent background"));
    assert_eq!(editor.session().history().len(), 1);
}

#[tokio::test]
async fn text_layer_survives_vectorize_commit() {
    let (editor, backend) = editor();
    let text = editor.session().add_text("Aura", 48.0, FontWeight::Bold).unwrap();
    backend.push_text(r#"[{"type":"text","text":"A"}]"#);

    editor.vectorize_layer(&logo()).await.unwrap();

    let session = editor.session();
    let kept = session.scene().layer(&text).unwrap();
    assert!(matches!(&kept.kind, LayerKind::Text(style) if style.text == "Aura"));
    assert_eq!(session.scene().len(), 2);
}

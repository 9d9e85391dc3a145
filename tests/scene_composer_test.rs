use instant::Duration;
use model_stage::{
    composer::{ComposerSettings, SceneComposer, SubjectKind},
    data_structures::{colour, scene_graph::LightKind},
    diagnostics::LogDiagnostics,
    resources::{AssetFormat, Bundle, ModelRequest},
    ComposedScene,
};

use crate::common::test_utils::{fixture_bundle, fixtures, init_logging, RecordingDiagnostics};

mod common;

fn compose(request: Option<&ModelRequest>) -> (ComposedScene, Vec<String>) {
    init_logging();
    let bundle = fixture_bundle();
    let diagnostics = RecordingDiagnostics::new();
    let scene = SceneComposer::new(&bundle, &diagnostics).compose(request);
    (scene, diagnostics.lines())
}

fn assert_fallback_cube(scene: &ComposedScene) {
    assert_eq!(scene.subject_kind(), SubjectKind::Fallback);
    let geometry = scene.subject().geometry().expect("the cube has geometry");
    let diffuse: Vec<_> = geometry.materials.iter().map(|material| material.diffuse).collect();
    assert_eq!(
        diffuse,
        vec![
            colour::DARK_GRAY,
            colour::LIGHT_GRAY,
            colour::INDIGO,
            colour::TEAL,
            colour::DARK_GRAY,
            colour::BLUE,
        ]
    );
    for material in &geometry.materials {
        assert_eq!(material.specular, colour::WHITE);
        assert_eq!(material.shininess, 0.7);
    }
}

fn assert_camera_and_two_lights(scene: &ComposedScene) {
    assert_eq!(scene.camera_count(), 1);
    assert_eq!(scene.light_count(), 2);
    let kinds: Vec<_> = scene.lights().iter().map(|(light, _)| light.kind).collect();
    assert_eq!(kinds, vec![LightKind::Ambient, LightKind::Directional]);
    assert!(colour::is_transparent(scene.background()));
}

#[test]
fn imported_model_is_normalised() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let (scene, _) = compose(Some(&request));

    assert_eq!(scene.subject_kind(), SubjectKind::Model);
    let subject = scene.subject();
    assert_eq!(subject.display_name(), "Character");
    assert_eq!(subject.transform.position, cgmath::Vector3::new(0.0, -11.0, -30.0));
    assert_eq!(subject.transform.scale, cgmath::Vector3::new(0.15, 0.15, 0.15));
    assert_eq!(subject.transform.rotation, cgmath::Quaternion::new(1.0, 0.0, 0.0, 0.0));
    assert_camera_and_two_lights(&scene);
}

#[test]
fn models_in_subdirectories_are_found() {
    let request = ModelRequest::new("mario_ac", AssetFormat::Gltf);
    let (scene, diagnostics) = compose(Some(&request));
    assert_eq!(scene.subject_kind(), SubjectKind::Model);
    assert_eq!(scene.subject().display_name(), "Mario");
    let found = format!("found {}", fixtures().join("models").join("mario_ac.gltf").display());
    assert!(diagnostics.contains(&found));
}

#[test]
fn missing_model_falls_back_to_cube() {
    let request = ModelRequest::new("Pixel_Anime_Character_Female", AssetFormat::Glb);
    let (scene, diagnostics) = compose(Some(&request));
    assert_fallback_cube(&scene);
    assert_camera_and_two_lights(&scene);
    assert_eq!(diagnostics.last().map(String::as_str), Some("fallback"));
    assert!(diagnostics
        .iter()
        .any(|line| line == "failed Pixel_Anime_Character_Female.glb is not in the bundle"));
}

#[test]
fn compose_never_fails() {
    let requests = [
        None,
        Some(ModelRequest::new("broken", AssetFormat::Glb)),
        Some(ModelRequest::new("empty", AssetFormat::Gltf)),
        Some(ModelRequest::new("", AssetFormat::Obj)),
        Some(ModelRequest::new("gone", AssetFormat::Gltf)),
    ];
    for request in &requests {
        let (scene, diagnostics) = compose(request.as_ref());
        assert_fallback_cube(&scene);
        assert_camera_and_two_lights(&scene);
        assert!(diagnostics.iter().any(|line| line == "fallback"));
    }
}

#[test]
fn no_request_skips_loading() {
    let (_, diagnostics) = compose(None);
    assert_eq!(diagnostics, vec!["fallback"]);
}

#[test]
fn successful_load_reports_each_step() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let (_, diagnostics) = compose(Some(&request));
    assert_eq!(
        diagnostics,
        vec![
            "searching triangle.gltf".to_string(),
            "available 4 gltf".to_string(),
            format!("found {}", fixtures().join("triangle.gltf").display()),
            "hierarchy 4".to_string(),
            "selected Character".to_string(),
        ]
    );
}

#[test]
fn camera_is_pulled_back_per_subject() {
    let settings = ComposerSettings::default();
    let request = ModelRequest::new("triangle", AssetFormat::Glb);
    for (request, expected) in [
        (Some(&request), settings.model_camera_position),
        (None, settings.fallback_camera_position),
    ] {
        let (scene, _) = compose(request);
        let (node, world) = scene.camera().expect("one camera");
        assert!(node.camera().is_some());
        assert_eq!(world.position, expected);
    }
}

#[test]
fn model_spins_around_vertical_axis_every_eight_seconds() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let (mut scene, _) = compose(Some(&request));

    scene.advance(Duration::from_secs(2));
    let rotation = scene.subject().transform.rotation;
    let quarter = std::f32::consts::FRAC_1_SQRT_2;
    assert!((rotation.s - quarter).abs() < 1e-5);
    assert!((rotation.v.y - quarter).abs() < 1e-5);
    assert_eq!(scene.subject().transform.position, cgmath::Vector3::new(0.0, -11.0, -30.0));

    scene.advance(Duration::from_secs(6));
    let rotation = scene.subject().transform.rotation;
    assert!((rotation.s.abs() - 1.0).abs() < 1e-5);
    assert_eq!(scene.elapsed(), Duration::from_secs(8));
}

#[test]
fn fallback_spins_diagonally_every_five_seconds() {
    let (mut scene, _) = compose(None);
    assert_eq!(scene.spin().axis(), cgmath::Vector3::new(1.0, 1.0, 0.0));
    assert_eq!(scene.spin().period(), Duration::from_secs(5));

    scene.advance(Duration::from_millis(2500));
    let rotation = scene.subject().transform.rotation;
    assert!(rotation.s.abs() < 1e-5);
    assert!((rotation.v.x - rotation.v.y).abs() < 1e-5);
    assert!(rotation.v.z.abs() < 1e-5);

    scene.advance(Duration::from_millis(2500));
    assert!((scene.subject().transform.rotation.s.abs() - 1.0).abs() < 1e-5);
}

#[test]
fn embedded_clips_play_below_the_subject() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let (mut scene, _) = compose(Some(&request));
    scene.advance(Duration::from_secs_f32(0.5));
    let body = scene.subject().find("Body").expect("Body is part of the subject");
    let half = (std::f32::consts::PI / 8.0).sin();
    assert!((body.transform.rotation.v.y - half).abs() < 1e-2);
}

#[test]
fn main_bundle_without_model_still_composes() {
    let diagnostics = LogDiagnostics;
    let bundle = Bundle::main();
    let request = ModelRequest::new("definitely_not_bundled", AssetFormat::Glb);
    let scene = SceneComposer::new(&bundle, &diagnostics).compose(Some(&request));
    assert_fallback_cube(&scene);
}

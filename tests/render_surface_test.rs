use instant::{Duration, Instant};
use model_stage::{
    camera::OrbitController,
    composer::SceneComposer,
    data_structures::{block::RotatingCube, colour, instance::Instance},
    render::LightType,
    resources::{AssetFormat, ModelRequest},
    surface::{RenderSurface, SurfaceSettings, ViewportSize},
};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
};

use crate::common::test_utils::{fixture_bundle, init_logging, RecordingDiagnostics};

mod common;

fn composed_surface(request: Option<&ModelRequest>, settings: SurfaceSettings) -> RenderSurface {
    init_logging();
    let bundle = fixture_bundle();
    let diagnostics = RecordingDiagnostics::new();
    let scene = SceneComposer::new(&bundle, &diagnostics).compose(request);
    RenderSurface::new(scene, settings)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn defaults_match_the_model_view() {
    let settings = SurfaceSettings::default();
    assert_eq!(settings.size, PhysicalSize::new(250, 250));
    assert_eq!(settings.preferred_frames_per_second, 60);
    assert!(settings.allows_camera_control);
    assert!(settings.autoenables_default_lighting);
    assert_eq!(ViewportSize::LARGE, PhysicalSize::new(360, 360));
    assert_eq!(ViewportSize::CUBE, PhysicalSize::new(180, 180));
}

#[test]
fn background_stays_transparent() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    assert!(colour::is_transparent(surface.clear_colour()));
    for _ in 0..3 {
        surface.update();
        assert_eq!(surface.clear_colour(), colour::TRANSPARENT);
        assert_eq!(surface.scene().background(), colour::TRANSPARENT);
    }
    let frame = surface.prepare_frame();
    assert!(matches!(frame.load_op(), wgpu::LoadOp::Clear(colour) if colour == wgpu::Color::TRANSPARENT));
}

#[test]
fn frames_are_paced_at_sixty_per_second() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    assert_eq!(surface.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));

    let start = Instant::now();
    assert!(surface.should_render(start));
    assert!(!surface.should_render(start + Duration::from_millis(5)));
    assert!(surface.should_render(start + Duration::from_millis(17)));
    assert!(!surface.should_render(start + Duration::from_millis(20)));
}

#[test]
fn ticks_advance_the_scene_by_elapsed_time() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    let start = Instant::now();
    surface.tick(start);
    assert_eq!(surface.scene().elapsed(), Duration::ZERO);
    surface.tick(start + Duration::from_millis(1250));
    surface.tick(start + Duration::from_millis(2500));
    assert_eq!(surface.scene().elapsed(), Duration::from_millis(2500));
    assert!(surface.scene().subject().transform.rotation.s.abs() < 1e-5);
}

#[test]
fn composed_scenes_bring_their_own_lights() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    assert!(!surface.needs_default_lighting());

    let frame = surface.prepare_frame();
    let kinds: Vec<_> = frame.lights.iter().map(|light| light.light_type()).collect();
    assert_eq!(kinds, vec![Some(LightType::Ambient), Some(LightType::Directional)]);
    assert_eq!(frame.lights[0].colour, [0.9, 0.9, 0.9]);
    assert_eq!(frame.lights[1].intensity, 1000.0);
    assert!(frame.lights[1].direction[1] < 0.0);
}

#[test]
fn light_less_scenes_get_a_headlight() {
    let mut surface = RenderSurface::new(
        RotatingCube::default().into_scene(),
        SurfaceSettings {
            size: ViewportSize::CUBE,
            ..Default::default()
        },
    );
    assert!(surface.needs_default_lighting());

    let frame = surface.prepare_frame();
    assert_eq!(frame.lights.len(), 1);
    assert_eq!(frame.lights[0].light_type(), Some(LightType::Omni));
    assert_eq!(frame.lights[0].position, [0.0, 0.0, 3.0]);
    assert_eq!(frame.camera.view_position, [0.0, 0.0, 3.0, 1.0]);
}

#[test]
fn default_lighting_can_be_disabled() {
    let mut surface = RenderSurface::new(
        RotatingCube::default().into_scene(),
        SurfaceSettings {
            autoenables_default_lighting: false,
            ..Default::default()
        },
    );
    assert!(!surface.needs_default_lighting());
    assert!(surface.prepare_frame().lights.is_empty());
}

#[test]
fn frame_draws_every_geometry_node_in_world_space() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let mut surface = composed_surface(Some(&request), SurfaceSettings::default());
    let frame = surface.prepare_frame();

    assert_eq!(frame.draws.len(), 1);
    let draw = &frame.draws[0];
    assert_eq!(draw.name, Some("Body"));
    assert_eq!(draw.meshes.len(), 1);
    assert_eq!(draw.materials.len(), 1);
    assert_eq!(frame.triangle_count(), 1);

    let [x, y, z, w] = draw.instance.model[3];
    assert!(close(x, 0.0) && close(y, -11.0) && close(z, -30.0) && close(w, 1.0));
    assert!(close(draw.instance.model[0][0], 0.15));
    assert_eq!(draw.instance.handedness, 1.0);
    assert_eq!(frame.camera.view_position, [0.0, 2.0, 0.0, 1.0]);
}

#[test]
fn fallback_cube_is_drawn_with_six_faces() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    let frame = surface.prepare_frame();
    assert_eq!(frame.draws.len(), 1);
    assert_eq!(frame.draws[0].meshes.len(), 6);
    assert_eq!(frame.draws[0].materials.len(), 6);
    assert_eq!(frame.draws[0].name, None);
}

#[test]
fn resize_ignores_zero_sizes() {
    let mut surface = composed_surface(None, SurfaceSettings::default());
    assert!(surface.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(360, 360))));
    assert_eq!(surface.size(), ViewportSize::LARGE);
    surface.resize(0, 100);
    assert_eq!(surface.size(), ViewportSize::LARGE);
}

#[test]
fn camera_control_can_be_disabled() {
    let mut surface = composed_surface(
        None,
        SurfaceSettings {
            allows_camera_control: false,
            ..Default::default()
        },
    );
    let scroll = WindowEvent::MouseWheel {
        // SAFETY: the id is never handed back to winit.
        device_id: unsafe { winit::event::DeviceId::dummy() },
        delta: MouseScrollDelta::LineDelta(0.0, 3.0),
        phase: TouchPhase::Moved,
    };
    assert!(!surface.handle_window_event(&scroll));
    assert!(surface.controller().is_at_rest());
}

#[test]
fn resetting_the_camera_drops_user_offsets() {
    let request = ModelRequest::new("triangle", AssetFormat::Gltf);
    let mut surface = composed_surface(Some(&request), SurfaceSettings::default());
    let at_rest_eye = surface.prepare_frame().camera.view_position;

    let scroll = WindowEvent::MouseWheel {
        // SAFETY: the id is never handed back to winit.
        device_id: unsafe { winit::event::DeviceId::dummy() },
        delta: MouseScrollDelta::LineDelta(0.0, 3.0),
        phase: TouchPhase::Moved,
    };
    assert!(surface.handle_window_event(&scroll));
    assert!(!surface.controller().is_at_rest());
    assert_ne!(surface.prepare_frame().camera.view_position, at_rest_eye);

    surface.reset_camera();
    assert!(surface.controller().is_at_rest());
    assert_eq!(surface.prepare_frame().camera.view_position, at_rest_eye);
}

#[test]
fn controller_at_rest_uses_the_camera_node() {
    let controller = OrbitController::default();
    let camera = Instance::from(cgmath::Vector3::new(0.0, 2.0, 0.0));
    let (_, eye) = controller.view(&camera, cgmath::Point3::new(0.0, -11.0, -30.0));
    assert_eq!(eye, cgmath::Point3::new(0.0, 2.0, 0.0));
}

#[test]
fn controller_pans_and_zooms_in_view_space() {
    let mut controller = OrbitController::default();
    let camera = Instance::from(cgmath::Vector3::new(0.0, 0.0, 3.0));
    let target = cgmath::Point3::new(0.0, 0.0, 0.0);

    assert!(controller.pointer_button(MouseButton::Right, ElementState::Pressed));
    assert!(!controller.pointer_moved(PhysicalPosition::new(100.0, 100.0)));
    assert!(controller.pointer_moved(PhysicalPosition::new(110.0, 100.0)));
    controller.pointer_button(MouseButton::Right, ElementState::Released);
    assert!(!controller.pointer_moved(PhysicalPosition::new(200.0, 100.0)));

    let (_, eye) = controller.view(&camera, target);
    assert!(close(eye.x, -0.1) && close(eye.y, 0.0) && close(eye.z, 3.0));

    controller.scrolled(MouseScrollDelta::LineDelta(0.0, 2.0));
    let (_, eye) = controller.view(&camera, target);
    assert!(close(eye.z, 2.0));

    controller.reset();
    assert!(controller.is_at_rest());
}

#[test]
fn controller_orbits_around_the_target() {
    let mut controller = OrbitController::default();
    let camera = Instance::from(cgmath::Vector3::new(0.0, 0.0, 3.0));
    let target = cgmath::Point3::new(0.0, 0.0, 0.0);

    controller.pointer_button(MouseButton::Left, ElementState::Pressed);
    controller.pointer_moved(PhysicalPosition::new(0.0, 0.0));
    controller.pointer_moved(PhysicalPosition::new(-100.0, 0.0));

    let (_, eye) = controller.view(&camera, target);
    let distance = (eye.x * eye.x + eye.y * eye.y + eye.z * eye.z).sqrt();
    assert!(close(distance, 3.0));
    assert!(eye.x > 0.0);
    assert!(close(eye.y, 0.0));
}

#[test]
fn gpu_layouts_match_the_uniform_structs() {
    use model_stage::{
        camera::CameraUniform,
        data_structures::{
            instance::InstanceRaw,
            model::{ModelVertex, Vertex},
        },
        render::LightUniform,
    };

    assert_eq!(ModelVertex::desc().array_stride, 32);
    assert_eq!(ModelVertex::desc().step_mode, wgpu::VertexStepMode::Vertex);
    assert_eq!(InstanceRaw::desc().array_stride, 104);
    assert_eq!(InstanceRaw::desc().step_mode, wgpu::VertexStepMode::Instance);
    assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);
}

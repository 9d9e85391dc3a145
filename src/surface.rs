//! Hosting a composed scene in a view.
//!
//! [`RenderSurface`] owns a [`ComposedScene`] for as long as it is shown. The
//! host forwards window events and asks it for a [`Frame`] whenever it is time
//! to draw; the surface keeps the background transparent, paces frames, drives
//! the scene's animations and lets the user move the camera.

use cgmath::EuclideanSpace;
use instant::{Duration, Instant};
use winit::{dpi::PhysicalSize, event::WindowEvent};

use crate::{
    camera::{CameraUniform, OrbitController, Projection},
    composer::ComposedScene,
    data_structures::{
        colour,
        instance::Instance,
        scene_graph::{Camera, Light, LightKind},
    },
    render::{collect_draws, Frame, LightUniform},
};

/// Frame sizes the views are laid out with.
pub struct ViewportSize;

impl ViewportSize {
    /// The default model view.
    pub const MODEL: PhysicalSize<u32> = PhysicalSize::new(250, 250);
    pub const LARGE: PhysicalSize<u32> = PhysicalSize::new(360, 360);
    /// The standalone rotating cube.
    pub const CUBE: PhysicalSize<u32> = PhysicalSize::new(180, 180);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub size: PhysicalSize<u32>,
    pub allows_camera_control: bool,
    pub autoenables_default_lighting: bool,
    pub preferred_frames_per_second: u32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            size: ViewportSize::MODEL,
            allows_camera_control: true,
            autoenables_default_lighting: true,
            preferred_frames_per_second: 60,
        }
    }
}

pub struct RenderSurface {
    scene: ComposedScene,
    settings: SurfaceSettings,
    clear_colour: wgpu::Color,
    controller: OrbitController,
    last_tick: Option<Instant>,
    last_frame: Option<Instant>,
}

impl RenderSurface {
    /// Viewpoint used when the scene brings no camera of its own.
    const FALLBACK_EYE: cgmath::Vector3<f32> = cgmath::Vector3::new(0.0, 0.0, 3.0);

    pub fn new(scene: ComposedScene, settings: SurfaceSettings) -> Self {
        let mut surface = Self {
            scene,
            settings,
            clear_colour: colour::TRANSPARENT,
            controller: OrbitController::default(),
            last_tick: None,
            last_frame: None,
        };
        surface.update();
        surface
    }

    pub fn scene(&self) -> &ComposedScene {
        &self.scene
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        self.clear_colour
    }

    /// Keeps the surface and the scene background transparent so the host view shows through.
    pub fn update(&mut self) {
        self.clear_colour = colour::TRANSPARENT;
        self.scene.clear_background();
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.settings.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.settings.size = PhysicalSize::new(width, height);
        }
    }

    /// Returns whether the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
            return true;
        }
        if !self.settings.allows_camera_control {
            return false;
        }
        self.controller.handle_window_event(event)
    }

    /// Drops the user's orbit, pan and zoom so the scene's own camera is used again.
    pub fn reset_camera(&mut self) {
        self.controller.reset();
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.settings.preferred_frames_per_second.max(1) as f64)
    }

    /// Whether a frame is due at `now`; the first call always is.
    pub fn should_render(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_frame {
            if now.duration_since(last) < self.frame_interval() {
                return false;
            }
        }
        self.last_frame = Some(now);
        true
    }

    /// Advances the scene by the time since the previous tick.
    pub fn tick(&mut self, now: Instant) {
        let dt = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.scene.advance(dt);
    }

    pub fn needs_default_lighting(&self) -> bool {
        self.settings.autoenables_default_lighting && self.scene.light_count() == 0
    }

    /// Collects everything needed to draw the scene as it is right now.
    pub fn prepare_frame(&mut self) -> Frame<'_> {
        self.update();

        let (lens, camera_world) = match self.scene.camera() {
            Some((node, world)) => (node.camera().copied().unwrap_or_default(), world),
            None => (Camera::default(), Instance::from(Self::FALLBACK_EYE)),
        };
        let target = cgmath::Point3::from_vec(self.scene.subject().transform.position);
        let (view, eye) = self.controller.view(&camera_world, target);
        let projection = Projection::new(self.settings.size.width, self.settings.size.height, &lens);
        let mut camera = CameraUniform::new();
        camera.update_view_proj(eye, view, &projection);

        let mut lights: Vec<LightUniform> = self
            .scene
            .lights()
            .into_iter()
            .map(|(light, world)| LightUniform::new(light, &world))
            .collect();
        if self.needs_default_lighting() {
            let headlight = Light::new(LightKind::Omni);
            lights.push(LightUniform::new(&headlight, &Instance::from(eye.to_vec())));
        }

        Frame {
            clear_colour: self.clear_colour,
            camera,
            lights,
            draws: collect_draws(self.scene.root()),
        }
    }

    pub fn into_scene(self) -> ComposedScene {
        self.scene
    }
}

//! Viewpoint maths and pointer-driven camera control.
//!
//! - [`Projection`] turns a camera node's lens settings and the surface size
//!   into a projection matrix
//! - [`CameraUniform`] is the view-projection data as the GPU expects it
//! - [`OrbitController`] lets the user orbit, pan and zoom around the scene's
//!   subject without touching the camera node itself

use cgmath::{EuclideanSpace, Matrix4, Rotation3, SquareMatrix};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::data_structures::{instance::Instance, scene_graph::Camera};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: cgmath::Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, camera: &Camera) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: camera.fovy.into(),
            znear: camera.znear,
            zfar: camera.zfar,
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, eye: cgmath::Point3<f32>, view: Matrix4<f32>, projection: &Projection) {
        self.view_position = eye.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    Orbit,
    Pan,
}

/**
 * Pointer-driven camera control.
 *
 * Dragging with the primary button orbits around the target, dragging with
 * the secondary or middle button pans in the view plane and scrolling moves
 * the viewpoint along its line of sight. All of it is an offset on top of the
 * camera node's own transform; at rest the node is used unchanged.
 */
#[derive(Clone, Debug)]
pub struct OrbitController {
    yaw: cgmath::Rad<f32>,
    pitch: cgmath::Rad<f32>,
    pan: cgmath::Vector2<f32>,
    zoom: f32,
    cursor: Option<PhysicalPosition<f64>>,
    drag: Option<Drag>,
    sensitivity: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    pub fn new(sensitivity: f32, pan_speed: f32, zoom_speed: f32) -> Self {
        Self {
            yaw: cgmath::Rad(0.0),
            pitch: cgmath::Rad(0.0),
            pan: cgmath::Vector2::new(0.0, 0.0),
            zoom: 0.0,
            cursor: None,
            drag: None,
            sensitivity,
            pan_speed,
            zoom_speed,
        }
    }

    /// Returns whether the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => self.pointer_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => self.pointer_moved(*position),
            WindowEvent::MouseWheel { delta, .. } => self.scrolled(*delta),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = None;
                false
            }
            _ => false,
        }
    }

    pub fn pointer_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        let drag = match button {
            MouseButton::Left => Drag::Orbit,
            MouseButton::Right | MouseButton::Middle => Drag::Pan,
            _ => return false,
        };
        self.drag = match state {
            ElementState::Pressed => Some(drag),
            ElementState::Released => None,
        };
        true
    }

    pub fn pointer_moved(&mut self, position: PhysicalPosition<f64>) -> bool {
        let previous = self.cursor.replace(position);
        let (Some(previous), Some(drag)) = (previous, self.drag) else {
            return false;
        };
        let dx = (position.x - previous.x) as f32;
        let dy = (position.y - previous.y) as f32;
        match drag {
            Drag::Orbit => {
                self.yaw -= cgmath::Rad(dx * self.sensitivity);
                self.pitch = cgmath::Rad((self.pitch.0 - dy * self.sensitivity).clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
            }
            Drag::Pan => {
                self.pan += cgmath::Vector2::new(-dx, dy) * self.pan_speed;
            }
        }
        true
    }

    pub fn scrolled(&mut self, delta: MouseScrollDelta) -> bool {
        self.zoom += match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * self.zoom_speed,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 * self.zoom_speed / 100.0,
        };
        true
    }

    pub fn is_at_rest(&self) -> bool {
        self.yaw.0 == 0.0 && self.pitch.0 == 0.0 && self.pan.x == 0.0 && self.pan.y == 0.0 && self.zoom == 0.0
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.sensitivity, self.pan_speed, self.zoom_speed);
    }

    /// World matrix of the viewpoint after applying the user's offsets to `camera_world`.
    pub fn viewpoint(&self, camera_world: &Instance, target: cgmath::Point3<f32>) -> Matrix4<f32> {
        let to_target = target.to_vec();
        let orbit = Matrix4::from_translation(to_target)
            * Matrix4::from(cgmath::Quaternion::from_angle_y(self.yaw) * cgmath::Quaternion::from_angle_x(self.pitch))
            * Matrix4::from_translation(-to_target);
        let local = Matrix4::from_translation(cgmath::Vector3::new(self.pan.x, self.pan.y, -self.zoom));
        orbit * camera_world.to_matrix() * local
    }

    /// View matrix and eye position for the controlled viewpoint.
    pub fn view(&self, camera_world: &Instance, target: cgmath::Point3<f32>) -> (Matrix4<f32>, cgmath::Point3<f32>) {
        let viewpoint = self.viewpoint(camera_world, target);
        let eye = cgmath::Point3::from_vec(viewpoint.w.truncate());
        let view = viewpoint.invert().unwrap_or_else(Matrix4::identity);
        (view, eye)
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(0.005, 0.01, 0.5)
    }
}

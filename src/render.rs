//! Frame extraction.
//!
//! A [`Frame`] is everything a GPU backend needs to draw one image of a
//! composed scene: the clear colour, the camera uniform, the packed lights and
//! one [`Instanced`] draw per geometry node. Extraction walks the node tree
//! once and borrows meshes and materials instead of copying them.
//!
//! # Key types
//!
//! - [`Frame<'a>`] is one frame's worth of render data
//! - [`Instanced<'a>`] contains data for a single geometry node (meshes,
//!   materials and its world transform)
//! - [`LightUniform`] is a light in the layout the shaders expect

use cgmath::Rotation;

use crate::{
    camera::CameraUniform,
    data_structures::{
        colour,
        instance::{Instance, InstanceRaw},
        model::{Material, Mesh},
        scene_graph::{Light, LightKind, Node},
    },
};

/// Data for one geometry node: its meshes, materials and world transform.
pub struct Instanced<'a> {
    pub name: Option<&'a str>,
    pub meshes: &'a [Mesh],
    pub materials: &'a [Material],
    pub instance: InstanceRaw,
}

impl Instanced<'_> {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightType {
    Ambient = 0,
    Directional = 1,
    Omni = 2,
}

impl From<LightKind> for LightType {
    fn from(kind: LightKind) -> Self {
        match kind {
            LightKind::Ambient => LightType::Ambient,
            LightKind::Directional => LightType::Directional,
            LightKind::Omni => LightType::Omni,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub kind: u32,
    pub colour: [f32; 3],
    pub intensity: f32,
    pub direction: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
}

impl LightUniform {
    pub fn new(light: &Light, world: &Instance) -> Self {
        let direction = world.rotation.rotate_vector(-cgmath::Vector3::unit_z());
        Self {
            position: world.position.into(),
            kind: LightType::from(light.kind) as u32,
            colour: colour::to_rgb(light.colour),
            intensity: light.intensity,
            direction: direction.into(),
            _padding: 0,
        }
    }

    pub fn light_type(&self) -> Option<LightType> {
        match self.kind {
            0 => Some(LightType::Ambient),
            1 => Some(LightType::Directional),
            2 => Some(LightType::Omni),
            _ => None,
        }
    }
}

/// Render data for one frame of a composed scene.
pub struct Frame<'a> {
    pub clear_colour: wgpu::Color,
    pub camera: CameraUniform,
    pub lights: Vec<LightUniform>,
    pub draws: Vec<Instanced<'a>>,
}

impl Frame<'_> {
    /// Load operation for the colour attachment of the frame's render pass.
    pub fn load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        wgpu::LoadOp::Clear(self.clear_colour)
    }

    pub fn triangle_count(&self) -> usize {
        self.draws.iter().map(Instanced::triangle_count).sum()
    }
}

/// One draw per geometry node under `root`, in depth-first order.
pub fn collect_draws(root: &Node) -> Vec<Instanced<'_>> {
    let mut draws = Vec::new();
    root.world_transforms(&Instance::new(), &mut |node, world| {
        if let Some(geometry) = node.geometry() {
            draws.push(Instanced {
                name: node.name.as_deref(),
                meshes: &geometry.meshes,
                materials: &geometry.materials,
                instance: world.to_raw(),
            });
        }
    });
    draws
}

//! Geometry, meshes and materials.
//!
//! Geometry lives on the CPU side of the engine: meshes carry plain vertex and
//! index data, materials carry colours. A host renderer uploads both when a
//! frame references them.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::colour;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Surface appearance of one geometry element.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: wgpu::Color,
    pub specular: wgpu::Color,
    pub shininess: f32,
}

impl Material {
    pub fn new(name: &str, diffuse: wgpu::Color, specular: wgpu::Color, shininess: f32) -> Self {
        Self {
            name: name.to_string(),
            diffuse,
            specular,
            shininess,
        }
    }

    /// Glossy material used by procedurally built shapes: white highlights, shininess 0.7.
    pub fn glossy(name: &str, diffuse: wgpu::Color) -> Self {
        Self::new(name, diffuse, colour::WHITE, 0.7)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", colour::WHITE, colour::WHITE, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Index into the owning geometry's materials.
    pub material: usize,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub width: f32,
    pub height: f32,
    pub length: f32,
    pub chamfer_radius: f32,
}

impl BoxShape {
    pub fn half_extents(&self) -> [f32; 3] {
        [self.width / 2.0, self.height / 2.0, self.length / 2.0]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box(BoxShape),
    Imported,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Geometry {
    pub fn imported(meshes: Vec<Mesh>, materials: Vec<Material>) -> Self {
        Self {
            shape: Shape::Imported,
            meshes,
            materials,
        }
    }

    /// A box centred on the origin whose edges are bevelled by `shape.chamfer_radius`.
    ///
    /// The box is split into six meshes in the order front, right, back, left,
    /// top, bottom; mesh `i` uses material `i`. Each bevel is shared half and
    /// half between its two neighbouring faces.
    pub fn cuboid(shape: BoxShape, materials: Vec<Material>) -> Self {
        let meshes = tessellate_box(&shape);
        Self {
            shape: Shape::Box(shape),
            meshes,
            materials,
        }
    }

    pub fn box_shape(&self) -> Option<BoxShape> {
        match self.shape {
            Shape::Box(shape) => Some(shape),
            Shape::Imported => None,
        }
    }

    /// Material used by `mesh`, or the default material when the index is dangling.
    pub fn material_for(&self, mesh: &Mesh) -> Material {
        self.materials.get(mesh.material).cloned().unwrap_or_default()
    }
}

const FACE_NAMES: [&str; 6] = ["front", "right", "back", "left", "top", "bottom"];

/// Face slot for the face whose outward normal is `sign` along `axis`.
fn face_slot(axis: usize, sign: f32) -> usize {
    match (axis, sign > 0.0) {
        (2, true) => 0,
        (0, true) => 1,
        (2, false) => 2,
        (0, false) => 3,
        (1, true) => 4,
        _ => 5,
    }
}

fn point(axis_values: [(usize, f32); 3]) -> Vector3<f32> {
    let mut p = [0.0; 3];
    for (axis, value) in axis_values {
        p[axis] = value;
    }
    p.into()
}

fn tessellate_box(shape: &BoxShape) -> Vec<Mesh> {
    let half = shape.half_extents();
    let max_radius = half.iter().cloned().fold(f32::INFINITY, f32::min).max(0.0);
    let radius = shape.chamfer_radius.clamp(0.0, max_radius);
    let inner = half.map(|h| h - radius);

    let mut meshes: Vec<Mesh> = FACE_NAMES
        .iter()
        .enumerate()
        .map(|(material, name)| Mesh {
            name: name.to_string(),
            vertices: Vec::new(),
            indices: Vec::new(),
            material,
        })
        .collect();

    const QUAD: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    // Flat faces, inset by the chamfer radius.
    for k in 0..3 {
        let (i, j) = ((k + 1) % 3, (k + 2) % 3);
        for sign in [1.0, -1.0] {
            let corners = QUAD.map(|(a, b)| {
                point([(k, sign * half[k]), (i, a * inner[i]), (j, b * inner[j])])
            });
            let uvs = QUAD.map(|(a, b)| [(a + 1.0) / 2.0, (1.0 - b) / 2.0]);
            let mesh = &mut meshes[face_slot(k, sign)];
            push_triangle(mesh, [corners[0], corners[1], corners[2]], [uvs[0], uvs[1], uvs[2]]);
            push_triangle(mesh, [corners[0], corners[2], corners[3]], [uvs[0], uvs[2], uvs[3]]);
        }
    }

    if radius <= 0.0 {
        return meshes;
    }

    // Edge bevels running along axis `e`, split down the middle.
    for e in 0..3 {
        let (i, j) = ((e + 1) % 3, (e + 2) % 3);
        for si in [1.0, -1.0] {
            for sj in [1.0, -1.0] {
                let on_i = |t: f32| point([(i, si * half[i]), (j, sj * inner[j]), (e, t * inner[e])]);
                let on_j = |t: f32| point([(i, si * inner[i]), (j, sj * half[j]), (e, t * inner[e])]);
                let (i0, i1, j0, j1) = (on_i(-1.0), on_i(1.0), on_j(-1.0), on_j(1.0));
                let (m0, m1) = ((i0 + j0) / 2.0, (i1 + j1) / 2.0);
                let face_i = &mut meshes[face_slot(i, si)];
                push_triangle(face_i, [i0, i1, m1], [[0.0; 2]; 3]);
                push_triangle(face_i, [i0, m1, m0], [[0.0; 2]; 3]);
                let face_j = &mut meshes[face_slot(j, sj)];
                push_triangle(face_j, [j0, m1, j1], [[0.0; 2]; 3]);
                push_triangle(face_j, [j0, m0, m1], [[0.0; 2]; 3]);
            }
        }
    }

    // Corner triangles, split into one quad per touching face.
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                let signs = [sx, sy, sz];
                let corner_of = |k: usize| {
                    let mut p = [0.0; 3];
                    for axis in 0..3 {
                        p[axis] = signs[axis] * if axis == k { half[axis] } else { inner[axis] };
                    }
                    Vector3::from(p)
                };
                let corners = [corner_of(0), corner_of(1), corner_of(2)];
                let centre = (corners[0] + corners[1] + corners[2]) / 3.0;
                for k in 0..3 {
                    let (a, b) = (corners[(k + 1) % 3], corners[(k + 2) % 3]);
                    let (ma, mb) = ((corners[k] + a) / 2.0, (corners[k] + b) / 2.0);
                    let mesh = &mut meshes[face_slot(k, signs[k])];
                    push_triangle(mesh, [corners[k], ma, centre], [[0.0; 2]; 3]);
                    push_triangle(mesh, [corners[k], centre, mb], [[0.0; 2]; 3]);
                }
            }
        }
    }

    meshes
}

/// Appends a flat-shaded triangle, wound counter-clockwise as seen from outside.
///
/// The box is convex and centred on the origin, so a triangle whose normal
/// points towards the origin is flipped. Degenerate triangles are dropped.
fn push_triangle(mesh: &mut Mesh, positions: [Vector3<f32>; 3], uvs: [[f32; 2]; 3]) {
    let [a, mut b, mut c] = positions;
    let [uv_a, mut uv_b, mut uv_c] = uvs;
    let mut normal = (b - a).cross(c - a);
    if normal.magnitude2() < 1e-12 {
        return;
    }
    let centroid = (a + b + c) / 3.0;
    if normal.dot(centroid) < 0.0 {
        std::mem::swap(&mut b, &mut c);
        std::mem::swap(&mut uv_b, &mut uv_c);
        normal = -normal;
    }
    let normal = normal.normalize();
    let base = mesh.vertices.len() as u32;
    for (position, tex_coords) in [(a, uv_a), (b, uv_b), (c, uv_c)] {
        mesh.vertices.push(ModelVertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
        });
    }
    mesh.indices.extend([base, base + 1, base + 2]);
}

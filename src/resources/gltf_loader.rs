//! glTF importer for both the binary container (`.glb`) and the text scene
//! description (`.gltf`).

use std::collections::HashMap;

use gltf::animation::util::ReadOutputs;

use crate::{
    data_structures::{
        colour,
        instance::Instance,
        model::{Geometry, Material, Mesh, ModelVertex},
        scene_graph::{merge, AnimationClip, Channel, Node, NodeContent, Repeat},
    },
    resources::{
        animation::{Interpolation, Keyframes},
        read_asset, AssetLocation, ImportError, ImportOptions,
    },
};

pub fn load_scene_gltf(
    location: &AssetLocation,
    options: &ImportOptions,
) -> Result<Node, ImportError> {
    let data = read_asset(location)?;
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(&data).map_err(|e| ImportError::malformed(location, e))?;

    // Load buffers: the GLB blob, side-car files next to the asset and data URIs
    let buffer_data: Vec<Vec<u8>> =
        gltf::import_buffers(&document, location.path().parent(), blob)
            .map_err(|e| ImportError::malformed(location, e))?
            .into_iter()
            .map(|data| data.0)
            .collect();

    let animations = load_animations(&document, &buffer_data, options.animation_policy.repeat());

    let mut root = Node::new(None);
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                let mut ancestors = Vec::new();
                root.add_child(to_scene_node(node, &buffer_data, &animations, &mut ancestors));
            }
        }
        None => log::warn!("{} defines no scene", location.path.display()),
    }
    Ok(root)
}

/// Animation clips per target node index.
fn load_animations(
    document: &gltf::Document,
    buffer_data: &[Vec<u8>],
    repeat: Repeat,
) -> HashMap<usize, Vec<AnimationClip>> {
    let mut channels: HashMap<usize, Vec<(String, Channel)>> = HashMap::new();
    for animation in document.animations() {
        let name = animation.name().unwrap_or("Default").to_string();
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let timestamps: Vec<f32> = match reader.read_inputs() {
                Some(inputs) => inputs.collect(),
                None => {
                    log::warn!("no keyframe times in channel {} of {}", channel.index(), name);
                    Vec::new()
                }
            };
            if !timestamps.iter().all(|t| t.is_finite()) || timestamps.windows(2).any(|w| w[0] >= w[1]) {
                log::warn!(
                    "keyframe times in channel {} of {} are not increasing, skipping it",
                    channel.index(),
                    name
                );
                continue;
            }
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };
            let keyframes = match reader.read_outputs() {
                Some(ReadOutputs::Translations(translations)) => {
                    Keyframes::Translation(translations.map(cgmath::Vector3::from).collect())
                }
                Some(ReadOutputs::Rotations(rotations)) => Keyframes::Rotation(
                    rotations
                        .into_f32()
                        .map(|[x, y, z, w]| cgmath::Quaternion::new(w, x, y, z))
                        .collect(),
                ),
                Some(ReadOutputs::Scales(scales)) => Keyframes::Scale(scales.map(cgmath::Vector3::from).collect()),
                // Morph target weights are not animated; `merge` drops these channels
                Some(ReadOutputs::MorphTargetWeights(_)) | None => Keyframes::Other,
            };
            channels
                .entry(channel.target().node().index())
                .or_default()
                .push((
                    name.clone(),
                    Channel {
                        keyframes,
                        timestamps,
                        interpolation,
                    },
                ));
        }
    }
    channels
        .into_iter()
        .map(|(node, channels)| (node, merge(channels, repeat)))
        .collect()
}

fn to_scene_node(
    node: gltf::scene::Node,
    buffer_data: &[Vec<u8>],
    animations: &HashMap<usize, Vec<AnimationClip>>,
    ancestors: &mut Vec<usize>,
) -> Node {
    let mut scene_node = Node::new(node.name());
    if let Some(mesh) = node.mesh() {
        scene_node.content = NodeContent::Geometry(to_geometry(&mesh, buffer_data));
    }
    let (position, [x, y, z, w], scale) = node.transform().decomposed();
    scene_node.transform = Instance {
        position: position.into(),
        rotation: cgmath::Quaternion::new(w, x, y, z),
        scale: scale.into(),
    };
    scene_node.animations = animations.get(&node.index()).cloned().unwrap_or_default();

    ancestors.push(node.index());
    for child in node.children() {
        if ancestors.contains(&child.index()) {
            log::warn!("node {} is its own ancestor, skipping it", child.index());
            continue;
        }
        let child_node = to_scene_node(child, buffer_data, animations, ancestors);
        scene_node.add_child(child_node);
    }
    ancestors.pop();

    scene_node
}

fn to_geometry(mesh: &gltf::Mesh, buffer_data: &[Vec<u8>]) -> Geometry {
    let mesh_name = mesh.name().unwrap_or("unknown_mesh");
    let mut meshes = Vec::new();
    let mut materials = Vec::new();
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

        let mut vertices: Vec<ModelVertex> = match reader.read_positions() {
            Some(positions) => positions
                .map(|position| ModelVertex {
                    position,
                    ..Default::default()
                })
                .collect(),
            None => Vec::new(),
        };
        if let Some(normals) = reader.read_normals() {
            vertices
                .iter_mut()
                .zip(normals)
                .for_each(|(vertex, normal)| vertex.normal = normal);
        }
        if let Some(tex_coords) = reader.read_tex_coords(0) {
            vertices
                .iter_mut()
                .zip(tex_coords.into_f32())
                .for_each(|(vertex, tex_coords)| vertex.tex_coords = tex_coords);
        }
        let indices = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        // One material per primitive, the way the geometry elements reference them
        materials.push(to_material(&primitive.material()));
        meshes.push(Mesh {
            name: mesh_name.to_string(),
            vertices,
            indices,
            material: materials.len() - 1,
        });
    }
    Geometry::imported(meshes, materials)
}

fn to_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    Material::new(
        material.name().unwrap_or("default"),
        colour::from_rgba(pbr.base_color_factor()),
        colour::WHITE,
        1.0 - pbr.roughness_factor(),
    )
}

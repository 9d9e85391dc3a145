//! Wavefront OBJ importer. Every OBJ object becomes one child of the
//! returned root, carrying a single mesh and the material it references.

use crate::{
    data_structures::{
        colour,
        model::{Geometry, Material, Mesh, ModelVertex},
        scene_graph::Node,
    },
    resources::{AssetLocation, ImportError},
};

pub fn load_scene_obj(location: &AssetLocation) -> Result<Node, ImportError> {
    let (models, obj_materials) = tobj::load_obj(
        location.path(),
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| match e {
        tobj::LoadError::OpenFileFailed | tobj::LoadError::ReadError => ImportError::Unreadable {
            path: location.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        },
        e => ImportError::malformed(location, e),
    })?;

    // Meshes still render with defaults when the .mtl is missing or broken
    let materials = match obj_materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!(
                "materials of {} could not be loaded ({}), using defaults",
                location.path.display(),
                e
            );
            Vec::new()
        }
    };

    let mut root = Node::new(None);
    for model in models {
        let material = model
            .mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(to_material)
            .unwrap_or_default();
        let mesh = to_mesh(&model);
        let geometry = Geometry::imported(vec![mesh], vec![material]);
        root.add_child(Node::with_geometry(Some(&model.name), geometry));
    }
    Ok(root)
}

fn to_mesh(model: &tobj::Model) -> Mesh {
    let m = &model.mesh;
    let vertices = (0..m.positions.len() / 3)
        .map(|i| ModelVertex {
            position: [m.positions[i * 3], m.positions[i * 3 + 1], m.positions[i * 3 + 2]],
            tex_coords: if m.texcoords.len() >= (i + 1) * 2 {
                // OBJ puts the texture origin at the bottom left
                [m.texcoords[i * 2], 1.0 - m.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            },
            normal: if m.normals.len() >= (i + 1) * 3 {
                [m.normals[i * 3], m.normals[i * 3 + 1], m.normals[i * 3 + 2]]
            } else {
                [0.0, 0.0, 0.0]
            },
        })
        .collect::<Vec<_>>();

    Mesh {
        name: model.name.clone(),
        vertices,
        indices: m.indices.clone(),
        material: 0,
    }
}

fn to_material(material: &tobj::Material) -> Material {
    let rgb = |value: Option<[f32; 3]>, fallback: wgpu::Color| {
        value
            .map(|[r, g, b]| colour::from_rgba([r, g, b, 1.0]))
            .unwrap_or(fallback)
    };
    Material::new(
        &material.name,
        rgb(material.diffuse, colour::WHITE),
        rgb(material.specular, colour::WHITE),
        // MTL shininess is a Phong exponent in 0..=1000
        material.shininess.map_or(0.0, |ns| (ns / 1000.0).clamp(0.0, 1.0)),
    )
}

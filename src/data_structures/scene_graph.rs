//! Scene graph and hierarchical scene organization.
//!
//! A scene is an owned tree of [`Node`]s. Every node has a local transform,
//! an optional name, at most one piece of content (geometry, a camera or a
//! light), the animation clips that target it and an ordered list of
//! children. Because children are owned by value the tree is acyclic and has
//! exactly one root by construction.

use std::collections::HashMap;

use crate::{
    data_structures::{instance::Instance, model::Geometry},
    resources::animation::{Interpolation, Keyframes},
};

/// Whether a clip stops on its last keyframe or starts over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    Once,
    #[default]
    Forever,
}

/// One animated property of a node together with its keyframe times.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub keyframes: Keyframes,
    pub timestamps: Vec<f32>,
    pub interpolation: Interpolation,
}

/// A named animation with keyframes and timing, as imported from an asset.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
    pub repeat: Repeat,
}

impl AnimationClip {
    /// Time of the last keyframe over all channels.
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .filter_map(|channel| channel.timestamps.last())
            .cloned()
            .fold(0.0, f32::max)
    }
}

/**
 * Merges channels with the same clip name so that every clip carries all of
 * its transformations in one place.
 *
 * GLTF stores one channel per animated property:
 *
 * (anim1, Scale([..])), (anim1, Rotation([..])), (anim2, Translation([..]))
 *
 * which becomes
 *
 * AnimationClip { name: anim1, channels: [Scale, Rotation] }
 * AnimationClip { name: anim2, channels: [Translation] }
 *
 * Clip order follows the first appearance of each name.
 */
pub fn merge(channels: Vec<(String, Channel)>, repeat: Repeat) -> Vec<AnimationClip> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, Vec<Channel>> = HashMap::new();
    for (name, channel) in channels {
        if matches!(channel.keyframes, Keyframes::Other) {
            log::debug!("skipping unsupported channel in clip {}", name);
            continue;
        }
        by_name
            .entry(name.clone())
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(channel);
    }
    order
        .into_iter()
        .filter_map(|name| {
            let channels = by_name.remove(&name)?;
            Some(AnimationClip {
                name,
                channels,
                repeat,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fovy: cgmath::Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fovy: cgmath::Deg(60.0),
            znear: 1.0,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform fill from every direction; position and orientation are ignored.
    Ambient,
    /// Parallel rays along the node's local -Z axis.
    Directional,
    /// Point light at the node's position.
    Omni,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub colour: wgpu::Color,
    pub intensity: f32,
}

impl Light {
    pub const DEFAULT_INTENSITY: f32 = 1000.0;

    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            colour: wgpu::Color::WHITE,
            intensity: Self::DEFAULT_INTENSITY,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeContent {
    #[default]
    Empty,
    Geometry(Geometry),
    Camera(Camera),
    Light(Light),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Instance,
    pub content: NodeContent,
    pub animations: Vec<AnimationClip>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_geometry(name: Option<&str>, geometry: Geometry) -> Self {
        Self {
            content: NodeContent::Geometry(geometry),
            ..Self::new(name)
        }
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            content: NodeContent::Camera(camera),
            ..Default::default()
        }
    }

    pub fn with_light(light: Light) -> Self {
        Self {
            content: NodeContent::Light(light),
            ..Default::default()
        }
    }

    /// Appends `child` and returns its index among this node's children.
    pub fn add_child(&mut self, child: Node) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.content {
            NodeContent::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.content {
            NodeContent::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry().is_some()
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.content {
            NodeContent::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.content {
            NodeContent::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    pub fn count(&self, predicate: &dyn Fn(&Node) -> bool) -> usize {
        let mut count = 0;
        self.walk(&mut |node, _| {
            if predicate(node) {
                count += 1;
            }
        });
        count
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /**
     * Visits every node with its world transform, i.e. the product of all
     * local transforms from `parent` down to the node.
     */
    pub fn world_transforms<'a>(
        &'a self,
        parent: &Instance,
        visit: &mut dyn FnMut(&'a Node, &Instance),
    ) {
        let world = parent * &self.transform;
        visit(self, &world);
        for child in &self.children {
            child.world_transforms(&world, visit);
        }
    }
}

/// Debug listing of a node tree, one line per node indented by depth.
///
/// `- name (geometry: yes|no)`, with `unnamed` for nodes without a name.
pub fn describe_hierarchy(root: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    root.walk(&mut |node, depth| {
        lines.push(format!(
            "{}- {} (geometry: {})",
            "  ".repeat(depth),
            node.display_name(),
            if node.has_geometry() { "yes" } else { "no" }
        ));
    });
    lines
}

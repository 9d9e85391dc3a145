//! Scene composition.
//!
//! [`SceneComposer::compose`] turns an optional [`ModelRequest`] into a
//! render-ready [`ComposedScene`]: a transparent background, the requested
//! model (or the fallback cube when it cannot be loaded) spinning forever, one
//! camera, one ambient and one directional light.
//!
//! Loading is a plain `Result` pipeline, `resolve → import → select_root`.
//! Its error is absorbed in exactly one place, where the fallback cube is
//! substituted, so `compose` itself cannot fail.

use instant::Duration;

use crate::{
    data_structures::{
        block::{build_cube, Palette, CUBE_SPIN_AXIS, CUBE_SPIN_PERIOD},
        colour,
        instance::Instance,
        scene_graph::{describe_hierarchy, Camera, Light, LightKind, Node},
    },
    diagnostics::{Diagnostic, Diagnostics},
    flow::{play_embedded_clips, Spin},
    resources::{import_scene, select_root, AssetSource, ImportOptions, LoadError, ModelRequest},
};

/// Where the subject of a scene came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubjectKind {
    Model,
    Fallback,
}

/// Everything `compose` places and how.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposerSettings {
    /// Replaces whatever transform an imported model's root carries.
    pub model_transform: Instance,
    pub model_spin_axis: cgmath::Vector3<f32>,
    pub model_spin_period: Duration,
    pub fallback_spin_axis: cgmath::Vector3<f32>,
    pub fallback_spin_period: Duration,
    pub fallback_palette: Palette,
    pub model_camera_position: cgmath::Vector3<f32>,
    pub fallback_camera_position: cgmath::Vector3<f32>,
    pub ambient_colour: wgpu::Color,
    pub directional_intensity: f32,
    pub directional_angles: cgmath::Euler<cgmath::Rad<f32>>,
    pub import: ImportOptions,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        use std::f32::consts::FRAC_PI_4;
        Self {
            model_transform: Instance::uniform(cgmath::Vector3::new(0.0, -11.0, -30.0), 0.15),
            model_spin_axis: cgmath::Vector3::unit_y(),
            model_spin_period: Duration::from_secs(8),
            fallback_spin_axis: CUBE_SPIN_AXIS,
            fallback_spin_period: CUBE_SPIN_PERIOD,
            fallback_palette: Palette::Night,
            model_camera_position: cgmath::Vector3::new(0.0, 2.0, 0.0),
            fallback_camera_position: cgmath::Vector3::new(0.0, 0.0, 3.0),
            ambient_colour: colour::AMBIENT_FILL,
            directional_intensity: Light::DEFAULT_INTENSITY,
            directional_angles: cgmath::Euler::new(
                cgmath::Rad(-FRAC_PI_4),
                cgmath::Rad(FRAC_PI_4),
                cgmath::Rad(0.0),
            ),
            import: ImportOptions::default(),
        }
    }
}

/**
 * A scene ready to be handed to a render surface.
 *
 * The subject is always the first child of the root and always spins. Nodes
 * are only ever added while the scene is set up; dropping the scene stops
 * every animation it owns.
 */
#[derive(Clone, Debug)]
pub struct ComposedScene {
    background: wgpu::Color,
    root: Node,
    subject_kind: SubjectKind,
    rest: Instance,
    spin: Spin,
    elapsed: Duration,
}

impl ComposedScene {
    const SUBJECT: usize = 0;

    pub fn new(subject: Node, subject_kind: SubjectKind, spin: Spin) -> Self {
        let rest = subject.transform;
        let mut root = Node::new(None);
        root.add_child(subject);
        Self {
            background: colour::TRANSPARENT,
            root,
            subject_kind,
            rest,
            spin,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn add_node(&mut self, node: Node) -> usize {
        self.root.add_child(node)
    }

    /// Moves all animations forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.spin.advance(dt);
        let (rest, spin, elapsed) = (self.rest, &self.spin, self.elapsed);
        let subject = &mut self.root.children[Self::SUBJECT];
        spin.apply(&rest, &mut subject.transform);
        play_embedded_clips(subject, elapsed);
    }

    pub fn background(&self) -> wgpu::Color {
        self.background
    }

    pub fn clear_background(&mut self) {
        self.background = colour::TRANSPARENT;
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn subject(&self) -> &Node {
        &self.root.children[Self::SUBJECT]
    }

    pub(crate) fn subject_mut(&mut self) -> &mut Node {
        &mut self.root.children[Self::SUBJECT]
    }

    pub fn subject_kind(&self) -> SubjectKind {
        self.subject_kind
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The first camera node, paired with its world transform.
    pub fn camera(&self) -> Option<(&Node, Instance)> {
        let mut found = None;
        self.root.world_transforms(&Instance::new(), &mut |node, world| {
            if found.is_none() && node.camera().is_some() {
                found = Some((node, *world));
            }
        });
        found
    }

    pub fn camera_count(&self) -> usize {
        self.root.count(&|node| node.camera().is_some())
    }

    pub fn light_count(&self) -> usize {
        self.root.count(&|node| node.light().is_some())
    }

    /// Light nodes with their world transforms, in scene order.
    pub fn lights(&self) -> Vec<(&Light, Instance)> {
        let mut lights = Vec::new();
        self.root.world_transforms(&Instance::new(), &mut |node, world| {
            if let Some(light) = node.light() {
                lights.push((light, *world));
            }
        });
        lights
    }
}

pub struct SceneComposer<'a> {
    source: &'a dyn AssetSource,
    diagnostics: &'a dyn Diagnostics,
    pub settings: ComposerSettings,
}

impl<'a> SceneComposer<'a> {
    pub fn new(source: &'a dyn AssetSource, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            source,
            diagnostics,
            settings: ComposerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ComposerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Finds, imports and detaches the model root named by `request`.
    pub fn load_subject(&self, request: &ModelRequest) -> Result<Node, LoadError> {
        self.diagnostics.report(Diagnostic::Searching {
            request,
            bundle: self.source.describe(),
        });
        let available = self.source.paths_for_format(request.format());
        self.diagnostics.report(Diagnostic::Available {
            format: request.format(),
            assets: &available,
        });

        let location = self
            .source
            .resolve(request)
            .ok_or_else(|| LoadError::NotFound {
                name: request.name().to_string(),
                extension: request.format().extension().to_string(),
            })?;
        self.diagnostics.report(Diagnostic::Found(&location));

        let root = import_scene(&location, &self.settings.import)?;
        self.diagnostics
            .report(Diagnostic::Hierarchy(&describe_hierarchy(&root)));

        let subject = select_root(root, &location)?;
        self.diagnostics.report(Diagnostic::SelectedRoot {
            name: subject.display_name(),
        });
        Ok(subject)
    }

    /// Builds the scene for `request`. Never fails: any load error yields the fallback cube.
    pub fn compose(&self, request: Option<&ModelRequest>) -> ComposedScene {
        let subject = request.and_then(|request| match self.load_subject(request) {
            Ok(subject) => Some(subject),
            Err(e) => {
                self.diagnostics.report(Diagnostic::LoadFailed(&e));
                None
            }
        });
        let settings = &self.settings;

        let mut scene = match subject {
            Some(mut subject) => {
                subject.transform = settings.model_transform;
                let spin = Spin::new(settings.model_spin_axis, settings.model_spin_period);
                ComposedScene::new(subject, SubjectKind::Model, spin)
            }
            None => {
                self.diagnostics.report(Diagnostic::Fallback);
                let cube = build_cube(settings.fallback_palette);
                let spin = Spin::new(settings.fallback_spin_axis, settings.fallback_spin_period);
                ComposedScene::new(cube, SubjectKind::Fallback, spin)
            }
        };

        let mut camera = Node::with_camera(Camera::default());
        camera.transform.position = match scene.subject_kind() {
            SubjectKind::Model => settings.model_camera_position,
            SubjectKind::Fallback => settings.fallback_camera_position,
        };
        scene.add_node(camera);

        let mut ambient = Light::new(LightKind::Ambient);
        ambient.colour = settings.ambient_colour;
        scene.add_node(Node::with_light(ambient));

        let mut directional = Light::new(LightKind::Directional);
        directional.intensity = settings.directional_intensity;
        let mut directional = Node::with_light(directional);
        directional.transform.rotation = settings.directional_angles.into();
        scene.add_node(directional);

        scene
    }
}

use instant::Duration;

use crate::{
    composer::{ComposedScene, SubjectKind},
    data_structures::{
        colour,
        model::{BoxShape, Geometry, Material},
        scene_graph::{Camera, Node},
    },
    flow::Spin,
};

/**
 * A `Palette` is one of the two fixed six-colour schemes a cube can be
 * painted with. Colours are listed per face: front, right, back, left, top,
 * bottom.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    Day,
    #[default]
    Night,
}

impl Palette {
    pub fn colours(self) -> [wgpu::Color; 6] {
        match self {
            Palette::Day => [
                colour::BLUE,
                colour::YELLOW,
                colour::GREEN,
                colour::ORANGE,
                colour::PURPLE,
                colour::PINK,
            ],
            Palette::Night => [
                colour::DARK_GRAY,
                colour::LIGHT_GRAY,
                colour::INDIGO,
                colour::TEAL,
                colour::DARK_GRAY,
                colour::BLUE,
            ],
        }
    }

    pub fn materials(self) -> Vec<Material> {
        self.colours()
            .iter()
            .enumerate()
            .map(|(face, colour)| Material::glossy(&format!("face_{face}"), *colour))
            .collect()
    }

    pub fn toggled(self) -> Self {
        match self {
            Palette::Day => Palette::Night,
            Palette::Night => Palette::Day,
        }
    }
}

/// 1×1×1 with slightly bevelled edges.
pub const CUBE_SHAPE: BoxShape = BoxShape {
    width: 1.0,
    height: 1.0,
    length: 1.0,
    chamfer_radius: 0.05,
};

pub const CUBE_SPIN_AXIS: cgmath::Vector3<f32> = cgmath::Vector3::new(1.0, 1.0, 0.0);
pub const CUBE_SPIN_PERIOD: Duration = Duration::from_secs(5);

/// Unparented cube node painted with `palette`.
pub fn build_cube(palette: Palette) -> Node {
    Node::with_geometry(None, Geometry::cuboid(CUBE_SHAPE, palette.materials()))
}

/// The cube shown whenever a requested model cannot be loaded.
pub fn build_fallback_cube() -> Node {
    build_cube(Palette::Night)
}

/**
 * A standalone spinning cube without any asset loading.
 *
 * The only state is the palette; switching it rebuilds the cube's materials
 * and leaves the geometry untouched.
 */
pub struct RotatingCube {
    palette: Palette,
    scene: ComposedScene,
}

impl RotatingCube {
    pub const CAMERA_POSITION: cgmath::Vector3<f32> = cgmath::Vector3::new(0.0, 0.0, 3.0);

    pub fn new(palette: Palette) -> Self {
        let spin = Spin::new(CUBE_SPIN_AXIS, CUBE_SPIN_PERIOD);
        let mut scene = ComposedScene::new(build_cube(palette), SubjectKind::Fallback, spin);
        let mut camera = Node::with_camera(Camera::default());
        camera.transform.position = Self::CAMERA_POSITION;
        scene.add_node(camera);
        Self { palette, scene }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        if let Some(geometry) = self.scene.subject_mut().geometry_mut() {
            geometry.materials = palette.materials();
        }
    }

    pub fn toggle_palette(&mut self) {
        self.set_palette(self.palette.toggled());
    }

    pub fn scene(&self) -> &ComposedScene {
        &self.scene
    }

    pub fn advance(&mut self, dt: Duration) {
        self.scene.advance(dt);
    }

    pub fn into_scene(self) -> ComposedScene {
        self.scene
    }
}

impl Default for RotatingCube {
    fn default() -> Self {
        Self::new(Palette::Day)
    }
}

//! model-stage
//!
//! Loads a 3D model bundled with the application, composes it into a small
//! lit scene and hands that scene to a render surface. Whatever goes wrong
//! while finding or parsing the model, the caller still gets a scene: a
//! spinning fallback cube takes the model's place.
//!
//! High-level modules
//! - `camera`: projection, camera uniform and the orbit controller
//! - `composer`: builds a [`composer::ComposedScene`] from a model request
//! - `data_structures`: scene graph, geometry, materials, colours and the cube
//! - `diagnostics`: reporting hooks for the load pipeline
//! - `flow`: looping animations driven by frame time
//! - `resources`: finding model files in a bundle and importing them
//! - `render`: per-frame draw data extracted from a scene
//! - `surface`: hosts a composed scene in a view
//!

pub mod camera;
pub mod composer;
pub mod data_structures;
pub mod diagnostics;
pub mod flow;
pub mod render;
pub mod resources;
pub mod surface;

pub use composer::{ComposedScene, ComposerSettings, SceneComposer, SubjectKind};
pub use data_structures::block::{Palette, RotatingCube};
pub use diagnostics::{init_logging, Diagnostic, Diagnostics, LogDiagnostics};
pub use resources::{AssetFormat, AssetSource, Bundle, ImportError, LoadError, ModelRequest};
pub use surface::{RenderSurface, SurfaceSettings, ViewportSize};

// Re-exports commonly used types for convenience in downstream code.
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;

//! Scene data: nodes, geometry, materials, colours and transforms.
//!
//! - `scene_graph` holds the node tree, cameras, lights and animation clips
//! - `model` contains mesh, material and geometry definitions including the chamfered box
//! - `block` builds the cube used as fallback and standalone view
//! - `instance` holds per-node transformation data
//! - `colour` names the colours used throughout

pub mod block;
pub mod colour;
pub mod instance;
pub mod model;
pub mod scene_graph;

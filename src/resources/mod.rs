use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::data_structures::scene_graph::{Node, Repeat};

/**
 * This module contains all logic for finding model files in the application
 * bundle and loading them into scene nodes.
 */
pub mod animation;
pub mod gltf_loader;
pub mod obj_loader;

/// File formats a model can be bundled in.
///
/// `Glb` is the self-contained binary container, `Gltf` the text scene
/// description (with side-car or embedded buffers) and `Obj` a Wavefront mesh
/// with an optional `.mtl` file. The formats are interchangeable for callers;
/// only the importer behind them differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    Glb,
    Gltf,
    Obj,
}

impl AssetFormat {
    pub const ALL: [AssetFormat; 3] = [AssetFormat::Glb, AssetFormat::Gltf, AssetFormat::Obj];

    pub fn extension(self) -> &'static str {
        match self {
            AssetFormat::Glb => "glb",
            AssetFormat::Gltf => "gltf",
            AssetFormat::Obj => "obj",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A logical model name plus the format it is expected in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    name: String,
    format: AssetFormat,
}

impl ModelRequest {
    pub fn new(name: &str, format: AssetFormat) -> Self {
        Self {
            name: name.to_string(),
            format,
        }
    }

    /// Splits `"mario_ac.glb"` into name and format. `None` for unknown extensions.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (name, extension) = file_name.rsplit_once('.')?;
        let format = AssetFormat::from_extension(extension)?;
        Some(Self::new(name, format))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> AssetFormat {
        self.format
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }
}

impl fmt::Display for ModelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.format)
    }
}

/// A model file found inside a bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLocation {
    pub path: PathBuf,
    pub format: AssetFormat,
}

impl AssetLocation {
    pub fn new(path: impl Into<PathBuf>, format: AssetFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read-only source of bundled model files.
pub trait AssetSource {
    /// First asset matching `request`; `None` when the bundle doesn't contain it.
    fn resolve(&self, request: &ModelRequest) -> Option<AssetLocation>;

    /// Every asset of `format`, used for diagnostics only.
    fn paths_for_format(&self, format: AssetFormat) -> Vec<AssetLocation>;

    /// Human readable location of the bundle.
    fn describe(&self) -> String;
}

/// A directory of bundled resources.
///
/// Lookups search the bundle root first and then its subdirectories in sorted,
/// depth-first order; the first match wins.
#[derive(Clone, Debug)]
pub struct Bundle {
    root: PathBuf,
}

impl Bundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The assets shipped with this crate, copied next to the build output.
    pub fn main() -> Self {
        Self::new(Path::new(env!("OUT_DIR")).join("assets"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every file in the bundle, in search order. Symlinks are followed; loops are skipped.
    fn all_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then(a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("cannot walk bundle {}: {}", self.root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .collect()
    }
}

fn has_format(path: &Path, format: AssetFormat) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(format.extension()))
}

impl AssetSource for Bundle {
    fn resolve(&self, request: &ModelRequest) -> Option<AssetLocation> {
        if request.name().is_empty() {
            return None;
        }
        self.all_files()
            .into_iter()
            .find(|path| {
                has_format(path, request.format())
                    && path.file_stem().and_then(|stem| stem.to_str()) == Some(request.name())
            })
            .map(|path| AssetLocation::new(path, request.format()))
    }

    fn paths_for_format(&self, format: AssetFormat) -> Vec<AssetLocation> {
        self.all_files()
            .into_iter()
            .filter(|path| has_format(path, format))
            .map(|path| AssetLocation::new(path, format))
            .collect()
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// What to do with animations embedded in an imported asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationPolicy {
    #[default]
    PlayRepeatedly,
    PlayOnce,
}

impl AnimationPolicy {
    pub fn repeat(self) -> Repeat {
        match self {
            AnimationPolicy::PlayRepeatedly => Repeat::Forever,
            AnimationPolicy::PlayOnce => Repeat::Once,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub animation_policy: AnimationPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("{path} contains no top-level node")]
    Empty { path: PathBuf },
}

impl ImportError {
    pub(crate) fn malformed(location: &AssetLocation, reason: impl fmt::Display) -> Self {
        ImportError::Malformed {
            path: location.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Everything that can stop a requested model from becoming the scene subject.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{name}.{extension} is not in the bundle")]
    NotFound { name: String, extension: String },
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Parses the asset at `location` into a node tree.
///
/// The returned root is an unnamed container whose children are the asset's
/// top-level nodes.
pub fn import_scene(location: &AssetLocation, options: &ImportOptions) -> Result<Node, ImportError> {
    match location.format {
        AssetFormat::Glb | AssetFormat::Gltf => gltf_loader::load_scene_gltf(location, options),
        AssetFormat::Obj => obj_loader::load_scene_obj(location),
    }
}

/// The first top-level node of an imported asset, detached from its root.
pub fn select_root(root: Node, location: &AssetLocation) -> Result<Node, ImportError> {
    root.children
        .into_iter()
        .next()
        .ok_or_else(|| ImportError::Empty {
            path: location.path.clone(),
        })
}

pub(crate) fn read_asset(location: &AssetLocation) -> Result<Vec<u8>, ImportError> {
    fs::read(&location.path).map_err(|source| ImportError::Unreadable {
        path: location.path.clone(),
        source,
    })
}

//! Host scene data consumed by the exporter
//!
//! The exporter only reads from these types. Objects are visited in the
//! order they appear in [`Scene::objects`].

mod armature;
mod mesh;
mod obj;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use armature::{Armature, Bone};
pub use mesh::{Mesh, MeshVertex, Polygon, UvLayer, VertexGroup};
pub(crate) use mesh::newell_normal;
pub use obj::{load_obj, load_obj_from_bytes};

/// A scene: an ordered collection of objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

/// One object in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    /// Part of the current selection
    #[serde(default)]
    pub selected: bool,
    pub kind: ObjectKind,
}

/// Object payload, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectKind {
    Mesh(Mesh),
    Armature(Armature),
    /// Cameras, lights, empties; never exported
    Other,
}

impl SceneObject {
    pub fn mesh(mesh: Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            selected: false,
            kind: ObjectKind::Mesh(mesh),
        }
    }

    pub fn armature(armature: Armature) -> Self {
        Self {
            name: armature.name.clone(),
            selected: false,
            kind: ObjectKind::Armature(armature),
        }
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: false,
            kind: ObjectKind::Other,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Mesh(_) => "mesh",
            ObjectKind::Armature(_) => "armature",
            ObjectKind::Other => "other",
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Parse a scene from a RON string
    pub fn from_ron_str(s: &str) -> Result<Self, SceneError> {
        ron::from_str(s).map_err(|e| SceneError::Parse(e.to_string()))
    }

    /// Serialize the scene to a pretty RON string
    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::Parse(e.to_string()))
    }

    /// Load a scene from a RON file
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| SceneError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the scene to a RON file
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| SceneError::Io(e.to_string()))
    }
}

/// Scene file format, detected from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    /// Scene description in RON
    Ron,
    /// Wavefront OBJ mesh
    Obj,
    Unknown,
}

impl SceneFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("ron") => SceneFormat::Ron,
            Some("obj") => SceneFormat::Obj,
            _ => SceneFormat::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneFormat::Ron => "RON",
            SceneFormat::Obj => "OBJ",
            SceneFormat::Unknown => "Unknown",
        }
    }
}

/// Load a scene from any supported file format
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    match SceneFormat::from_path(path) {
        SceneFormat::Ron => Scene::load_ron(path),
        SceneFormat::Obj => load_obj(path),
        SceneFormat::Unknown => Err(SceneError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Scene loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

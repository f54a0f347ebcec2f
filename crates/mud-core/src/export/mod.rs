//! Model export: scene walking, extraction and file output

mod format;
mod geometry;
mod options;
mod skeleton;
mod topology;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::axis::CoordinateTransform;
use crate::document::{DocumentNode, write_document};
use crate::scene::{ObjectKind, Scene};

pub use geometry::{ExtractedMesh, build_mesh_node, compute_aabb, resolve_vertex_uvs};
pub use options::{BoneSpace, ExportOptions, SelectionMode, model_name_from_path};
pub use skeleton::{build_skeleton_node, decompose_bone_matrix, find_root_bone};
pub use topology::Triangle;

/// Counts gathered while building a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub meshes: usize,
    pub skeletons: usize,
    /// Objects of other kinds that were passed over
    pub skipped: usize,
    /// Vertices written across all meshes, after seam splitting
    pub vertices: usize,
    pub triangles: usize,
}

/// A built document tree and what went into it
#[derive(Debug, Clone)]
pub struct ModelDocument {
    pub root: DocumentNode,
    pub stats: ExportStats,
}

/// Build the `model` tree for the objects chosen by `options.selection`
///
/// Meshes become `mesh` nodes and armatures `skeleton` nodes, in scene order.
/// Meshes are extracted one at a time, each on its own working copy.
pub fn build_model(scene: &Scene, options: &ExportOptions) -> Result<ModelDocument, ExportError> {
    let transform = CoordinateTransform::new(options.up_axis);
    let mut root = DocumentNode::named("model", &options.model_name);
    let mut stats = ExportStats::default();

    let objects = scene
        .objects
        .iter()
        .filter(|object| options.selection.includes(object));

    for object in objects {
        match &object.kind {
            ObjectKind::Armature(armature) => {
                tracing::debug!("Exporting armature '{}'", object.name);
                root.push_child(build_skeleton_node(armature, &transform, options.bone_space)?);
                stats.skeletons += 1;
            }
            ObjectKind::Mesh(mesh) => {
                tracing::debug!("Exporting mesh '{}'", object.name);
                let extracted = build_mesh_node(mesh, &transform)?;
                stats.meshes += 1;
                stats.vertices += extracted.vertex_count;
                stats.triangles += extracted.triangle_count;
                root.push_child(extracted.node);
            }
            ObjectKind::Other => {
                tracing::debug!("Skipping object '{}' ({})", object.name, object.kind_name());
                stats.skipped += 1;
            }
        }
    }

    Ok(ModelDocument { root, stats })
}

/// Export to any writer
pub fn export_to_writer<W: Write>(
    scene: &Scene,
    options: &ExportOptions,
    writer: &mut W,
) -> Result<ExportStats, ExportError> {
    let model = build_model(scene, options)?;
    write_document(writer, &model.root).map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(model.stats)
}

/// Export to a string only (no file I/O)
pub fn export_to_string(scene: &Scene, options: &ExportOptions) -> Result<String, ExportError> {
    let model = build_model(scene, options)?;
    Ok(model.root.to_string())
}

/// Export to a `.mudm` file
///
/// The whole tree is built before the file is created, so a failing object
/// leaves no file behind. The file is closed on every return path.
pub fn export_to_file(
    scene: &Scene,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportStats, ExportError> {
    let path = path.as_ref();
    let model = build_model(scene, options)?;

    let io_error = |e: std::io::Error| ExportError::Io(format!("{}: {}", path.display(), e));
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_document(&mut writer, &model.root).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::info!(
        "Exported model '{}' to {} ({} meshes, {} skeletons, {} vertices)",
        options.model_name,
        path.display(),
        model.stats.meshes,
        model.stats.skeletons,
        model.stats.vertices
    );
    Ok(model.stats)
}

/// Export-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Armature '{armature}' has no root bone")]
    NoRootBone { armature: String },
    #[error("Armature '{armature}' has {count} root bones, expected one")]
    MultipleRootBones { armature: String, count: usize },
    #[error("Bone '{bone}' not found in armature '{armature}'")]
    BoneNotFound { armature: String, bone: String },
    #[error("Bone '{bone}' is reached twice in armature '{armature}'")]
    BoneCycle { armature: String, bone: String },
    #[error("Invalid topology in mesh '{mesh}': {reason}")]
    InvalidTopology { mesh: String, reason: String },
    #[error("UV layer of mesh '{mesh}' has {found} entries, expected {expected}")]
    UvLayerMismatch {
        mesh: String,
        expected: usize,
        found: usize,
    },
}

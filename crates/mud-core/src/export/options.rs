//! Export options for model generation

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::axis::UpAxis;
use crate::constants::DEFAULT_MODEL_NAME;
use crate::scene::SceneObject;

/// Which objects an export visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Every object in the scene
    #[default]
    Scene,
    /// Only the currently selected objects
    Selected,
}

impl SelectionMode {
    /// Whether `object` takes part in an export using this mode
    pub fn includes(self, object: &SceneObject) -> bool {
        match self {
            SelectionMode::Scene => true,
            SelectionMode::Selected => object.selected,
        }
    }
}

/// Frame bone transforms are written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoneSpace {
    /// Armature space, not affected by the up axis
    #[default]
    Armature,
    /// Armature space rotated by the same up-axis conversion as the geometry
    UpAxis,
}

/// Export options for `.mudm` generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub selection: SelectionMode,
    pub up_axis: UpAxis,
    pub bone_space: BoneSpace,
    /// Value of the root `model` node's `name` attribute
    pub model_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            selection: SelectionMode::Scene,
            up_axis: UpAxis::Y,
            bone_space: BoneSpace::Armature,
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    /// Default options with the model name derived from an output path
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        Self {
            model_name: model_name_from_path(path.as_ref()),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    pub fn with_bone_space(mut self, bone_space: BoneSpace) -> Self {
        self.bone_space = bone_space;
        self
    }
}

/// Model name from an output path: the file name without directory or extension
///
/// Both `/` and `\` separate directories, so Windows-style paths work everywhere.
pub fn model_name_from_path(path: &Path) -> String {
    let full = path.to_string_lossy();
    let file = full.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    if stem.is_empty() {
        DEFAULT_MODEL_NAME.to_string()
    } else {
        stem.to_string()
    }
}

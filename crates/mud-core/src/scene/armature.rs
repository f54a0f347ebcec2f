//! Armature (bone hierarchy) data as supplied by the host

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// A skeleton: a flat, name-indexed bone collection forming a tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Armature {
    pub name: String,
    /// Bones in collection order; a bone's position is its ID
    pub bones: Vec<Bone>,
}

/// A bone in an armature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Parent bone name (None for the root)
    #[serde(default)]
    pub parent: Option<String>,
    /// Child bone names in host order
    #[serde(default)]
    pub children: Vec<String>,
    /// Rest transform in armature space
    pub matrix_local: Mat4,
}

impl Armature {
    /// Create a new empty armature
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: Vec::new(),
        }
    }

    /// Append a bone, linking it to its parent's child list
    pub fn add_bone(&mut self, name: impl Into<String>, parent: Option<&str>, matrix_local: Mat4) {
        let name = name.into();
        if let Some(parent_name) = parent
            && let Some(parent_bone) = self.bones.iter_mut().find(|b| b.name == parent_name)
        {
            parent_bone.children.push(name.clone());
        }
        self.bones.push(Bone {
            name,
            parent: parent.map(str::to_string),
            children: Vec::new(),
            matrix_local,
        });
    }

    /// Position of the named bone in the collection
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Bones without a parent, in collection order
    pub fn root_bones(&self) -> Vec<&Bone> {
        self.bones.iter().filter(|b| b.parent.is_none()).collect()
    }
}

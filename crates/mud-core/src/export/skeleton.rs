//! Skeleton extraction: bone hierarchy with per-bone translation and rotation

use glam::{Mat4, Quat, Vec3};

use crate::axis::CoordinateTransform;
use crate::document::DocumentNode;
use crate::scene::{Armature, Bone};

use super::ExportError;
use super::format::comma_separated;
use super::options::BoneSpace;

/// Build the `skeleton` node for one armature
///
/// The armature must have exactly one bone without a parent.
pub fn build_skeleton_node(
    armature: &Armature,
    transform: &CoordinateTransform,
    bone_space: BoneSpace,
) -> Result<DocumentNode, ExportError> {
    let root = find_root_bone(armature)?;

    let mut builder = SkeletonBuilder {
        armature,
        transform,
        bone_space,
        visited: vec![false; armature.bones.len()],
    };
    let root_node = builder.build_bone(root)?;

    let exported = builder.visited.iter().filter(|&&v| v).count();
    if exported != armature.bones.len() {
        tracing::warn!(
            "Armature '{}': {} of {} bones are not reachable from the root",
            armature.name,
            armature.bones.len() - exported,
            armature.bones.len()
        );
    }

    let mut skeleton = DocumentNode::named("skeleton", &armature.name);
    skeleton.push_child(root_node);
    Ok(skeleton)
}

/// The single parent-less bone of an armature
pub fn find_root_bone(armature: &Armature) -> Result<&Bone, ExportError> {
    let roots = armature.root_bones();
    match roots.as_slice() {
        [root] => Ok(*root),
        [] => Err(ExportError::NoRootBone {
            armature: armature.name.clone(),
        }),
        _ => Err(ExportError::MultipleRootBones {
            armature: armature.name.clone(),
            count: roots.len(),
        }),
    }
}

/// Translation and unit rotation of a bone matrix
///
/// Scale is removed before the rotation is extracted.
pub fn decompose_bone_matrix(matrix: &Mat4) -> (Vec3, Quat) {
    let (_scale, rotation, translation) = matrix.to_scale_rotation_translation();
    (translation, rotation.normalize())
}

struct SkeletonBuilder<'a> {
    armature: &'a Armature,
    transform: &'a CoordinateTransform,
    bone_space: BoneSpace,
    visited: Vec<bool>,
}

impl SkeletonBuilder<'_> {
    fn build_bone(&mut self, bone: &Bone) -> Result<DocumentNode, ExportError> {
        let armature = self.armature;
        let id = armature
            .find(&bone.name)
            .ok_or_else(|| self.bone_not_found(&bone.name))?;

        if std::mem::replace(&mut self.visited[id], true) {
            return Err(ExportError::BoneCycle {
                armature: armature.name.clone(),
                bone: bone.name.clone(),
            });
        }

        let (mut translation, mut rotation) = decompose_bone_matrix(&bone.matrix_local);
        if self.bone_space == BoneSpace::UpAxis {
            translation = Vec3::from_array(self.transform.apply(translation.to_array()));
            rotation = self.transform.apply_rotation(rotation);
        }

        let mut node = DocumentNode::bone(
            id,
            &bone.name,
            comma_separated(&translation.to_array()),
            comma_separated(&rotation.to_array()),
        );

        for child_name in &bone.children {
            let child = armature
                .get(child_name)
                .ok_or_else(|| self.bone_not_found(child_name))?;
            node.push_child(self.build_bone(child)?);
        }

        Ok(node)
    }

    fn bone_not_found(&self, name: &str) -> ExportError {
        ExportError::BoneNotFound {
            armature: self.armature.name.clone(),
            bone: name.to_string(),
        }
    }
}

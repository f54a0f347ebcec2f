//! Mesh data as supplied by the host

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::BOUND_BOX_CORNERS;

/// A polygon mesh with optional UVs and skinning
///
/// Loops (face corners) are numbered consecutively across `polygons`:
/// polygon `k` owns the loops following those of polygons `0..k`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub polygons: Vec<Polygon>,
    /// Edges flagged sharp by the host, as unordered vertex pairs
    #[serde(default)]
    pub sharp_edges: Vec<[u32; 2]>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    /// Index into `uv_layers` of the layer to export
    #[serde(default)]
    pub active_uv_layer: Option<usize>,
    /// Object-space bounding box corners
    #[serde(default)]
    pub bound_box: [[f32; 3]; BOUND_BOX_CORNERS],
}

/// A mesh vertex
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Bone-group memberships in host order
    #[serde(default)]
    pub groups: Vec<VertexGroup>,
}

/// Skinning influence of one bone group on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    /// Index of the group; matches the bone index in the armature
    pub group: usize,
    pub weight: f32,
}

/// A face given by its corner vertices in winding order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<u32>,
}

/// Per-loop UV coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    pub uvs: Vec<[f32; 2]>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.vertices.push(MeshVertex {
            position,
            normal,
            groups: Vec::new(),
        });
        (self.vertices.len() - 1) as u32
    }

    pub fn add_polygon(&mut self, vertices: &[u32]) {
        self.polygons.push(Polygon {
            vertices: vertices.to_vec(),
        });
    }

    /// Add a UV layer (one UV per loop) and make it active
    pub fn add_uv_layer(&mut self, name: impl Into<String>, uvs: Vec<[f32; 2]>) {
        self.uv_layers.push(UvLayer {
            name: name.into(),
            uvs,
        });
        self.active_uv_layer = Some(self.uv_layers.len() - 1);
    }

    pub fn mark_sharp(&mut self, a: u32, b: u32) {
        self.sharp_edges.push([a, b]);
    }

    /// Total number of face corners
    pub fn loop_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    /// The active UV layer, if any
    pub fn active_uv(&self) -> Option<&UvLayer> {
        self.active_uv_layer.and_then(|i| self.uv_layers.get(i))
    }

    /// Set `bound_box` to the corners of the axis-aligned box around all vertices
    pub fn update_bound_box(&mut self) {
        if self.vertices.is_empty() {
            self.bound_box = [[0.0; 3]; BOUND_BOX_CORNERS];
            return;
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        // Corner order: x varies slowest, z fastest within each y pair
        self.bound_box = [
            [min[0], min[1], min[2]],
            [min[0], min[1], max[2]],
            [min[0], max[1], max[2]],
            [min[0], max[1], min[2]],
            [max[0], min[1], min[2]],
            [max[0], min[1], max[2]],
            [max[0], max[1], max[2]],
            [max[0], max[1], min[2]],
        ];
    }
}

/// Newell normal of a closed polygon (unit length, or zero when degenerate)
pub(crate) fn newell_normal(points: &[Vec3]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        normal += Vec3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        );
    }
    normal.normalize_or_zero()
}

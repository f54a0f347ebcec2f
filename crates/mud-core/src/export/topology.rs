//! Owned working copy of mesh topology
//!
//! Seam splitting changes vertex identity and count, so it runs on a copy
//! built once per export. The host mesh stays untouched.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use glam::Vec3;

use crate::constants::UV_CONNECT_LIMIT;
use crate::scene::{Mesh, MeshVertex, newell_normal};

use super::ExportError;

/// A triangle referencing three loops and their vertices, in winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub loops: [usize; 3],
    pub vertices: [u32; 3],
}

/// Unordered edge key
type EdgeKey = (u32, u32);

fn edge_key(a: u32, b: u32) -> EdgeKey {
    if a < b { (a, b) } else { (b, a) }
}

/// One face using an edge: the loop sitting on each endpoint
#[derive(Debug, Clone, Copy)]
struct EdgeUse {
    /// Loop at the lower vertex index
    low: usize,
    /// Loop at the higher vertex index
    high: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct WorkingMesh {
    pub vertices: Vec<MeshVertex>,
    /// Vertex index of every loop
    pub loops: Vec<u32>,
    /// Loop range of every polygon
    pub polygons: Vec<Range<usize>>,
    /// Per-loop UVs of the active layer
    pub uvs: Option<Vec<[f32; 2]>>,
    sharp: HashSet<EdgeKey>,
}

impl WorkingMesh {
    /// Copy the topology of `mesh`, checking indices so later stages cannot go out of range
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, ExportError> {
        let invalid = |reason: String| ExportError::InvalidTopology {
            mesh: mesh.name.clone(),
            reason,
        };

        let vertex_count = mesh.vertices.len() as u32;
        let mut loops = Vec::with_capacity(mesh.loop_count());
        let mut polygons = Vec::with_capacity(mesh.polygons.len());

        for (i, polygon) in mesh.polygons.iter().enumerate() {
            if let Some(&bad) = polygon.vertices.iter().find(|&&v| v >= vertex_count) {
                return Err(invalid(format!(
                    "polygon {} references vertex {} of {}",
                    i, bad, vertex_count
                )));
            }
            let start = loops.len();
            loops.extend_from_slice(&polygon.vertices);
            polygons.push(start..loops.len());
        }

        let uvs = match mesh.active_uv() {
            Some(layer) if layer.uvs.len() != loops.len() => {
                return Err(ExportError::UvLayerMismatch {
                    mesh: mesh.name.clone(),
                    expected: loops.len(),
                    found: layer.uvs.len(),
                });
            }
            Some(layer) => Some(layer.uvs.clone()),
            None => None,
        };

        let sharp = mesh
            .sharp_edges
            .iter()
            .map(|&[a, b]| edge_key(a, b))
            .collect();

        Ok(Self {
            vertices: mesh.vertices.clone(),
            loops,
            polygons,
            uvs,
            sharp,
        })
    }

    /// Every face-side use of each edge
    fn edge_uses(&self) -> HashMap<EdgeKey, Vec<EdgeUse>> {
        let mut uses: HashMap<EdgeKey, Vec<EdgeUse>> = HashMap::new();

        for range in &self.polygons {
            let n = range.len();
            for i in 0..n {
                let la = range.start + i;
                let lb = range.start + (i + 1) % n;
                let (va, vb) = (self.loops[la], self.loops[lb]);
                if va == vb {
                    continue;
                }
                let edge_use = if va < vb {
                    EdgeUse { low: la, high: lb }
                } else {
                    EdgeUse { low: lb, high: la }
                };
                uses.entry(edge_key(va, vb)).or_default().push(edge_use);
            }
        }

        uses
    }

    /// Mark every interior edge whose sides disagree on UVs as sharp
    ///
    /// Returns the number of newly marked edges.
    pub fn mark_uv_island_boundaries(&mut self) -> usize {
        let Some(uvs) = &self.uvs else {
            return 0;
        };

        let same = |a: [f32; 2], b: [f32; 2]| {
            (a[0] - b[0]).abs() <= UV_CONNECT_LIMIT && (a[1] - b[1]).abs() <= UV_CONNECT_LIMIT
        };

        let mut marked = 0;
        for (key, uses) in self.edge_uses() {
            let Some((first, rest)) = uses.split_first() else {
                continue;
            };
            let boundary = rest
                .iter()
                .any(|u| !same(uvs[u.low], uvs[first.low]) || !same(uvs[u.high], uvs[first.high]));
            if boundary && self.sharp.insert(key) {
                marked += 1;
            }
        }
        marked
    }

    /// Split the mesh along all sharp edges
    ///
    /// Only vertices on a sharp edge can split. Face corners around such a
    /// vertex that stay connected through smooth edges keep sharing it. Each further group gets a copy of the vertex
    /// appended at the end. Returns the number of vertices added.
    pub fn split_sharp_edges(&mut self) -> usize {
        let mut fans = UnionFind::new(self.loops.len());
        for (key, uses) in self.edge_uses() {
            if self.sharp.contains(&key) {
                continue;
            }
            if let Some((first, rest)) = uses.split_first() {
                for u in rest {
                    fans.union(first.low, u.low);
                    fans.union(first.high, u.high);
                }
            }
        }

        let original_count = self.vertices.len();
        let mut on_sharp = vec![false; original_count];
        for &(a, b) in &self.sharp {
            for v in [a, b] {
                if let Some(flag) = on_sharp.get_mut(v as usize) {
                    *flag = true;
                }
            }
        }

        let mut kept_root: Vec<Option<usize>> = vec![None; original_count];
        let mut assigned: HashMap<usize, u32> = HashMap::new();
        let mut touched = vec![false; original_count];

        // Lowest loop index first, so the first fan of each vertex keeps its index
        for l in 0..self.loops.len() {
            let v = self.loops[l] as usize;
            if !on_sharp[v] {
                continue;
            }
            let root = fans.find(l);

            let target = match kept_root[v] {
                None => {
                    kept_root[v] = Some(root);
                    v as u32
                }
                Some(kept) if kept == root => v as u32,
                Some(_) => *assigned.entry(root).or_insert_with(|| {
                    touched[v] = true;
                    self.vertices.push(self.vertices[v].clone());
                    touched.push(true);
                    (self.vertices.len() - 1) as u32
                }),
            };
            self.loops[l] = target;
        }

        let added = self.vertices.len() - original_count;
        if added > 0 {
            self.recompute_normals(&touched);
        }
        added
    }

    /// Angle-weighted vertex normals for the flagged vertices
    fn recompute_normals(&mut self, touched: &[bool]) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];

        for range in &self.polygons {
            let corners = &self.loops[range.clone()];
            let points: Vec<Vec3> = corners
                .iter()
                .map(|&v| Vec3::from_array(self.vertices[v as usize].position))
                .collect();
            let face_normal = newell_normal(&points);
            if face_normal == Vec3::ZERO {
                continue;
            }

            let n = points.len();
            for (i, &v) in corners.iter().enumerate() {
                if !touched[v as usize] {
                    continue;
                }
                let prev = points[(i + n - 1) % n] - points[i];
                let next = points[(i + 1) % n] - points[i];
                let angle = prev.angle_between(next);
                if angle.is_finite() {
                    sums[v as usize] += face_normal * angle;
                }
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            if touched[i]
                && let Some(normal) = sums[i].try_normalize()
            {
                vertex.normal = normal.to_array();
            }
        }
    }

    /// Fan-triangulate every polygon from its first corner
    pub fn triangulate(&self) -> Vec<Triangle> {
        let mut triangles = Vec::new();
        for range in &self.polygons {
            if range.len() < 3 {
                continue;
            }
            let first = range.start;
            for l in range.start + 1..range.end - 1 {
                let loops = [first, l, l + 1];
                triangles.push(Triangle {
                    loops,
                    vertices: loops.map(|l| self.loops[l]),
                });
            }
        }
        triangles
    }
}

/// Disjoint sets over loop indices
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller root wins to keep results independent of edge order
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two quads sharing the edge 1-4:
    ///
    /// 0 - 1 - 2
    /// |   |   |
    /// 3 - 4 - 5
    fn strip() -> Mesh {
        let mut mesh = Mesh::new("strip");
        for (x, y) in [(0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (0.0, 0.0), (1.0, 0.0), (2.0, 0.0)] {
            mesh.add_vertex([x, y, 0.0], [0.0, 0.0, 1.0]);
        }
        mesh.add_polygon(&[3, 4, 1, 0]);
        mesh.add_polygon(&[4, 5, 2, 1]);
        mesh
    }

    #[test]
    fn test_from_mesh_flattens_loops() {
        let work = WorkingMesh::from_mesh(&strip()).unwrap();
        assert_eq!(work.loops, vec![3, 4, 1, 0, 4, 5, 2, 1]);
        assert_eq!(work.polygons, vec![0..4, 4..8]);
        assert!(work.uvs.is_none());
    }

    #[test]
    fn test_from_mesh_rejects_bad_index() {
        let mut mesh = strip();
        mesh.add_polygon(&[0, 1, 9]);
        let result = WorkingMesh::from_mesh(&mesh);
        assert!(matches!(result, Err(ExportError::InvalidTopology { .. })));
    }

    #[test]
    fn test_from_mesh_rejects_short_uv_layer() {
        let mut mesh = strip();
        mesh.add_uv_layer("UVMap", vec![[0.0, 0.0]; 3]);
        let result = WorkingMesh::from_mesh(&mesh);
        assert!(matches!(
            result,
            Err(ExportError::UvLayerMismatch {
                expected: 8,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_triangulate_quads() {
        let work = WorkingMesh::from_mesh(&strip()).unwrap();
        let triangles = work.triangulate();
        assert_eq!(triangles.len(), 4);
        assert_eq!(triangles[0].vertices, [3, 4, 1]);
        assert_eq!(triangles[1].vertices, [3, 1, 0]);
        assert_eq!(triangles[2].loops, [4, 5, 6]);
    }

    #[test]
    fn test_triangulate_skips_degenerate_polygons() {
        let mut mesh = strip();
        mesh.add_polygon(&[0, 1]);
        let work = WorkingMesh::from_mesh(&mesh).unwrap();
        assert_eq!(work.triangulate().len(), 4);
    }

    #[test]
    fn test_continuous_uvs_do_not_split() {
        let mut mesh = strip();
        // UVs follow positions, so the shared edge is not a seam
        let uvs = [3, 4, 1, 0, 4, 5, 2, 1]
            .iter()
            .map(|&v| {
                let p = mesh.vertices[v].position;
                [p[0] / 2.0, p[1]]
            })
            .collect();
        mesh.add_uv_layer("UVMap", uvs);

        let mut work = WorkingMesh::from_mesh(&mesh).unwrap();
        assert_eq!(work.mark_uv_island_boundaries(), 0);
        assert_eq!(work.split_sharp_edges(), 0);
        assert_eq!(work.vertices.len(), 6);
    }

    #[test]
    fn test_uv_seam_splits_shared_edge() {
        let mut mesh = strip();
        // Second quad uses its own island, offset in U
        let uvs = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [2.0, 0.0],
            [3.0, 0.0],
            [3.0, 1.0],
            [2.0, 1.0],
        ];
        mesh.add_uv_layer("UVMap", uvs);

        let mut work = WorkingMesh::from_mesh(&mesh).unwrap();
        assert_eq!(work.mark_uv_island_boundaries(), 1);
        assert_eq!(work.split_sharp_edges(), 2);
        assert_eq!(work.vertices.len(), 8);

        // First quad keeps 4 and 1; second quad gets fresh copies
        assert_eq!(&work.loops[0..4], &[3, 4, 1, 0]);
        assert_eq!(&work.loops[4..8], &[6, 5, 2, 7]);
        assert_eq!(work.vertices[6].position, work.vertices[4].position);
        assert_eq!(work.vertices[7].position, work.vertices[1].position);
    }

    #[test]
    fn test_host_sharp_edge_splits() {
        let mut mesh = strip();
        mesh.mark_sharp(4, 1);
        let uvs = vec![[0.0, 0.0]; 8];
        mesh.add_uv_layer("UVMap", uvs);

        let mut work = WorkingMesh::from_mesh(&mesh).unwrap();
        assert_eq!(work.mark_uv_island_boundaries(), 0);
        assert_eq!(work.split_sharp_edges(), 2);
    }

    #[test]
    fn test_split_recomputes_normals() {
        // Two faces folded at 90 degrees along edge 1-2
        let mut mesh = Mesh::new("fold");
        mesh.add_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        mesh.add_vertex([1.0, 0.0, 0.0], [0.7, 0.0, 0.7]);
        mesh.add_vertex([1.0, 1.0, 0.0], [0.7, 0.0, 0.7]);
        mesh.add_vertex([1.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
        mesh.add_polygon(&[0, 1, 2]);
        mesh.add_polygon(&[1, 2, 3]);
        mesh.mark_sharp(1, 2);
        mesh.add_uv_layer("UVMap", vec![[0.0, 0.0]; 6]);

        let mut work = WorkingMesh::from_mesh(&mesh).unwrap();
        assert_eq!(work.split_sharp_edges(), 2);

        let n1 = Vec3::from_array(work.vertices[1].normal);
        let n_split = Vec3::from_array(work.vertices[work.loops[3] as usize].normal);
        assert!((n1 - Vec3::Z).length() < 1e-5);
        assert!((n_split - Vec3::X).length() < 1e-5);
        // Untouched vertex keeps host normal
        assert_eq!(work.vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}

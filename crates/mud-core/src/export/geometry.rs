//! Mesh extraction: seam split, triangulation, per-vertex data, indices and bounds

use crate::axis::CoordinateTransform;
use crate::constants::BOUND_BOX_CORNERS;
use crate::document::DocumentNode;
use crate::scene::{Mesh, MeshVertex};

use super::ExportError;
use super::format::space_separated;
use super::topology::{Triangle, WorkingMesh};

/// Result of extracting one mesh
#[derive(Debug, Clone)]
pub struct ExtractedMesh {
    pub node: DocumentNode,
    /// Vertex count after seam splitting
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// Build the `mesh` node for one mesh object
pub fn build_mesh_node(
    mesh: &Mesh,
    transform: &CoordinateTransform,
) -> Result<ExtractedMesh, ExportError> {
    let mut work = WorkingMesh::from_mesh(mesh)?;

    if work.uvs.is_some() {
        let seams = work.mark_uv_island_boundaries();
        let added = work.split_sharp_edges();
        tracing::debug!(
            "Mesh '{}': {} UV seams marked, {} vertices added by edge split",
            mesh.name,
            seams,
            added
        );
    }

    let triangles = work.triangulate();
    let vertex_count = work.vertices.len();

    let mut node = DocumentNode::named("mesh", &mesh.name);
    node.push_attr("vertexcount", vertex_count.to_string());

    let mut vertex_nodes: Vec<DocumentNode> = work
        .vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| vertex_node(index, vertex, transform))
        .collect();

    match &work.uvs {
        Some(uvs) => {
            let resolved = resolve_vertex_uvs(&triangles, uvs, vertex_count);
            let assigned = resolved.iter().flatten().count();
            if assigned != vertex_count {
                tracing::warn!(
                    "Mesh '{}': {} of {} vertices have UVs",
                    mesh.name,
                    assigned,
                    vertex_count
                );
            }
            for (vertex, uv) in vertex_nodes.iter_mut().zip(resolved) {
                if let Some(uv) = uv {
                    vertex.push_child(DocumentNode::prop("uvcoord", space_separated(&uv)));
                }
            }
        }
        None if mesh.uv_layers.is_empty() => {
            tracing::warn!("Mesh '{}' has no UVs", mesh.name);
        }
        None => {
            tracing::warn!("Mesh '{}' has no active UV layer", mesh.name);
        }
    }

    node.children = vertex_nodes;
    node.push_child(indices_node(&triangles));

    let (max_extent, min_extent) = compute_aabb(&mesh.bound_box);
    node.push_child(
        DocumentNode::new("aabb")
            .with_attr("max_extent", space_separated(&max_extent))
            .with_attr("min_extent", space_separated(&min_extent)),
    );

    Ok(ExtractedMesh {
        node,
        vertex_count,
        triangle_count: triangles.len(),
    })
}

/// `vertex` node with position, normal and, when skinned, bone indices and weights
fn vertex_node(index: usize, vertex: &MeshVertex, transform: &CoordinateTransform) -> DocumentNode {
    let mut node = DocumentNode::new("vertex").with_attr("id", index.to_string());
    node.push_child(DocumentNode::prop(
        "position",
        space_separated(&transform.apply(vertex.position)),
    ));
    node.push_child(DocumentNode::prop(
        "normal",
        space_separated(&transform.apply(vertex.normal)),
    ));

    if !vertex.groups.is_empty() {
        let indices: Vec<String> = vertex.groups.iter().map(|g| g.group.to_string()).collect();
        let weights: Vec<f32> = vertex.groups.iter().map(|g| g.weight).collect();
        node.push_child(DocumentNode::prop("indices", indices.join(" ")));
        node.push_child(DocumentNode::prop("weights", space_separated(&weights)));
    }

    node
}

/// UV of every vertex, walking triangles then corners
///
/// Each corner overwrites the entry of its vertex, so the last corner visited wins.
pub fn resolve_vertex_uvs(
    triangles: &[Triangle],
    uvs: &[[f32; 2]],
    vertex_count: usize,
) -> Vec<Option<[f32; 2]>> {
    let mut resolved = vec![None; vertex_count];
    for triangle in triangles {
        for (&l, &v) in triangle.loops.iter().zip(&triangle.vertices) {
            if let (Some(slot), Some(&uv)) = (resolved.get_mut(v as usize), uvs.get(l)) {
                *slot = Some(uv);
            }
        }
    }
    resolved
}

/// Flat index buffer node: `count` then space-separated `values`
fn indices_node(triangles: &[Triangle]) -> DocumentNode {
    let values: Vec<String> = triangles
        .iter()
        .flat_map(|t| t.vertices)
        .map(|v| v.to_string())
        .collect();

    DocumentNode::new("indices")
        .with_attr("count", (triangles.len() * 3).to_string())
        .with_attr("values", values.join(" "))
}

/// Per-axis extents of the bounding box corners as `(max, min)`
///
/// Both accumulators start at zero rather than at the first corner, so the
/// origin is always inside the reported box: an object lying entirely on the
/// negative side of an axis reports 0.0 as its max there.
pub fn compute_aabb(corners: &[[f32; 3]; BOUND_BOX_CORNERS]) -> ([f32; 3], [f32; 3]) {
    let mut max = [0.0f32; 3];
    let mut min = [0.0f32; 3];

    for corner in corners {
        for axis in 0..3 {
            if corner[axis] > max[axis] {
                max[axis] = corner[axis];
            } else if corner[axis] < min[axis] {
                min[axis] = corner[axis];
            }
        }
    }

    (max, min)
}

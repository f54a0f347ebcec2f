//! Wavefront OBJ loading into scene meshes

use std::io::{BufRead, Cursor};
use std::path::Path;

use glam::Vec3;

use crate::constants::FALLBACK_NORMAL;

use super::mesh::newell_normal;
use super::{Mesh, Scene, SceneError, SceneObject};

/// Load an OBJ file as a scene with one mesh object per OBJ model
pub fn load_obj(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| SceneError::Io(e.to_string()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    load_obj_from_bytes(name, &data)
}

/// Load an OBJ from bytes; `name` is used for unnamed models
pub fn load_obj_from_bytes(name: &str, data: &[u8]) -> Result<Scene, SceneError> {
    let mut cursor = Cursor::new(data);
    load_obj_from_reader(name, &mut cursor)
}

fn load_obj_from_reader(name: &str, reader: &mut impl BufRead) -> Result<Scene, SceneError> {
    // Keep polygons and separate index streams so corners keep their own UVs
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: false,
            single_index: false,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| SceneError::Parse(e.to_string()))?;

    if models.is_empty() {
        return Err(SceneError::EmptyMesh);
    }

    let mut scene = Scene::new();
    for (i, model) in models.iter().enumerate() {
        let mesh_name = if model.name.is_empty() || model.name == "unnamed_object" {
            if models.len() == 1 {
                name.to_string()
            } else {
                format!("{}_{}", name, i)
            }
        } else {
            model.name.clone()
        };
        let mesh = convert_model(mesh_name, &model.mesh)?;
        scene.add(SceneObject::mesh(mesh).with_selected(true));
    }

    Ok(scene)
}

fn convert_model(name: String, src: &tobj::Mesh) -> Result<Mesh, SceneError> {
    let mut mesh = Mesh::new(name);

    for chunk in src.positions.chunks_exact(3) {
        mesh.add_vertex([chunk[0], chunk[1], chunk[2]], [0.0; 3]);
    }
    if mesh.vertices.is_empty() {
        return Err(SceneError::EmptyMesh);
    }

    // Without face arities every face is a triangle
    let arities: Vec<usize> = if src.face_arities.is_empty() {
        vec![3; src.indices.len() / 3]
    } else {
        src.face_arities.iter().map(|&a| a as usize).collect()
    };

    let vertex_count = mesh.vertices.len() as u32;
    let mut start = 0;
    for arity in arities {
        let corners = src
            .indices
            .get(start..start + arity)
            .ok_or_else(|| SceneError::Parse("face indices out of range".into()))?;
        if let Some(&bad) = corners.iter().find(|&&i| i >= vertex_count) {
            return Err(SceneError::Parse(format!("vertex index {} out of range", bad)));
        }
        mesh.add_polygon(corners);
        start += arity;
    }

    let has_uvs = !src.texcoords.is_empty() && src.texcoord_indices.len() == src.indices.len();
    if has_uvs {
        let uvs = src
            .texcoord_indices
            .iter()
            .map(|&t| {
                let t = t as usize * 2;
                match src.texcoords.get(t..t + 2) {
                    Some(uv) => Ok([uv[0], uv[1]]),
                    None => Err(SceneError::Parse(format!("texcoord index {} out of range", t / 2))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        mesh.add_uv_layer("UVMap", uvs);
    }

    let has_normals = !src.normals.is_empty() && src.normal_indices.len() == src.indices.len();
    let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];
    if has_normals {
        for (&v, &n) in src.indices.iter().zip(&src.normal_indices) {
            let n = n as usize * 3;
            if let Some(normal) = src.normals.get(n..n + 3) {
                sums[v as usize] += Vec3::new(normal[0], normal[1], normal[2]);
            }
        }
    } else {
        for polygon in &mesh.polygons {
            let points: Vec<Vec3> = polygon
                .vertices
                .iter()
                .map(|&v| Vec3::from_array(mesh.vertices[v as usize].position))
                .collect();
            let normal = newell_normal(&points);
            for &v in &polygon.vertices {
                sums[v as usize] += normal;
            }
        }
    }
    for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
        vertex.normal = sum
            .try_normalize()
            .map(|n| n.to_array())
            .unwrap_or(FALLBACK_NORMAL);
    }

    mesh.update_bound_box();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectKind;

    const QUAD_OBJ: &str = "\
o Quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    fn first_mesh(scene: &Scene) -> &Mesh {
        match &scene.objects[0].kind {
            ObjectKind::Mesh(mesh) => mesh,
            _ => panic!("expected a mesh object"),
        }
    }

    #[test]
    fn test_load_quad_keeps_polygon() {
        let scene = load_obj_from_bytes("quad", QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(scene.objects.len(), 1);

        let mesh = first_mesh(&scene);
        assert_eq!(mesh.name, "Quad");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.polygons.len(), 1);
        assert_eq!(mesh.polygons[0].vertices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_load_quad_uvs_and_normals() {
        let scene = load_obj_from_bytes("quad", QUAD_OBJ.as_bytes()).unwrap();
        let mesh = first_mesh(&scene);

        let uv = mesh.active_uv().unwrap();
        assert_eq!(uv.uvs.len(), 4);
        assert_eq!(uv.uvs[2], [1.0, 1.0]);

        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-6);
        }
        assert_eq!(mesh.bound_box[6], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_load_without_uvs() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let scene = load_obj_from_bytes("tri", obj.as_bytes()).unwrap();
        let mesh = first_mesh(&scene);
        assert!(mesh.uv_layers.is_empty());
        assert_eq!(mesh.polygons.len(), 1);
    }

    #[test]
    fn test_empty_obj() {
        let result = load_obj_from_bytes("empty", b"# nothing here\n");
        assert!(matches!(result, Err(SceneError::EmptyMesh)));
    }
}

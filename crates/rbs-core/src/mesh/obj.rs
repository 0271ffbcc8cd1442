//! OBJ mesh file loading

use std::collections::HashMap;
use std::io::{BufRead, Cursor};
use std::path::Path;

use glam::DVec3;

use super::{MeshError, MeshUnit, TriangleMesh};

fn load_options() -> tobj::LoadOptions {
    // Positions keep their own index stream so shared corners stay shared
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file (no scaling)
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    load_obj_with_unit(path, MeshUnit::Meters)
}

/// Load an OBJ file with specified unit
pub fn load_obj_with_unit(path: impl AsRef<Path>, unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let (models, _materials) = tobj::load_obj(path.as_ref(), &load_options())
        .map_err(|e| MeshError::Parse(e.to_string()))?;
    combine_models(&models, unit)
}

/// Load an OBJ from bytes with specified unit
pub fn load_obj_from_bytes(data: &[u8], unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let mut cursor = Cursor::new(data);
    load_obj_from_reader(&mut cursor, unit)
}

fn load_obj_from_reader(reader: &mut impl BufRead, unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))
            .map_err(|e| MeshError::Parse(e.to_string()))?;
    combine_models(&models, unit)
}

/// Concatenate every object in the file into one mesh
///
/// `tobj` indexes each object and group on its own, so corners shared across
/// groups are welded back together by exact position.
fn combine_models(models: &[tobj::Model], unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let scale = unit.scale_factor();

    let mut vertices: Vec<DVec3> = Vec::new();
    let mut welded: HashMap<[u32; 3], u32> = HashMap::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();

    for model in models {
        let mesh = &model.mesh;

        let remap: Vec<u32> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| {
                let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
                *welded.entry(key).or_insert_with(|| {
                    vertices.push(DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64) * scale);
                    (vertices.len() - 1) as u32
                })
            })
            .collect();

        for tri in mesh.indices.chunks_exact(3) {
            let corner = |i: u32| {
                remap.get(i as usize).copied().ok_or(MeshError::InvalidIndex {
                    face: [tri[0], tri[1], tri[2]],
                    vertex_count: remap.len(),
                })
            };
            faces.push([corner(tri[0])?, corner(tri[1])?, corner(tri[2])?]);
        }
    }

    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    TriangleMesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_PYRAMID: &str = "o pyramid
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.5 0.5 1
f 1 4 3 2
f 1 2 5
f 2 3 5
f 3 4 5
f 4 1 5
";

    #[test]
    fn test_quads_are_triangulated() {
        let mesh = load_obj_from_bytes(QUAD_PYRAMID.as_bytes(), MeshUnit::Meters).unwrap();
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_multiple_objects_are_combined() {
        let data = "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n";
        let mesh = load_obj_from_bytes(data.as_bytes(), MeshUnit::Centimeters).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert!((mesh.vertices[3].z - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_grouped_cube_is_welded() {
        let data = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 0 1\nv 1 0 1\nv 1 1 1\nv 0 1 1
g bottom_and_sides
f 1 4 3 2
f 1 2 6 5
f 2 3 7 6
g top_and_rest
f 5 6 7 8
f 3 4 8 7
f 4 1 5 8
";
        let mesh = load_obj_from_bytes(data.as_bytes(), MeshUnit::Meters).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(crate::mesh::check_closed_manifold(&mesh), Ok(()));

        let props = crate::inertia::compute_mass_properties(&mesh, 1.0).unwrap();
        assert!((props.volume - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_obj_without_faces_is_empty() {
        let result = load_obj_from_bytes(b"v 0 0 0\nv 1 0 0\n", MeshUnit::Meters);
        assert_eq!(result, Err(MeshError::EmptyMesh));
    }
}

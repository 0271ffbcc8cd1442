//! STL mesh file loading and saving

use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use glam::DVec3;

use super::{MeshError, MeshUnit, TriangleMesh};

/// Load an STL file (no scaling)
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    load_stl_with_unit(path, MeshUnit::Meters)
}

/// Load an STL file with specified unit
pub fn load_stl_with_unit(path: impl AsRef<Path>, unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    load_stl_from_reader(&mut reader, unit)
}

/// Load an STL from bytes with specified unit
pub fn load_stl_from_bytes(data: &[u8], unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let mut cursor = Cursor::new(data);
    load_stl_from_reader(&mut cursor, unit)
}

fn load_stl_from_reader(
    reader: &mut (impl Read + Seek),
    unit: MeshUnit,
) -> Result<TriangleMesh, MeshError> {
    let stl = stl_io::read_stl(reader).map_err(|e| MeshError::Parse(e.to_string()))?;

    if stl.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let scale = unit.scale_factor();
    let vertices = stl
        .vertices
        .iter()
        .map(|v| DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64) * scale)
        .collect();

    let mut faces = Vec::with_capacity(stl.faces.len());
    let mut normals = Vec::with_capacity(stl.faces.len());
    for face in &stl.faces {
        let [a, b, c] = face.vertices;
        faces.push([a as u32, b as u32, c as u32]);
        normals.push(DVec3::new(
            face.normal[0] as f64,
            face.normal[1] as f64,
            face.normal[2] as f64,
        ));
    }

    Ok(TriangleMesh::new(vertices, faces)?.with_normals(normals))
}

/// Save a mesh as a binary STL file
pub fn save_stl(mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|[v0, v1, v2]| {
            let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            stl_io::Triangle {
                normal: stl_io::Normal::new(normal.as_vec3().to_array()),
                vertices: [
                    stl_io::Vertex::new(v0.as_vec3().to_array()),
                    stl_io::Vertex::new(v1.as_vec3().to_array()),
                    stl_io::Vertex::new(v2.as_vec3().to_array()),
                ],
            }
        })
        .collect();

    let mut file = std::fs::File::create(path.as_ref()).map_err(|e| MeshError::Io(e.to_string()))?;
    stl_io::write_stl(&mut file, triangles.iter()).map_err(|e| MeshError::Io(e.to_string()))?;

    Ok(())
}

//! Closed-manifold checks for triangle meshes

use std::collections::HashMap;

use super::{MeshError, TriangleMesh};

/// Verify that a mesh is closed, edge-manifold and consistently wound
///
/// Every directed edge must occur exactly once and its reverse exactly once.
/// Degenerate faces (a repeated corner index) are rejected as well.
pub fn check_closed_manifold(mesh: &TriangleMesh) -> Result<(), MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut directed: HashMap<(u32, u32), usize> = HashMap::with_capacity(mesh.faces.len() * 3);

    for (index, &[a, b, c]) in mesh.faces.iter().enumerate() {
        if a == b || b == c || a == c {
            return Err(MeshError::NotManifold(format!(
                "face {} repeats a vertex: [{}, {}, {}]",
                index, a, b, c
            )));
        }
        for edge in [(a, b), (b, c), (c, a)] {
            *directed.entry(edge).or_default() += 1;
        }
    }

    let mut edges: Vec<_> = directed.iter().collect();
    edges.sort_unstable();

    for (&(from, to), &count) in edges {
        if count > 1 {
            return Err(MeshError::NotManifold(format!(
                "edge {} -> {} is used by {} faces with the same orientation",
                from, to, count
            )));
        }
        match directed.get(&(to, from)) {
            Some(1) => {}
            Some(_) => {
                return Err(MeshError::NotManifold(format!(
                    "edge {} -> {} is shared by more than two faces",
                    from, to
                )));
            }
            None => {
                return Err(MeshError::NotManifold(format!(
                    "edge {} -> {} is a boundary edge",
                    from, to
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{generate_box_mesh, generate_sphere_mesh_with_segments};

    #[test]
    fn test_closed_solids_pass() {
        assert!(check_closed_manifold(&generate_box_mesh([1.0, 2.0, 3.0])).is_ok());
        assert!(check_closed_manifold(&generate_sphere_mesh_with_segments(1.0, 6, 10)).is_ok());
    }

    #[test]
    fn test_flipped_solid_still_passes() {
        // Consistent inward winding is still a closed manifold
        assert!(check_closed_manifold(&generate_box_mesh([1.0, 1.0, 1.0]).flipped()).is_ok());
    }

    #[test]
    fn test_open_mesh_fails() {
        let mut mesh = generate_box_mesh([1.0, 1.0, 1.0]);
        mesh.faces.pop();
        let err = check_closed_manifold(&mesh).unwrap_err();
        assert!(matches!(err, MeshError::NotManifold(msg) if msg.contains("boundary")));
    }

    #[test]
    fn test_inconsistent_winding_fails() {
        let mut mesh = generate_box_mesh([1.0, 1.0, 1.0]);
        let [a, b, c] = mesh.faces[0];
        mesh.faces[0] = [a, c, b];
        let err = check_closed_manifold(&mesh).unwrap_err();
        assert!(matches!(err, MeshError::NotManifold(_)));
    }

    #[test]
    fn test_degenerate_face_fails() {
        let mut mesh = generate_box_mesh([1.0, 1.0, 1.0]);
        mesh.faces.push([0, 0, 1]);
        assert!(matches!(
            check_closed_manifold(&mesh),
            Err(MeshError::NotManifold(_))
        ));
    }

    #[test]
    fn test_empty_mesh_fails() {
        assert_eq!(
            check_closed_manifold(&TriangleMesh::default()),
            Err(MeshError::EmptyMesh)
        );
    }
}

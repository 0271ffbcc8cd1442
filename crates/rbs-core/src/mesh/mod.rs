//! Triangle mesh loading (STL, OBJ formats)

mod obj;
mod primitive;
mod stl;
mod validate;

use std::path::Path;

use glam::DVec3;

pub use obj::{load_obj, load_obj_from_bytes, load_obj_with_unit};
pub use primitive::{generate_box_mesh, generate_sphere_mesh, generate_sphere_mesh_with_segments};
pub use stl::{load_stl, load_stl_from_bytes, load_stl_with_unit, save_stl};
pub use validate::check_closed_manifold;

/// Closed triangulated surface, read-only once loaded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    /// Vertex positions in the mesh's native frame
    pub vertices: Vec<DVec3>,
    /// Triangles as vertex index triples
    pub faces: Vec<[u32; 3]>,
    /// Per-face normals, when the source file carries them
    pub normals: Option<Vec<DVec3>>,
}

impl TriangleMesh {
    /// Create a mesh, checking that every face references an existing vertex
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let mesh = Self {
            vertices,
            faces,
            normals: None,
        };
        mesh.check_indices()?;
        Ok(mesh)
    }

    /// Check that every face references an existing vertex
    pub fn check_indices(&self) -> Result<(), MeshError> {
        let count = self.vertices.len();
        match self
            .faces
            .iter()
            .find(|face| face.iter().any(|&i| i as usize >= count))
        {
            Some(face) => Err(MeshError::InvalidIndex {
                face: *face,
                vertex_count: count,
            }),
            None => Ok(()),
        }
    }

    /// Attach per-face normals
    pub fn with_normals(mut self, normals: Vec<DVec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate over triangle corner positions
    ///
    /// Panics on an out-of-range index; call [`Self::check_indices`] first on
    /// a mesh assembled field by field.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.faces.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    /// Same surface with every face's winding reversed
    pub fn flipped(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            faces: self.faces.iter().map(|&[a, b, c]| [a, c, b]).collect(),
            normals: self
                .normals
                .as_ref()
                .map(|normals| normals.iter().map(|n| -*n).collect()),
        }
    }

    /// Same surface moved by `offset`
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v + offset).collect(),
            faces: self.faces.clone(),
            normals: self.normals.clone(),
        }
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

/// Length unit of a mesh file, applied as a scale when loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshUnit {
    /// Meters (no scaling)
    #[default]
    Meters,
    /// Millimeters (scale by 0.001)
    Millimeters,
    /// Centimeters (scale by 0.01)
    Centimeters,
    /// Inches (scale by 0.0254)
    Inches,
}

impl MeshUnit {
    pub fn scale_factor(&self) -> f64 {
        match self {
            MeshUnit::Meters => 1.0,
            MeshUnit::Millimeters => 0.001,
            MeshUnit::Centimeters => 0.01,
            MeshUnit::Inches => 0.0254,
        }
    }

    /// Parse a short unit name such as `m`, `mm`, `cm` or `in`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "m" | "meters" => Some(MeshUnit::Meters),
            "mm" | "millimeters" => Some(MeshUnit::Millimeters),
            "cm" | "centimeters" => Some(MeshUnit::Centimeters),
            "in" | "inches" => Some(MeshUnit::Inches),
            _ => None,
        }
    }
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Dae,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            Some("dae") => MeshFormat::Dae,
            _ => MeshFormat::Unknown,
        }
    }

    /// Whether mass properties can be computed from this format
    pub fn is_supported(&self) -> bool {
        matches!(self, MeshFormat::Stl | MeshFormat::Obj)
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::Dae => "DAE (COLLADA)",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// Load any supported mesh format
pub fn load_mesh(path: impl AsRef<Path>, unit: MeshUnit) -> Result<TriangleMesh, MeshError> {
    let path = path.as_ref();

    let mesh = match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl_with_unit(path, unit)?,
        MeshFormat::Obj => load_obj_with_unit(path, unit)?,
        MeshFormat::Dae => {
            return Err(MeshError::UnsupportedFormat(
                "DAE (COLLADA) meshes are visual only".to_string(),
            ));
        }
        MeshFormat::Unknown => {
            return Err(MeshError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            ));
        }
    };

    tracing::debug!(
        "Loaded {} mesh {:?}: {} vertices, {} faces",
        MeshFormat::from_path(path).name(),
        path,
        mesh.vertices.len(),
        mesh.faces.len()
    );

    Ok(mesh)
}

/// Mesh-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Face {face:?} references a vertex outside 0..{vertex_count}")]
    InvalidIndex { face: [u32; 3], vertex_count: usize },
    #[error("Density must be finite and positive, got {0}")]
    InvalidDensity(f64),
    #[error("Mesh encloses zero volume")]
    DegenerateVolume,
    #[error("Mesh is not a closed manifold: {0}")]
    NotManifold(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range_index() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let result = TriangleMesh::new(vertices, vec![[0, 1, 3]]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidIndex { vertex_count: 3, .. })
        ));
    }

    #[test]
    fn test_check_indices_on_assembled_mesh() {
        let mesh = TriangleMesh {
            vertices: vec![DVec3::ZERO],
            faces: vec![[0, 1, 2]],
            normals: None,
        };
        assert_eq!(
            mesh.check_indices(),
            Err(MeshError::InvalidIndex {
                face: [0, 1, 2],
                vertex_count: 1,
            })
        );
        assert_eq!(generate_box_mesh([1.0, 1.0, 1.0]).check_indices(), Ok(()));
    }

    #[test]
    fn test_flipped_reverses_winding() {
        let mesh = TriangleMesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]])
            .unwrap()
            .with_normals(vec![DVec3::Z]);
        let flipped = mesh.flipped();
        assert_eq!(flipped.faces, vec![[0, 2, 1]]);
        assert_eq!(flipped.normals, Some(vec![-DVec3::Z]));
    }

    #[test]
    fn test_bounding_box() {
        let mesh = generate_box_mesh([2.0, 4.0, 6.0]);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(TriangleMesh::default().bounding_box(), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.STL")), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path(Path::new("b.obj")), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("b.dae")), MeshFormat::Dae);
        assert_eq!(MeshFormat::from_path(Path::new("b")), MeshFormat::Unknown);
        assert!(!MeshFormat::Dae.is_supported());
    }

    #[test]
    fn test_load_mesh_rejects_visual_only_formats() {
        let result = load_mesh("visual.dae", MeshUnit::Meters);
        assert!(matches!(result, Err(MeshError::UnsupportedFormat(_))));
        let result = load_mesh("notes.txt", MeshUnit::Meters);
        assert_eq!(result, Err(MeshError::UnsupportedFormat("txt".to_string())));
    }

    #[test]
    fn test_load_mesh_missing_file() {
        let result = load_mesh("/nonexistent/collision.stl", MeshUnit::Meters);
        assert!(matches!(result, Err(MeshError::Io(_))));
    }

    #[test]
    fn test_unit_names() {
        assert_eq!(MeshUnit::from_name("MM"), Some(MeshUnit::Millimeters));
        assert_eq!(MeshUnit::from_name("parsec"), None);
        assert_eq!(MeshUnit::default().scale_factor(), 1.0);
    }
}

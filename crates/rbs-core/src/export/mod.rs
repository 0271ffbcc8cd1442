//! URDF/SDF description and manifest emission
//!
//! Every function here returns text only; choosing file names and writing to
//! disk is left to the caller. Output is deterministic for identical input.

mod manifest;
mod sdf;
mod urdf;
mod xml;

use std::fmt;
use std::path::Path;

use glam::DVec3;

use crate::inertia::MassProperties;

pub use manifest::{Author, ModelManifest, render_manifest};
pub use xml::{format_float, format_vec3, xml_escape};

pub(crate) use sdf::{write_sdf_collision, write_sdf_inertial, write_sdf_visual};
pub(crate) use xml::push_line;

/// Robot description dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptionFormat {
    Urdf,
    Sdf,
}

impl DescriptionFormat {
    pub const ALL: &'static [DescriptionFormat] = &[DescriptionFormat::Urdf, DescriptionFormat::Sdf];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            DescriptionFormat::Urdf => "urdf",
            DescriptionFormat::Sdf => "sdf",
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
    }

    /// Parse a format name (`urdf` or `sdf`, case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "urdf" => Some(DescriptionFormat::Urdf),
            "sdf" => Some(DescriptionFormat::Sdf),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DescriptionFormat::Urdf => "URDF",
            DescriptionFormat::Sdf => "SDF",
        }
    }
}

impl fmt::Display for DescriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a mesh attached to a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Visual,
    Collision,
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshKind::Visual => f.write_str("visual"),
            MeshKind::Collision => f.write_str("collision"),
        }
    }
}

/// Visual and collision mesh references, relative to the model directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPair {
    pub visual: String,
    pub collision: String,
}

impl MeshPair {
    pub fn new(visual: impl Into<String>, collision: impl Into<String>) -> Self {
        Self {
            visual: visual.into(),
            collision: collision.into(),
        }
    }

    fn validate(&self) -> Result<(), EmitError> {
        for (kind, reference) in [
            (MeshKind::Visual, &self.visual),
            (MeshKind::Collision, &self.collision),
        ] {
            if reference.trim().is_empty() {
                return Err(EmitError::MissingMesh(kind));
            }
            if Path::new(reference).is_absolute() {
                return Err(EmitError::AbsoluteMeshPath(reference.clone()));
            }
        }
        Ok(())
    }
}

/// Position and roll-pitch-yaw orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub xyz: DVec3,
    pub rpy: DVec3,
}

impl Pose {
    pub fn from_translation(xyz: DVec3) -> Self {
        Self {
            xyz,
            rpy: DVec3::ZERO,
        }
    }
}

/// Geometry of a visual or collision element
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Mesh { uri: String, scale: DVec3 },
    Box { size: DVec3 },
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
}

impl Geometry {
    /// Unscaled mesh geometry
    pub fn mesh(uri: impl Into<String>) -> Self {
        Geometry::Mesh {
            uri: uri.into(),
            scale: DVec3::ONE,
        }
    }
}

/// Render the `<inertial>` element for the given format
///
/// The fragment starts at column zero and ends with a newline.
pub fn render_inertial_block(format: DescriptionFormat, properties: &MassProperties) -> String {
    let mut out = String::new();
    let pose = Pose::from_translation(properties.center_of_mass);
    match format {
        DescriptionFormat::Urdf => {
            urdf::write_urdf_inertial(&mut out, 0, properties.mass, &pose, &properties.inertia)
        }
        DescriptionFormat::Sdf => {
            write_sdf_inertial(&mut out, 0, properties.mass, &pose, &properties.inertia)
        }
    }
    out
}

/// Render a complete single-link description
///
/// The link is named `body` and carries the inertial block plus one visual
/// and one collision mesh.
pub fn render_description(
    format: DescriptionFormat,
    model_name: &str,
    properties: &MassProperties,
    meshes: &MeshPair,
) -> Result<String, EmitError> {
    if model_name.trim().is_empty() {
        return Err(EmitError::EmptyModelName);
    }
    meshes.validate()?;

    Ok(match format {
        DescriptionFormat::Urdf => urdf::generate_urdf_string(model_name, properties, meshes),
        DescriptionFormat::Sdf => sdf::generate_sdf_string(model_name, properties, meshes),
    })
}

/// Emission errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("Model name must not be empty")]
    EmptyModelName,
    #[error("No {0} mesh reference given")]
    MissingMesh(MeshKind),
    #[error("Mesh reference must be relative to the model directory: {0}")]
    AbsoluteMeshPath(String),
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::inertia::{InertiaMatrix, compute_mass_properties};
    use crate::mesh::generate_box_mesh;

    fn unit_cube() -> MassProperties {
        compute_mass_properties(&generate_box_mesh([1.0, 1.0, 1.0]), 1.0).unwrap()
    }

    fn sample_properties() -> MassProperties {
        MassProperties {
            volume: 0.002,
            mass: 2.1,
            center_of_mass: DVec3::new(0.01, -0.02, 0.125),
            inertia: InertiaMatrix {
                ixx: 0.0031,
                ixy: -1.5e-5,
                ixz: 2.25e-6,
                iyy: 0.0042,
                iyz: 7.0e-7,
                izz: 0.0027,
            },
        }
    }

    /// Pull the text of every `<tag>...</tag>` occurrence, in order
    fn element_texts<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let mut found = Vec::new();
        let mut rest = xml;
        while let Some(start) = rest.find(&open) {
            let after = &rest[start + open.len()..];
            let end = after.find(&close).unwrap();
            found.push(&after[..end]);
            rest = &after[end + close.len()..];
        }
        found
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DescriptionFormat::from_name("SDF"), Some(DescriptionFormat::Sdf));
        assert_eq!(
            DescriptionFormat::from_path(Path::new("models/arm/model.urdf")),
            Some(DescriptionFormat::Urdf)
        );
        assert_eq!(DescriptionFormat::from_path(Path::new("model.xml")), None);
        assert_eq!(DescriptionFormat::Sdf.extension(), "sdf");
        assert_eq!(DescriptionFormat::Urdf.to_string(), "URDF");
    }

    #[test]
    fn test_inertial_block_is_pure() {
        let props = sample_properties();
        for &format in DescriptionFormat::ALL {
            assert_eq!(
                render_inertial_block(format, &props),
                render_inertial_block(format, &props)
            );
        }
    }

    #[test]
    fn test_urdf_inertial_block() {
        let block = render_inertial_block(DescriptionFormat::Urdf, &unit_cube());
        assert!(block.starts_with("<inertial>\n"));
        assert!(block.contains("<mass value=\"1.0\"/>"));
        assert!(block.contains("<origin xyz=\"0.0 0.0 0.0\" rpy=\"0.0 0.0 0.0\"/>"));
        assert!(block.ends_with("</inertial>\n"));
    }

    #[test]
    fn test_sdf_inertial_block_round_trip() {
        let props = sample_properties();
        let block = render_inertial_block(DescriptionFormat::Sdf, &props);

        assert_eq!(element_texts(&block, "pose"), vec!["0.01 -0.02 0.125 0.0 0.0 0.0"]);
        assert_eq!(element_texts(&block, "mass"), vec!["2.1"]);

        let components: Vec<f64> = ["ixx", "ixy", "ixz", "iyy", "iyz", "izz"]
            .iter()
            .map(|tag| element_texts(&block, tag)[0].parse().unwrap())
            .collect();
        assert_eq!(components, props.inertia.to_array().to_vec());
    }

    #[test]
    fn test_urdf_description_round_trip() {
        let props = sample_properties();
        let meshes = MeshPair::new("meshes/visual/part.dae", "meshes/collision/part.stl");
        let urdf = render_description(DescriptionFormat::Urdf, "part", &props, &meshes).unwrap();

        let robot = urdf_rs::read_from_string(&urdf).unwrap();
        assert_eq!(robot.name, "part");
        assert_eq!(robot.links.len(), 1);

        let link = &robot.links[0];
        assert_eq!(link.name, "body");
        assert_relative_eq!(link.inertial.mass.value, props.mass);
        assert_eq!(InertiaMatrix::from(&link.inertial.inertia), props.inertia);
        assert_eq!(link.inertial.origin.xyz.0, props.center_of_mass.to_array());

        match &link.visual[0].geometry {
            urdf_rs::Geometry::Mesh { filename, .. } => assert_eq!(filename, "meshes/visual/part.dae"),
            other => panic!("unexpected visual geometry {:?}", other),
        }
        match &link.collision[0].geometry {
            urdf_rs::Geometry::Mesh { filename, .. } => {
                assert_eq!(filename, "meshes/collision/part.stl")
            }
            other => panic!("unexpected collision geometry {:?}", other),
        }
    }

    #[test]
    fn test_sdf_description_structure() {
        let meshes = MeshPair::new("meshes/part.dae", "meshes/part.stl");
        let sdf =
            render_description(DescriptionFormat::Sdf, "part", &sample_properties(), &meshes).unwrap();

        assert!(sdf.starts_with("<?xml version=\"1.0\"?>\n<sdf version=\"1.7\">\n"));
        assert!(sdf.contains("<model name=\"part\">"));
        assert!(sdf.contains("<link name=\"body\">"));
        assert!(sdf.contains("<visual name=\"visual\">"));
        assert!(sdf.contains("<collision name=\"collision\">"));
        assert_eq!(element_texts(&sdf, "uri"), vec!["meshes/part.dae", "meshes/part.stl"]);
        assert!(sdf.trim_end().ends_with("</sdf>"));
    }

    #[test]
    fn test_unit_cube_description() {
        let meshes = MeshPair::new("meshes/unit_cube.dae", "meshes/unit_cube.stl");
        let urdf =
            render_description(DescriptionFormat::Urdf, "unit_cube", &unit_cube(), &meshes).unwrap();

        assert!(urdf.contains("<robot name=\"unit_cube\">"));
        assert!(urdf.contains("<mass value=\"1.0\"/>"));

        let robot = urdf_rs::read_from_string(&urdf).unwrap();
        let inertia = &robot.links[0].inertial.inertia;
        assert_relative_eq!(inertia.ixx, 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(inertia.iyy, 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(inertia.izz, 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_description_is_deterministic() {
        let meshes = MeshPair::new("a.dae", "a.stl");
        let props = sample_properties();
        for &format in DescriptionFormat::ALL {
            let first = render_description(format, "a", &props, &meshes).unwrap();
            let second = render_description(format, "a", &props, &meshes).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_description_escapes_names() {
        let meshes = MeshPair::new("m&m.dae", "m&m.stl");
        let urdf =
            render_description(DescriptionFormat::Urdf, "a<b>", &sample_properties(), &meshes)
                .unwrap();
        assert!(urdf.contains("<robot name=\"a&lt;b&gt;\">"));
        assert!(urdf.contains("filename=\"m&amp;m.dae\""));
    }

    #[test]
    fn test_description_rejects_bad_references() {
        let props = sample_properties();
        assert_eq!(
            render_description(DescriptionFormat::Urdf, "a", &props, &MeshPair::new("a.dae", "")),
            Err(EmitError::MissingMesh(MeshKind::Collision))
        );
        assert_eq!(
            render_description(
                DescriptionFormat::Sdf,
                "a",
                &props,
                &MeshPair::new("/abs/a.dae", "a.stl")
            ),
            Err(EmitError::AbsoluteMeshPath("/abs/a.dae".to_string()))
        );
        assert_eq!(
            render_description(DescriptionFormat::Urdf, " ", &props, &MeshPair::new("a", "b")),
            Err(EmitError::EmptyModelName)
        );
    }
}

//! URDF reading
//!
//! Parses URDF text with `urdf-rs` and converts the parts this crate cares
//! about into its own types.

use glam::DVec3;

use crate::export::{Geometry, Pose};
use crate::inertia::InertiaMatrix;

/// Inertial data of one link as read from a description
#[derive(Debug, Clone, PartialEq)]
pub struct InertialBlock {
    pub link: String,
    pub mass: f64,
    pub origin: Pose,
    pub inertia: InertiaMatrix,
}

impl InertialBlock {
    /// Centre of mass in the link frame
    pub fn center_of_mass(&self) -> DVec3 {
        self.origin.xyz
    }
}

impl From<&urdf_rs::Pose> for Pose {
    fn from(urdf_pose: &urdf_rs::Pose) -> Self {
        Self {
            xyz: DVec3::from_array(urdf_pose.xyz.0),
            rpy: DVec3::from_array(urdf_pose.rpy.0),
        }
    }
}

impl TryFrom<&urdf_rs::Geometry> for Geometry {
    type Error = ImportError;

    fn try_from(geometry: &urdf_rs::Geometry) -> Result<Self, Self::Error> {
        match geometry {
            urdf_rs::Geometry::Box { size } => Ok(Geometry::Box {
                size: DVec3::from_array(size.0),
            }),
            urdf_rs::Geometry::Cylinder { radius, length } => Ok(Geometry::Cylinder {
                radius: *radius,
                length: *length,
            }),
            urdf_rs::Geometry::Sphere { radius } => Ok(Geometry::Sphere { radius: *radius }),
            urdf_rs::Geometry::Mesh { filename, scale } => Ok(Geometry::Mesh {
                uri: filename.clone(),
                scale: scale
                    .as_ref()
                    .map(|s| DVec3::from_array(s.0))
                    .unwrap_or(DVec3::ONE),
            }),
            // Capsules have no SDF 1.7 counterpart
            urdf_rs::Geometry::Capsule { .. } => {
                Err(ImportError::UnsupportedGeometry("capsule".to_string()))
            }
        }
    }
}

/// Parse URDF text
pub fn read_urdf(urdf: &str) -> Result<urdf_rs::Robot, ImportError> {
    urdf_rs::read_from_string(urdf).map_err(|e| ImportError::Parse(e.to_string()))
}

/// Read the inertial block of the first link of a URDF document
pub fn read_urdf_inertial(urdf: &str) -> Result<InertialBlock, ImportError> {
    let robot = read_urdf(urdf)?;
    let link = robot.links.first().ok_or(ImportError::NoLinks)?;
    Ok(inertial_of(link))
}

/// Read the inertial block of a named link of a URDF document
pub fn read_urdf_link_inertial(urdf: &str, link_name: &str) -> Result<InertialBlock, ImportError> {
    let robot = read_urdf(urdf)?;
    let link = robot
        .links
        .iter()
        .find(|link| link.name == link_name)
        .ok_or_else(|| ImportError::LinkNotFound(link_name.to_string()))?;
    Ok(inertial_of(link))
}

fn inertial_of(link: &urdf_rs::Link) -> InertialBlock {
    InertialBlock {
        link: link.name.clone(),
        mass: link.inertial.mass.value,
        origin: Pose::from(&link.inertial.origin),
        inertia: InertiaMatrix::from(&link.inertial.inertia),
    }
}

/// Import-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to parse URDF: {0}")]
    Parse(String),
    #[error("Description contains no links")]
    NoLinks,
    #[error("Link not found: {0}")]
    LinkNotFound(String),
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{DescriptionFormat, MeshPair, render_description};
    use crate::inertia::compute_mass_properties;
    use crate::mesh::generate_box_mesh;

    const TWO_LINKS: &str = r#"<?xml version="1.0"?>
<robot name="arm">
  <link name="base">
    <inertial>
      <origin xyz="0 0 0.05" rpy="0 0 0"/>
      <mass value="3.5"/>
      <inertia ixx="0.01" ixy="0" ixz="0" iyy="0.02" iyz="0" izz="0.03"/>
    </inertial>
  </link>
  <link name="tip">
    <inertial>
      <mass value="0.2"/>
      <inertia ixx="1e-4" ixy="-2e-6" ixz="0" iyy="1e-4" iyz="0" izz="5e-5"/>
    </inertial>
  </link>
</robot>
"#;

    #[test]
    fn test_read_first_link() {
        let block = read_urdf_inertial(TWO_LINKS).unwrap();
        assert_eq!(block.link, "base");
        assert_eq!(block.mass, 3.5);
        assert_eq!(block.center_of_mass(), DVec3::new(0.0, 0.0, 0.05));
        assert_eq!(block.inertia.iyy, 0.02);
    }

    #[test]
    fn test_read_named_link() {
        let block = read_urdf_link_inertial(TWO_LINKS, "tip").unwrap();
        assert_eq!(block.mass, 0.2);
        assert_eq!(block.inertia.ixy, -2e-6);
        assert_eq!(
            read_urdf_link_inertial(TWO_LINKS, "elbow"),
            Err(ImportError::LinkNotFound("elbow".to_string()))
        );
    }

    #[test]
    fn test_generated_description_round_trip() {
        let cube = generate_box_mesh([0.2, 0.1, 0.05]).translated(DVec3::new(0.0, 0.0, 0.025));
        let props = compute_mass_properties(&cube, 1050.0).unwrap();
        let urdf = render_description(
            DescriptionFormat::Urdf,
            "block",
            &props,
            &MeshPair::new("block.dae", "block.stl"),
        )
        .unwrap();

        let block = read_urdf_inertial(&urdf).unwrap();
        assert_eq!(block.mass, props.mass);
        assert_eq!(block.center_of_mass(), props.center_of_mass);
        assert_eq!(block.inertia, props.inertia);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            read_urdf_inertial("<robot"),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_geometry_conversion() {
        let mesh = urdf_rs::Geometry::Mesh {
            filename: "meshes/a.stl".to_string(),
            scale: None,
        };
        assert_eq!(
            Geometry::try_from(&mesh),
            Ok(Geometry::mesh("meshes/a.stl"))
        );
        let capsule = urdf_rs::Geometry::Capsule {
            radius: 0.1,
            length: 0.5,
        };
        assert_eq!(
            Geometry::try_from(&capsule),
            Err(ImportError::UnsupportedGeometry("capsule".to_string()))
        );
    }
}

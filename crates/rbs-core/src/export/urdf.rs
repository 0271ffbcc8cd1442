//! URDF document generation

use crate::constants::BODY_LINK_NAME;
use crate::inertia::{InertiaMatrix, MassProperties};

use super::xml::{format_float, format_vec3, push_line, xml_escape};
use super::{Geometry, MeshPair, Pose};

/// Generate a single-link URDF document
pub fn generate_urdf_string(model_name: &str, properties: &MassProperties, meshes: &MeshPair) -> String {
    let mut urdf = String::new();
    urdf.push_str("<?xml version=\"1.0\"?>\n");
    push_line(
        &mut urdf,
        0,
        &format!("<robot name=\"{}\">", xml_escape(model_name)),
    );
    push_line(
        &mut urdf,
        2,
        &format!("<link name=\"{}\">", xml_escape(BODY_LINK_NAME)),
    );

    let inertial_origin = Pose::from_translation(properties.center_of_mass);
    write_urdf_inertial(&mut urdf, 4, properties.mass, &inertial_origin, &properties.inertia);
    write_urdf_element(&mut urdf, 4, "visual", &Geometry::mesh(&meshes.visual));
    write_urdf_element(&mut urdf, 4, "collision", &Geometry::mesh(&meshes.collision));

    push_line(&mut urdf, 2, "</link>");
    push_line(&mut urdf, 0, "</robot>");
    urdf
}

pub fn write_urdf_inertial(
    urdf: &mut String,
    indent: usize,
    mass: f64,
    origin: &Pose,
    inertia: &InertiaMatrix,
) {
    push_line(urdf, indent, "<inertial>");
    write_urdf_origin(urdf, indent + 2, origin);
    push_line(
        urdf,
        indent + 2,
        &format!("<mass value=\"{}\"/>", format_float(mass)),
    );
    push_line(
        urdf,
        indent + 2,
        &format!(
            "<inertia ixx=\"{}\" ixy=\"{}\" ixz=\"{}\" iyy=\"{}\" iyz=\"{}\" izz=\"{}\"/>",
            format_float(inertia.ixx),
            format_float(inertia.ixy),
            format_float(inertia.ixz),
            format_float(inertia.iyy),
            format_float(inertia.iyz),
            format_float(inertia.izz)
        ),
    );
    push_line(urdf, indent, "</inertial>");
}

pub fn write_urdf_origin(urdf: &mut String, indent: usize, origin: &Pose) {
    push_line(
        urdf,
        indent,
        &format!(
            "<origin xyz=\"{}\" rpy=\"{}\"/>",
            format_vec3(origin.xyz),
            format_vec3(origin.rpy)
        ),
    );
}

/// Write a `<visual>` or `<collision>` element with a zero origin
fn write_urdf_element(urdf: &mut String, indent: usize, tag: &str, geometry: &Geometry) {
    push_line(urdf, indent, &format!("<{tag}>"));
    write_urdf_origin(urdf, indent + 2, &Pose::default());
    push_line(urdf, indent + 2, "<geometry>");
    push_line(urdf, indent + 4, &geometry.to_urdf_xml());
    push_line(urdf, indent + 2, "</geometry>");
    push_line(urdf, indent, &format!("</{tag}>"));
}

impl Geometry {
    /// Single-line URDF geometry element
    pub fn to_urdf_xml(&self) -> String {
        match self {
            Geometry::Mesh { uri, scale } => format!(
                "<mesh filename=\"{}\" scale=\"{}\"/>",
                xml_escape(uri),
                format_vec3(*scale)
            ),
            Geometry::Box { size } => format!("<box size=\"{}\"/>", format_vec3(*size)),
            Geometry::Cylinder { radius, length } => format!(
                "<cylinder radius=\"{}\" length=\"{}\"/>",
                format_float(*radius),
                format_float(*length)
            ),
            Geometry::Sphere { radius } => {
                format!("<sphere radius=\"{}\"/>", format_float(*radius))
            }
        }
    }
}

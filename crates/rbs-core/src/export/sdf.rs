//! SDF document generation

use crate::constants::{BODY_LINK_NAME, SDF_VERSION};
use crate::inertia::{InertiaMatrix, MassProperties};

use super::xml::{format_float, format_vec3, push_element, push_line, xml_escape};
use super::{Geometry, MeshPair, Pose};

/// Generate a single-link SDF document
pub fn generate_sdf_string(model_name: &str, properties: &MassProperties, meshes: &MeshPair) -> String {
    let mut sdf = String::new();
    sdf.push_str("<?xml version=\"1.0\"?>\n");
    push_line(&mut sdf, 0, &format!("<sdf version=\"{}\">", SDF_VERSION));
    push_line(
        &mut sdf,
        2,
        &format!("<model name=\"{}\">", xml_escape(model_name)),
    );
    push_line(
        &mut sdf,
        4,
        &format!("<link name=\"{}\">", xml_escape(BODY_LINK_NAME)),
    );

    let inertial_pose = Pose::from_translation(properties.center_of_mass);
    write_sdf_inertial(&mut sdf, 6, properties.mass, &inertial_pose, &properties.inertia);
    write_sdf_visual(&mut sdf, 6, "visual", &Pose::default(), &Geometry::mesh(&meshes.visual));
    write_sdf_collision(
        &mut sdf,
        6,
        "collision",
        &Pose::default(),
        &Geometry::mesh(&meshes.collision),
    );

    push_line(&mut sdf, 4, "</link>");
    push_line(&mut sdf, 2, "</model>");
    push_line(&mut sdf, 0, "</sdf>");
    sdf
}

pub fn write_sdf_inertial(
    sdf: &mut String,
    indent: usize,
    mass: f64,
    pose: &Pose,
    inertia: &InertiaMatrix,
) {
    push_line(sdf, indent, "<inertial>");
    write_sdf_pose(sdf, indent + 2, pose);
    push_element(sdf, indent + 2, "mass", &format_float(mass));
    push_line(sdf, indent + 2, "<inertia>");
    for (tag, value) in [
        ("ixx", inertia.ixx),
        ("ixy", inertia.ixy),
        ("ixz", inertia.ixz),
        ("iyy", inertia.iyy),
        ("iyz", inertia.iyz),
        ("izz", inertia.izz),
    ] {
        push_element(sdf, indent + 4, tag, &format_float(value));
    }
    push_line(sdf, indent + 2, "</inertia>");
    push_line(sdf, indent, "</inertial>");
}

/// Six-component pose: position then roll, pitch, yaw
pub fn write_sdf_pose(sdf: &mut String, indent: usize, pose: &Pose) {
    push_element(
        sdf,
        indent,
        "pose",
        &format!("{} {}", format_vec3(pose.xyz), format_vec3(pose.rpy)),
    );
}

pub fn write_sdf_visual(sdf: &mut String, indent: usize, name: &str, pose: &Pose, geometry: &Geometry) {
    write_sdf_element(sdf, indent, "visual", name, pose, geometry);
}

pub fn write_sdf_collision(
    sdf: &mut String,
    indent: usize,
    name: &str,
    pose: &Pose,
    geometry: &Geometry,
) {
    write_sdf_element(sdf, indent, "collision", name, pose, geometry);
}

fn write_sdf_element(
    sdf: &mut String,
    indent: usize,
    tag: &str,
    name: &str,
    pose: &Pose,
    geometry: &Geometry,
) {
    push_line(sdf, indent, &format!("<{tag} name=\"{}\">", xml_escape(name)));
    write_sdf_pose(sdf, indent + 2, pose);
    push_line(sdf, indent + 2, "<geometry>");
    write_sdf_geometry(sdf, indent + 4, geometry);
    push_line(sdf, indent + 2, "</geometry>");
    push_line(sdf, indent, &format!("</{tag}>"));
}

fn write_sdf_geometry(sdf: &mut String, indent: usize, geometry: &Geometry) {
    match geometry {
        Geometry::Mesh { uri, scale } => {
            push_line(sdf, indent, "<mesh>");
            push_element(sdf, indent + 2, "uri", &xml_escape(uri));
            push_element(sdf, indent + 2, "scale", &format_vec3(*scale));
            push_line(sdf, indent, "</mesh>");
        }
        Geometry::Box { size } => {
            push_line(sdf, indent, "<box>");
            push_element(sdf, indent + 2, "size", &format_vec3(*size));
            push_line(sdf, indent, "</box>");
        }
        Geometry::Cylinder { radius, length } => {
            push_line(sdf, indent, "<cylinder>");
            push_element(sdf, indent + 2, "radius", &format_float(*radius));
            push_element(sdf, indent + 2, "length", &format_float(*length));
            push_line(sdf, indent, "</cylinder>");
        }
        Geometry::Sphere { radius } => {
            push_line(sdf, indent, "<sphere>");
            push_element(sdf, indent + 2, "radius", &format_float(*radius));
            push_line(sdf, indent, "</sphere>");
        }
    }
}

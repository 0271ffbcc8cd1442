//! Description format conversion
//!
//! Conversion is a capability handed to the resolver at construction; a
//! resolver built without one fails conversion requests. The route between
//! two formats is looked up in a fixed table and SDF to URDF is never
//! attempted.

use std::collections::HashMap;

use glam::DVec3;

use crate::constants::SDF_VERSION;
use crate::export::{
    DescriptionFormat, Geometry, Pose, format_float, format_vec3, push_line, write_sdf_collision,
    write_sdf_inertial, write_sdf_visual, xml_escape,
};
use crate::import::{ImportError, read_urdf};
use crate::inertia::InertiaMatrix;

/// How a stored description reaches a requested format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRoute {
    /// Stored format already matches
    Identity,
    /// Needs a URDF to SDF converter
    UrdfToSdf,
    /// Cannot be derived without loss
    Unsupported,
}

/// Look up the conversion route from `source` to `target`
pub fn conversion_route(source: DescriptionFormat, target: DescriptionFormat) -> ConversionRoute {
    use DescriptionFormat::{Sdf, Urdf};

    match (source, target) {
        (Urdf, Urdf) | (Sdf, Sdf) => ConversionRoute::Identity,
        (Urdf, Sdf) => ConversionRoute::UrdfToSdf,
        (Sdf, Urdf) => ConversionRoute::Unsupported,
    }
}

/// URDF to SDF conversion capability
///
/// Implementations may wrap an external tool or convert natively.
pub trait FormatConverter: Send + Sync {
    /// Get the name of this converter
    fn name(&self) -> &str;

    /// Convert URDF text to SDF text
    fn urdf_to_sdf(&self, urdf: &str) -> Result<String, ConvertError>;
}

/// Built-in URDF to SDF converter backed by `urdf-rs`
///
/// Emits links (inertial, visuals, collisions) and joints. Child links are
/// placed with `relative_to` their parent joint, which is itself posed
/// relative to the parent link, so no frame composition is needed.
#[derive(Debug, Default)]
pub struct NativeUrdfToSdf;

impl NativeUrdfToSdf {
    pub fn new() -> Self {
        Self
    }
}

impl FormatConverter for NativeUrdfToSdf {
    fn name(&self) -> &str {
        "native"
    }

    fn urdf_to_sdf(&self, urdf: &str) -> Result<String, ConvertError> {
        let robot = read_urdf(urdf)?;
        if robot.links.is_empty() {
            return Err(ConvertError::Import(ImportError::NoLinks));
        }

        let parent_joint: HashMap<&str, &str> = robot
            .joints
            .iter()
            .map(|joint| (joint.child.link.as_str(), joint.name.as_str()))
            .collect();

        let mut sdf = String::new();
        sdf.push_str("<?xml version=\"1.0\"?>\n");
        push_line(&mut sdf, 0, &format!("<sdf version=\"{}\">", SDF_VERSION));
        push_line(
            &mut sdf,
            2,
            &format!("<model name=\"{}\">", xml_escape(&robot.name)),
        );

        for link in &robot.links {
            write_link(&mut sdf, link, parent_joint.get(link.name.as_str()).copied())?;
        }
        for joint in &robot.joints {
            write_joint(&mut sdf, joint)?;
        }

        push_line(&mut sdf, 2, "</model>");
        push_line(&mut sdf, 0, "</sdf>");

        tracing::debug!(
            "Converted URDF robot '{}' to SDF ({} links, {} joints)",
            robot.name,
            robot.links.len(),
            robot.joints.len()
        );

        Ok(sdf)
    }
}

/// Get the built-in converter
pub fn default_converter() -> Box<dyn FormatConverter> {
    Box::new(NativeUrdfToSdf)
}

fn write_link(
    sdf: &mut String,
    link: &urdf_rs::Link,
    parent_joint: Option<&str>,
) -> Result<(), ConvertError> {
    push_line(sdf, 4, &format!("<link name=\"{}\">", xml_escape(&link.name)));

    if let Some(joint) = parent_joint {
        push_line(
            sdf,
            6,
            &format!(
                "<pose relative_to=\"{}\">{} {}</pose>",
                xml_escape(joint),
                format_vec3(DVec3::ZERO),
                format_vec3(DVec3::ZERO)
            ),
        );
    }

    // urdf-rs fills a missing <inertial> with zeros
    let inertial = &link.inertial;
    if inertial.mass.value != 0.0 {
        write_sdf_inertial(
            sdf,
            6,
            inertial.mass.value,
            &Pose::from(&inertial.origin),
            &InertiaMatrix::from(&inertial.inertia),
        );
    }

    for (i, visual) in link.visual.iter().enumerate() {
        let name = visual
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_visual_{}", link.name, i));
        let geometry = Geometry::try_from(&visual.geometry)?;
        write_sdf_visual(sdf, 6, &name, &Pose::from(&visual.origin), &geometry);
    }

    for (i, collision) in link.collision.iter().enumerate() {
        let name = collision
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_collision_{}", link.name, i));
        let geometry = Geometry::try_from(&collision.geometry)?;
        write_sdf_collision(sdf, 6, &name, &Pose::from(&collision.origin), &geometry);
    }

    push_line(sdf, 4, "</link>");
    Ok(())
}

fn write_joint(sdf: &mut String, joint: &urdf_rs::Joint) -> Result<(), ConvertError> {
    let (type_str, limited) = match joint.joint_type {
        urdf_rs::JointType::Fixed => ("fixed", false),
        urdf_rs::JointType::Revolute => ("revolute", true),
        urdf_rs::JointType::Continuous => ("continuous", false),
        urdf_rs::JointType::Prismatic => ("prismatic", true),
        urdf_rs::JointType::Spherical => ("ball", false),
        urdf_rs::JointType::Floating | urdf_rs::JointType::Planar => {
            return Err(ConvertError::UnsupportedFeature(format!(
                "joint '{}' has a type SDF cannot express",
                joint.name
            )));
        }
    };

    push_line(
        sdf,
        4,
        &format!(
            "<joint name=\"{}\" type=\"{}\">",
            xml_escape(&joint.name),
            type_str
        ),
    );

    let pose = Pose::from(&joint.origin);
    push_line(
        sdf,
        6,
        &format!(
            "<pose relative_to=\"{}\">{} {}</pose>",
            xml_escape(&joint.parent.link),
            format_vec3(pose.xyz),
            format_vec3(pose.rpy)
        ),
    );
    push_line(
        sdf,
        6,
        &format!("<parent>{}</parent>", xml_escape(&joint.parent.link)),
    );
    push_line(
        sdf,
        6,
        &format!("<child>{}</child>", xml_escape(&joint.child.link)),
    );

    if matches!(type_str, "revolute" | "continuous" | "prismatic") {
        let axis = DVec3::from_array(joint.axis.xyz.0);
        push_line(sdf, 6, "<axis>");
        push_line(sdf, 8, &format!("<xyz>{}</xyz>", format_vec3(axis)));
        if limited {
            let limit = &joint.limit;
            push_line(sdf, 8, "<limit>");
            push_line(sdf, 10, &format!("<lower>{}</lower>", format_float(limit.lower)));
            push_line(sdf, 10, &format!("<upper>{}</upper>", format_float(limit.upper)));
            push_line(sdf, 10, &format!("<effort>{}</effort>", format_float(limit.effort)));
            push_line(
                sdf,
                10,
                &format!("<velocity>{}</velocity>", format_float(limit.velocity)),
            );
            push_line(sdf, 8, "</limit>");
        }
        push_line(sdf, 6, "</axis>");
    }

    push_line(sdf, 4, "</joint>");
    Ok(())
}

/// Conversion-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("No converter available for {from} to {to}")]
    ConversionUnavailable {
        from: DescriptionFormat,
        to: DescriptionFormat,
    },
    #[error("{from} to {to} conversion is not supported")]
    UnsupportedConversion {
        from: DescriptionFormat,
        to: DescriptionFormat,
    },
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error(transparent)]
    Import(#[from] ImportError),
}

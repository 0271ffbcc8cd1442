//! `model.config` manifest generation

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MODEL_DESCRIPTION, MODEL_URDF_FILE, SDF_VERSION};

use super::xml::{format_float, push_element, push_line, xml_escape};

/// Model author as recorded in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Metadata written next to a generated description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    pub version: f64,
    /// Schema version announced on the `<sdf>` element
    pub sdf_version: String,
    /// Primary description file, relative to the model directory
    pub description_file: String,
    pub author: Author,
    pub description: String,
}

impl ModelManifest {
    pub fn new(name: impl Into<String>, author: Author) -> Self {
        Self {
            name: name.into(),
            version: 1.0,
            sdf_version: SDF_VERSION.to_string(),
            description_file: MODEL_URDF_FILE.to_string(),
            author,
            description: DEFAULT_MODEL_DESCRIPTION.to_string(),
        }
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Render the manifest as `model.config` XML
pub fn render_manifest(manifest: &ModelManifest) -> String {
    let mut config = String::new();
    config.push_str("<?xml version=\"1.0\"?>\n");
    push_line(&mut config, 0, "<model>");
    push_element(&mut config, 2, "name", &xml_escape(&manifest.name));
    push_element(&mut config, 2, "version", &format_float(manifest.version));
    push_line(
        &mut config,
        2,
        &format!(
            "<sdf version=\"{}\">{}</sdf>",
            xml_escape(&manifest.sdf_version),
            xml_escape(&manifest.description_file)
        ),
    );
    push_line(&mut config, 2, "<author>");
    push_element(&mut config, 4, "name", &xml_escape(&manifest.author.name));
    push_element(&mut config, 4, "email", &xml_escape(&manifest.author.email));
    push_line(&mut config, 2, "</author>");
    push_line(&mut config, 2, "<description>");
    push_line(&mut config, 4, &xml_escape(&manifest.description));
    push_line(&mut config, 2, "</description>");
    push_line(&mut config, 0, "</model>");
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_manifest() {
        let manifest = ModelManifest::new("gripper", Author::new("Jo Doe", "jo@example.com"));
        let expected = "<?xml version=\"1.0\"?>
<model>
  <name>gripper</name>
  <version>1.0</version>
  <sdf version=\"1.7\">model.urdf</sdf>
  <author>
    <name>Jo Doe</name>
    <email>jo@example.com</email>
  </author>
  <description>
    Autogenerated model.
  </description>
</model>
";
        assert_eq!(render_manifest(&manifest), expected);
    }

    #[test]
    fn test_manifest_builders_and_escaping() {
        let manifest = ModelManifest::new("cup", Author::new("A & B", "ab@example.com"))
            .with_version(2.5)
            .with_description("Mug <ceramic>");
        let config = render_manifest(&manifest);
        assert!(config.contains("<version>2.5</version>"));
        assert!(config.contains("<name>A &amp; B</name>"));
        assert!(config.contains("Mug &lt;ceramic&gt;"));
    }
}

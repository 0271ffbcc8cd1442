//! Global constants for rbs-core

/// SDF schema version written into generated documents and manifests
pub const SDF_VERSION: &str = "1.7";

/// Name of the single link in generated descriptions
pub const BODY_LINK_NAME: &str = "body";

/// File name of the model manifest
pub const MODEL_CONFIG_FILE: &str = "model.config";

/// File name of the generated URDF description
pub const MODEL_URDF_FILE: &str = "model.urdf";

/// Extensions accepted as visual meshes
pub const VISUAL_MESH_EXTENSIONS: &[&str] = &["dae"];

/// Extensions accepted as collision meshes, in order of preference
pub const COLLISION_MESH_EXTENSIONS: &[&str] = &["stl", "obj"];

/// Directory entries starting with this prefix are never listed as models or worlds
pub const HIDDEN_ENTRY_PREFIX: &str = "__";

/// Environment variable simulators read resource search paths from
pub const SIM_RESOURCE_PATH_VAR: &str = "GZ_SIM_RESOURCE_PATH";

/// Default manifest description for generated models
pub const DEFAULT_MODEL_DESCRIPTION: &str = "Autogenerated model.";

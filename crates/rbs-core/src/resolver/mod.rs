//! Model and world lookup in a resource tree
//!
//! The resolver answers where a model's description lives and hands it out
//! as a path, an open file or text, in the stored format or converted.

mod config;
mod discovery;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::constants::SIM_RESOURCE_PATH_VAR;
use crate::convert::{ConversionRoute, ConvertError, FormatConverter, conversion_route};
use crate::export::{DescriptionFormat, MeshKind};

pub use config::{ConfigError, ResourceConfig};
pub use discovery::LocatedMeshes;

/// How a caller wants a model description delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A path on disk
    Path,
    /// An open, readable file handle
    File,
    /// The description text
    Text,
}

/// Requested format and delivery of a model description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRequest {
    pub format: DescriptionFormat,
    pub kind: ResourceKind,
}

impl ResourceRequest {
    pub fn new(format: DescriptionFormat, kind: ResourceKind) -> Self {
        Self { format, kind }
    }
}

impl Default for ResourceRequest {
    fn default() -> Self {
        Self::new(DescriptionFormat::Urdf, ResourceKind::Path)
    }
}

/// Readable description file
///
/// A converted description lives in a temporary file that is deleted when
/// this value is dropped.
#[derive(Debug)]
pub enum ResourceFile {
    Stored(File),
    Temporary(NamedTempFile),
}

impl ResourceFile {
    /// Path of the temporary file, `None` for the stored description
    pub fn temporary_path(&self) -> Option<&Path> {
        match self {
            ResourceFile::Stored(_) => None,
            ResourceFile::Temporary(file) => Some(file.path()),
        }
    }
}

impl Read for ResourceFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            ResourceFile::Stored(file) => file.read(buf),
            ResourceFile::Temporary(file) => file.read(buf),
        }
    }
}

/// A model description in the requested form
#[derive(Debug)]
pub enum ModelResource {
    /// Path to a description; a converted one is a kept temporary file the
    /// caller is responsible for deleting
    Path(PathBuf),
    File(ResourceFile),
    Text(String),
}

/// Resolves model and world names against a [`ResourceConfig`]
pub struct Resolver {
    config: ResourceConfig,
    converter: Option<Box<dyn FormatConverter>>,
}

impl Resolver {
    /// Create a resolver without conversion support
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            config,
            converter: None,
        }
    }

    /// Create a resolver that converts URDF to SDF on request
    pub fn with_converter(config: ResourceConfig, converter: Box<dyn FormatConverter>) -> Self {
        tracing::debug!("Resolver using '{}' converter", converter.name());
        Self {
            config,
            converter: Some(converter),
        }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Name of the configured converter, if any
    pub fn converter_name(&self) -> Option<&str> {
        self.converter.as_deref().map(|c| c.name())
    }

    /// Sorted names of the available models
    pub fn model_names(&self) -> Result<Vec<String>, ResolveError> {
        discovery::list_subdirectories(&self.config.models_root)
    }

    /// Sorted names of the available worlds
    pub fn world_names(&self) -> Result<Vec<String>, ResolveError> {
        discovery::list_file_stems(&self.config.worlds_root)
    }

    /// Directory of a known model
    pub fn model_dir(&self, name: &str) -> Result<PathBuf, ResolveError> {
        if !self.model_names()?.iter().any(|n| n == name) {
            return Err(ResolveError::ModelNotFound(name.to_string()));
        }
        Ok(self.config.models_root.join(name))
    }

    /// The single description file of a model, `None` if it has none yet
    pub fn model_file(&self, name: &str) -> Result<Option<PathBuf>, ResolveError> {
        let dir = self.model_dir(name)?;
        let mut found = discovery::find_descriptions(&dir)?;

        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            _ => Err(ResolveError::MultipleDescriptions {
                model: name.to_string(),
                files: found
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect(),
            }),
        }
    }

    /// Path of a world file
    pub fn world_file(&self, name: &str) -> Result<PathBuf, ResolveError> {
        if !self.world_names()?.iter().any(|n| n == name) {
            return Err(ResolveError::WorldNotFound(name.to_string()));
        }

        let path = self.config.worlds_root.join(format!("{}.sdf", name));
        if !path.is_file() {
            return Err(ResolveError::WorldNotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Contents of a model's description file
    pub fn model_string(&self, name: &str) -> Result<String, ResolveError> {
        let path = self.stored_description(name)?.0;
        read_text(&path)
    }

    /// Deliver a model description in the requested format and form
    pub fn resource(
        &self,
        name: &str,
        request: ResourceRequest,
    ) -> Result<ModelResource, ResolveError> {
        let (stored, stored_format) = self.stored_description(name)?;

        match conversion_route(stored_format, request.format) {
            ConversionRoute::Identity => match request.kind {
                ResourceKind::Path => Ok(ModelResource::Path(stored)),
                ResourceKind::File => File::open(&stored)
                    .map(|file| ModelResource::File(ResourceFile::Stored(file)))
                    .map_err(|e| io_error(&stored, e)),
                ResourceKind::Text => read_text(&stored).map(ModelResource::Text),
            },
            ConversionRoute::UrdfToSdf => {
                let converter =
                    self.converter
                        .as_deref()
                        .ok_or(ConvertError::ConversionUnavailable {
                            from: stored_format,
                            to: request.format,
                        })?;
                let sdf = converter.urdf_to_sdf(&read_text(&stored)?)?;
                tracing::debug!(
                    "Converted '{}' to {} with '{}' converter",
                    name,
                    request.format,
                    converter.name()
                );

                match request.kind {
                    ResourceKind::Text => Ok(ModelResource::Text(sdf)),
                    ResourceKind::File => {
                        let file = temporary_description(&stored, request.format, &sdf)?;
                        Ok(ModelResource::File(ResourceFile::Temporary(file)))
                    }
                    ResourceKind::Path => {
                        let file = temporary_description(&stored, request.format, &sdf)?;
                        let (_, path) = file
                            .keep()
                            .map_err(|e| ResolveError::Io(e.to_string()))?;
                        tracing::info!("Wrote converted description to {}", path.display());
                        Ok(ModelResource::Path(path))
                    }
                }
            }
            ConversionRoute::Unsupported => Err(ConvertError::UnsupportedConversion {
                from: stored_format,
                to: request.format,
            }
            .into()),
        }
    }

    /// Visual and collision meshes of a model
    pub fn locate_meshes(&self, name: &str) -> Result<LocatedMeshes, ResolveError> {
        let dir = self.model_dir(name)?;
        discovery::locate_meshes(name, &dir)
    }

    /// Value for the simulator resource search path
    ///
    /// Existing entries come first, then the models and worlds roots.
    pub fn simulator_resource_path(&self, existing: Option<&str>) -> String {
        let mut entries: Vec<String> = existing
            .filter(|value| !value.is_empty())
            .map(|value| vec![value.to_string()])
            .unwrap_or_default();
        entries.push(self.config.models_root.display().to_string());
        entries.push(self.config.worlds_root.display().to_string());
        entries.join(":")
    }

    /// Name of the environment variable [`Self::simulator_resource_path`] is meant for
    pub fn simulator_resource_var(&self) -> &'static str {
        SIM_RESOURCE_PATH_VAR
    }

    fn stored_description(&self, name: &str) -> Result<(PathBuf, DescriptionFormat), ResolveError> {
        let path = self
            .model_file(name)?
            .ok_or_else(|| ResolveError::NoDescription(name.to_string()))?;
        let format = DescriptionFormat::from_path(&path)
            .ok_or_else(|| ResolveError::NoDescription(name.to_string()))?;
        Ok((path, format))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ResolveError {
    ResolveError::Io(format!("{}: {}", path.display(), e))
}

fn read_text(path: &Path) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|e| io_error(path, e))
}

/// Write `content` to a temporary file named after `stored`, rewound for reading
fn temporary_description(
    stored: &Path,
    format: DescriptionFormat,
    content: &str,
) -> Result<NamedTempFile, ResolveError> {
    let prefix = stored
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(&format!(".{}", format.extension()))
        .tempfile()
        .map_err(|e| ResolveError::Io(e.to_string()))?;

    let path = file.path().to_path_buf();
    file.write_all(content.as_bytes())
        .map_err(|e| io_error(&path, e))?;
    file.flush().map_err(|e| io_error(&path, e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| io_error(&path, e))?;

    Ok(file)
}

/// Resolution errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to find model '{0}'")]
    ModelNotFound(String),
    #[error("Failed to find world '{0}'")]
    WorldNotFound(String),
    #[error("Found multiple descriptions for model '{model}': {files:?}")]
    MultipleDescriptions { model: String, files: Vec<String> },
    #[error("Model '{0}' has no URDF nor SDF description")]
    NoDescription(String),
    #[error("Model '{model}' has no {kind} mesh")]
    MeshNotFound { model: String, kind: MeshKind },
    #[error("IO error: {0}")]
    Io(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

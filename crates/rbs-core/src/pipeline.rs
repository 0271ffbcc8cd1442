//! Model generation: meshes in, `model.urdf` and `model.config` out

use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_DESCRIPTION, MODEL_CONFIG_FILE, MODEL_URDF_FILE};
use crate::export::{
    Author, DescriptionFormat, EmitError, ModelManifest, render_description, render_manifest,
};
use crate::inertia::{
    MassProperties, compute_mass_properties, compute_mass_properties_checked, density,
};
use crate::mesh::{MeshError, MeshUnit, load_mesh};
use crate::resolver::{LocatedMeshes, ResolveError, Resolver};

/// Settings shared by every model of a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Material density in kg/m³
    pub density: f64,
    /// Length unit of the collision meshes
    pub unit: MeshUnit,
    /// Reject meshes that are not closed and consistently wound
    pub check_manifold: bool,
    pub author: Author,
    pub version: f64,
    pub description: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            density: density::PLASTIC_ABS,
            unit: MeshUnit::Meters,
            check_manifold: false,
            author: Author::default(),
            version: 1.0,
            description: DEFAULT_MODEL_DESCRIPTION.to_string(),
        }
    }
}

/// Result of generating one model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedModel {
    pub name: String,
    pub meshes: LocatedMeshes,
    pub properties: MassProperties,
    pub description_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<GeneratedModel>,
    /// Models that failed, with the reason
    pub skipped: Vec<(String, PipelineError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Generate the description and manifest of one model
///
/// Nothing is written unless every step before writing succeeds.
pub fn generate_model(
    resolver: &Resolver,
    name: &str,
    options: &GenerateOptions,
) -> Result<GeneratedModel, PipelineError> {
    let meshes = resolver.locate_meshes(name)?;
    let mesh = load_mesh(meshes.collision_path(), options.unit)?;

    let properties = if options.check_manifold {
        compute_mass_properties_checked(&mesh, options.density)?
    } else {
        compute_mass_properties(&mesh, options.density)?
    };
    tracing::debug!(
        "{}: volume {} m^3, mass {} kg, center of mass {:?}",
        name,
        properties.volume,
        properties.mass,
        properties.center_of_mass
    );

    let description = render_description(
        DescriptionFormat::Urdf,
        name,
        &properties,
        &meshes.mesh_pair(),
    )?;
    let manifest = render_manifest(
        &ModelManifest::new(name, options.author.clone())
            .with_version(options.version)
            .with_description(options.description.clone()),
    );

    let manifest_path = meshes.model_dir.join(MODEL_CONFIG_FILE);
    let description_path = meshes.model_dir.join(MODEL_URDF_FILE);
    std::fs::write(&manifest_path, manifest)
        .map_err(|e| PipelineError::Io(format!("{}: {}", manifest_path.display(), e)))?;
    if let Err(e) = std::fs::write(&description_path, description) {
        // Leave no manifest without its description
        if let Err(cleanup) = std::fs::remove_file(&manifest_path) {
            tracing::warn!("Failed to remove {}: {}", manifest_path.display(), cleanup);
        }
        return Err(PipelineError::Io(format!(
            "{}: {}",
            description_path.display(),
            e
        )));
    }

    tracing::info!(
        "Generated {} and {} for '{}'",
        MODEL_CONFIG_FILE,
        MODEL_URDF_FILE,
        name
    );

    Ok(GeneratedModel {
        name: name.to_string(),
        meshes,
        properties,
        description_path,
        manifest_path,
    })
}

/// Generate several models in order, skipping the ones that fail
pub fn generate_batch(
    resolver: &Resolver,
    names: &[String],
    options: &GenerateOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for name in names {
        match generate_model(resolver, name, options) {
            Ok(generated) => report.generated.push(generated),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", name, e);
                report.skipped.push((name.clone(), e));
            }
        }
    }

    report
}

/// Models that have no description file yet
pub fn models_without_description(resolver: &Resolver) -> Result<Vec<String>, ResolveError> {
    let mut pending = Vec::new();
    for name in resolver.model_names()? {
        match resolver.model_file(&name) {
            Ok(None) => pending.push(name),
            Ok(Some(_)) | Err(ResolveError::MultipleDescriptions { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(pending)
}

/// Generation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("IO error: {0}")]
    Io(String),
}

//! Robot asset library command line
//!
//! ```bash
//! # List models and worlds under ./models and ./worlds
//! rbs-assets models
//! rbs-assets worlds
//!
//! # Print a model as SDF, converting from URDF if needed
//! rbs-assets resource box --format sdf
//!
//! # Generate model.urdf and model.config for models without a description
//! rbs-assets generate --density 2700
//! ```

use std::path::PathBuf;
use std::process::{Command, ExitCode};

use clap::{Args, Parser, Subcommand};
use rbs_core::{
    Author, ConfigError, DescriptionFormat, GenerateOptions, MeshError, MeshUnit, ModelResource,
    ResolveError, ResourceConfig, ResourceKind, ResourceRequest, Resolver,
    SIM_RESOURCE_PATH_VAR, compute_mass_properties, default_converter, density, generate_batch,
    load_mesh, models_without_description, render_inertial_block,
};

/// Robot asset library tools
#[derive(Parser, Debug)]
#[command(name = "rbs-assets")]
#[command(author, version, about = "Robot model asset tools", long_about = None)]
struct Cli {
    /// RON file with the resource roots
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding `models/`, `worlds/` and `textures/` (ignored with --config)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available models
    Models {
        /// Only models without a description file
        #[arg(long)]
        pending: bool,
    },

    /// List available worlds
    Worlds,

    /// Print the description file of a model
    ModelFile { name: String },

    /// Print the path of a world file
    WorldFile { name: String },

    /// Print a model description in the requested format
    Resource {
        name: String,

        /// Description format: urdf or sdf
        #[arg(short, long, default_value = "urdf", value_parser = parse_format)]
        format: DescriptionFormat,

        /// Print a path instead of the text (converted descriptions are written to a temporary file)
        #[arg(long)]
        path: bool,
    },

    /// Print the simulator resource search path
    ResourcePath,

    /// Print the inertial block of a mesh file
    Inertia {
        mesh: PathBuf,

        /// Description format: urdf or sdf
        #[arg(short, long, default_value = "urdf", value_parser = parse_format)]
        format: DescriptionFormat,

        #[command(flatten)]
        material: MaterialArgs,
    },

    /// Generate model.urdf and model.config from model meshes
    Generate {
        /// Models to generate (default: models without a description)
        names: Vec<String>,

        /// Generate every model
        #[arg(long, conflicts_with = "names")]
        all: bool,

        #[command(flatten)]
        material: MaterialArgs,

        /// Reject collision meshes that are not closed and consistently wound
        #[arg(long)]
        check_manifold: bool,

        /// Model version
        #[arg(long, default_value = "1.0")]
        model_version: f64,

        /// Model description
        #[arg(long)]
        description: Option<String>,

        /// Author name (default: git config user.name)
        #[arg(long)]
        author_name: Option<String>,

        /// Author email (default: git config user.email)
        #[arg(long)]
        author_email: Option<String>,
    },

    /// Write the resource roots to a RON config file
    WriteConfig { output: PathBuf },
}

#[derive(Args, Debug)]
struct MaterialArgs {
    /// Material density in kg/m^3
    #[arg(short, long, default_value_t = density::PLASTIC_ABS)]
    density: f64,

    /// Mesh length unit: m, cm, mm or in
    #[arg(short, long, default_value = "m", value_parser = parse_unit)]
    unit: MeshUnit,
}

fn parse_format(name: &str) -> Result<DescriptionFormat, String> {
    DescriptionFormat::from_name(name).ok_or_else(|| format!("unknown format '{}'", name))
}

fn parse_unit(name: &str) -> Result<MeshUnit, String> {
    MeshUnit::from_name(name).ok_or_else(|| format!("unknown unit '{}'", name))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("Model '{0}' has no description")]
    NoDescription(String),
    #[error("{0} of {1} models skipped")]
    Incomplete(usize, usize),
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rbs_core=info,rbs_assets=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ResourceConfig::load(path)?,
        None => ResourceConfig::from_root(&cli.root),
    };
    let resolver = Resolver::with_converter(config, default_converter());

    match cli.command {
        Commands::Models { pending } => {
            let names = if pending {
                models_without_description(&resolver)?
            } else {
                resolver.model_names()?
            };
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Worlds => {
            for name in resolver.world_names()? {
                println!("{}", name);
            }
        }
        Commands::ModelFile { name } => {
            let path = resolver
                .model_file(&name)?
                .ok_or(CliError::NoDescription(name))?;
            println!("{}", path.display());
        }
        Commands::WorldFile { name } => {
            println!("{}", resolver.world_file(&name)?.display());
        }
        Commands::Resource { name, format, path } => {
            let kind = if path {
                ResourceKind::Path
            } else {
                ResourceKind::Text
            };
            match resolver.resource(&name, ResourceRequest::new(format, kind))? {
                ModelResource::Path(path) => println!("{}", path.display()),
                ModelResource::Text(text) => print!("{}", text),
                ModelResource::File(_) => {}
            }
        }
        Commands::ResourcePath => {
            let existing = std::env::var(SIM_RESOURCE_PATH_VAR).ok();
            println!("{}", resolver.simulator_resource_path(existing.as_deref()));
        }
        Commands::Inertia {
            mesh,
            format,
            material,
        } => {
            let mesh = load_mesh(&mesh, material.unit)?;
            let properties = compute_mass_properties(&mesh, material.density)?;
            print!("{}", render_inertial_block(format, &properties));
        }
        Commands::Generate {
            names,
            all,
            material,
            check_manifold,
            model_version,
            description,
            author_name,
            author_email,
        } => {
            let names = if all {
                resolver.model_names()?
            } else if names.is_empty() {
                models_without_description(&resolver)?
            } else {
                names
            };
            if names.is_empty() {
                tracing::info!("No models to generate");
                return Ok(());
            }

            let author = Author::new(
                author_name.unwrap_or_else(|| git_config("user.name")),
                author_email.unwrap_or_else(|| git_config("user.email")),
            );
            if author.name.is_empty() || author.email.is_empty() {
                tracing::warn!("Author name or email unknown, pass --author-name/--author-email");
            }

            let mut options = GenerateOptions {
                density: material.density,
                unit: material.unit,
                check_manifold,
                author,
                version: model_version,
                ..Default::default()
            };
            if let Some(description) = description {
                options.description = description;
            }

            let report = generate_batch(&resolver, &names, &options);
            for generated in &report.generated {
                println!(
                    "{}: mass {} kg -> {}",
                    generated.name,
                    generated.properties.mass,
                    generated.description_path.display()
                );
            }
            if !report.is_complete() {
                return Err(CliError::Incomplete(report.skipped.len(), names.len()));
            }
        }
        Commands::WriteConfig { output } => {
            resolver.config().save(&output)?;
            tracing::info!("Wrote resource config to {}", output.display());
        }
    }

    Ok(())
}

/// Read a global git setting, empty when git or the key is missing
fn git_config(key: &str) -> String {
    Command::new("git")
        .args(["config", "--global", key])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "rbs-assets",
            "--root",
            "/srv/assets",
            "generate",
            "box",
            "--density",
            "2700",
            "--unit",
            "mm",
        ]);
        assert_eq!(cli.root, PathBuf::from("/srv/assets"));
        match cli.command {
            Commands::Generate {
                names, material, ..
            } => {
                assert_eq!(names, vec!["box"]);
                assert_eq!(material.density, 2700.0);
                assert_eq!(material.unit, MeshUnit::Millimeters);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_resource_format() {
        let cli = Cli::parse_from(["rbs-assets", "resource", "box", "--format", "SDF"]);
        assert!(matches!(
            cli.command,
            Commands::Resource {
                format: DescriptionFormat::Sdf,
                path: false,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["rbs-assets", "resource", "box", "--format", "xml"]).is_err());
    }
}

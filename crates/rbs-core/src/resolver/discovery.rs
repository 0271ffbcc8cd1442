//! Directory scanning for models, worlds, descriptions and meshes

use std::path::{Path, PathBuf};

use crate::constants::{COLLISION_MESH_EXTENSIONS, HIDDEN_ENTRY_PREFIX, VISUAL_MESH_EXTENSIONS};
use crate::export::{DescriptionFormat, MeshKind, MeshPair};

use super::ResolveError;

/// Visual and collision meshes found inside a model directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedMeshes {
    /// The model directory the relative paths start from
    pub model_dir: PathBuf,
    /// Visual mesh, relative to `model_dir`
    pub visual: PathBuf,
    /// Collision mesh, relative to `model_dir`
    pub collision: PathBuf,
}

impl LocatedMeshes {
    /// Absolute path of the collision mesh
    pub fn collision_path(&self) -> PathBuf {
        self.model_dir.join(&self.collision)
    }

    /// Absolute path of the visual mesh
    pub fn visual_path(&self) -> PathBuf {
        self.model_dir.join(&self.visual)
    }

    /// Mesh references as written into a description (`/`-separated)
    pub fn mesh_pair(&self) -> MeshPair {
        MeshPair::new(reference(&self.visual), reference(&self.collision))
    }
}

fn reference(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_ENTRY_PREFIX)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ResolveError::Io(format!("{}: {}", dir.display(), e)))?;
    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    Ok(paths)
}

/// Sorted names of the visible sub-directories of `root`
pub fn list_subdirectories(root: &Path) -> Result<Vec<String>, ResolveError> {
    Ok(read_dir_sorted(root)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
        .filter(|name| !is_hidden(name))
        .collect())
}

/// Sorted names of the visible files of `root`, cut at the first `.`
pub fn list_file_stems(root: &Path) -> Result<Vec<String>, ResolveError> {
    let mut stems: Vec<String> = read_dir_sorted(root)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
        .filter_map(|name| name.split('.').next().map(String::from))
        .filter(|stem| !stem.is_empty() && !is_hidden(stem))
        .collect();
    stems.dedup();
    Ok(stems)
}

/// Every file below `dir`, depth-first in sorted order
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let mut files = Vec::new();
    for path in read_dir_sorted(dir)? {
        if path.is_dir() {
            files.extend(collect_files(&path)?);
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Description files (`.urdf` / `.sdf`) anywhere below `dir`
pub fn find_descriptions(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    Ok(collect_files(dir)?
        .into_iter()
        .filter(|path| DescriptionFormat::from_path(path).is_some())
        .collect())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Find the visual and collision meshes of a model
///
/// The first visual match in sorted order wins. Collision candidates are
/// ranked by extension order, so an STL beats an OBJ.
pub fn locate_meshes(model: &str, model_dir: &Path) -> Result<LocatedMeshes, ResolveError> {
    let files = collect_files(model_dir)?;

    let visual = VISUAL_MESH_EXTENSIONS
        .iter()
        .find_map(|ext| files.iter().find(|path| has_extension(path, ext)))
        .ok_or_else(|| ResolveError::MeshNotFound {
            model: model.to_string(),
            kind: MeshKind::Visual,
        })?;

    let collision = COLLISION_MESH_EXTENSIONS
        .iter()
        .find_map(|ext| files.iter().find(|path| has_extension(path, ext)))
        .ok_or_else(|| ResolveError::MeshNotFound {
            model: model.to_string(),
            kind: MeshKind::Collision,
        })?;

    let relative = |path: &Path| {
        path.strip_prefix(model_dir)
            .map(Path::to_path_buf)
            .map_err(|e| ResolveError::Io(e.to_string()))
    };

    Ok(LocatedMeshes {
        model_dir: model_dir.to_path_buf(),
        visual: relative(visual)?,
        collision: relative(collision)?,
    })
}

//! Robot asset library core
//!
//! This crate contains the building blocks for packaging robot models:
//! - Mesh: triangle mesh loading (STL, OBJ) and closedness checks
//! - Inertia: mass properties of a uniform-density solid mesh
//! - Export: URDF/SDF description and `model.config` emission
//! - Import: reading inertial data back out of URDF text
//! - Convert: URDF to SDF conversion behind an injectable capability
//! - Resolver: locating models, worlds and their meshes on disk
//! - Pipeline: single-model and batch description generation

pub mod constants;
pub mod convert;
pub mod export;
pub mod import;
pub mod inertia;
pub mod mesh;
pub mod pipeline;
pub mod resolver;

pub use constants::*;
pub use convert::*;
pub use export::*;
pub use import::*;
pub use inertia::*;
pub use mesh::*;
pub use pipeline::*;
pub use resolver::*;

//! Inertia tensor and mass property calculations

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::mesh::{MeshError, TriangleMesh, check_closed_manifold};

/// Inertia tensor (symmetric 3x3 matrix)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaMatrix {
    pub ixx: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyy: f64,
    pub iyz: f64,
    pub izz: f64,
}

impl Default for InertiaMatrix {
    fn default() -> Self {
        // Default to a small sphere-like inertia
        Self {
            ixx: 0.001,
            ixy: 0.0,
            ixz: 0.0,
            iyy: 0.001,
            iyz: 0.0,
            izz: 0.001,
        }
    }
}

impl From<&urdf_rs::Inertia> for InertiaMatrix {
    fn from(urdf_inertia: &urdf_rs::Inertia) -> Self {
        Self {
            ixx: urdf_inertia.ixx,
            ixy: urdf_inertia.ixy,
            ixz: urdf_inertia.ixz,
            iyy: urdf_inertia.iyy,
            iyz: urdf_inertia.iyz,
            izz: urdf_inertia.izz,
        }
    }
}

impl InertiaMatrix {
    /// Create an inertia matrix for a solid box
    pub fn box_inertia(mass: f64, width: f64, height: f64, depth: f64) -> Self {
        let w2 = width * width;
        let h2 = height * height;
        let d2 = depth * depth;
        let k = mass / 12.0;
        Self {
            ixx: k * (h2 + d2),
            ixy: 0.0,
            ixz: 0.0,
            iyy: k * (w2 + d2),
            iyz: 0.0,
            izz: k * (w2 + h2),
        }
    }

    /// Create an inertia matrix for a solid cylinder (along Z axis)
    pub fn cylinder_inertia(mass: f64, radius: f64, length: f64) -> Self {
        let r2 = radius * radius;
        let l2 = length * length;
        Self {
            ixx: mass * (3.0 * r2 + l2) / 12.0,
            ixy: 0.0,
            ixz: 0.0,
            iyy: mass * (3.0 * r2 + l2) / 12.0,
            iyz: 0.0,
            izz: mass * r2 / 2.0,
        }
    }

    /// Create an inertia matrix for a solid sphere
    pub fn sphere_inertia(mass: f64, radius: f64) -> Self {
        let i = 2.0 * mass * radius * radius / 5.0;
        Self {
            ixx: i,
            ixy: 0.0,
            ixz: 0.0,
            iyy: i,
            iyz: 0.0,
            izz: i,
        }
    }

    /// Take the six independent entries of a tensor (upper triangle)
    pub fn from_tensor(tensor: DMat3) -> Self {
        Self {
            ixx: tensor.x_axis.x,
            ixy: tensor.y_axis.x,
            ixz: tensor.z_axis.x,
            iyy: tensor.y_axis.y,
            iyz: tensor.z_axis.y,
            izz: tensor.z_axis.z,
        }
    }

    /// Rebuild the full symmetric tensor
    pub fn to_tensor(&self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(self.ixx, self.ixy, self.ixz),
            DVec3::new(self.ixy, self.iyy, self.iyz),
            DVec3::new(self.ixz, self.iyz, self.izz),
        )
    }

    /// Check if the inertia matrix is physically valid
    pub fn is_valid(&self) -> bool {
        // Diagonal elements must be positive
        if self.ixx <= 0.0 || self.iyy <= 0.0 || self.izz <= 0.0 {
            return false;
        }

        // Triangle inequality: each diagonal must be <= sum of other two
        let ixx = self.ixx;
        let iyy = self.iyy;
        let izz = self.izz;

        ixx <= iyy + izz && iyy <= ixx + izz && izz <= ixx + iyy
    }

    /// Get as array in description order [ixx, ixy, ixz, iyy, iyz, izz]
    pub fn to_array(&self) -> [f64; 6] {
        [self.ixx, self.ixy, self.ixz, self.iyy, self.iyz, self.izz]
    }
}

/// Volume, mass, centre of mass and inertia of a uniform-density solid
///
/// The inertia is expressed about the centre of mass, in the mesh's native
/// frame and units. A negative volume means the mesh is wound inward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f64,
    pub mass: f64,
    pub center_of_mass: DVec3,
    pub inertia: InertiaMatrix,
}

impl MassProperties {
    /// Full symmetric inertia tensor about the centre of mass
    pub fn inertia_tensor(&self) -> DMat3 {
        self.inertia.to_tensor()
    }
}

/// Compute mass properties of a closed mesh with uniform density
///
/// Uses the signed tetrahedra each face forms with the origin. Closedness and
/// winding are not checked: an inward-wound mesh produces a negative volume
/// and an open mesh produces a meaningless one. Density units must match the
/// cube of the mesh length unit; no conversion is applied.
pub fn compute_mass_properties(
    mesh: &TriangleMesh,
    density: f64,
) -> Result<MassProperties, MeshError> {
    if !density.is_finite() || density <= 0.0 {
        return Err(MeshError::InvalidDensity(density));
    }
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    mesh.check_indices()?;

    // Accumulated with six times the tetrahedron volume, scaled once at the end
    let mut volume6 = 0.0;
    let mut first_moment = DVec3::ZERO;
    // Second moment of volume, integral of r r^T over the solid
    let mut covariance = DMat3::ZERO;

    for [a, b, c] in mesh.triangles() {
        let triple = a.dot(b.cross(c));
        let sum = a + b + c;

        volume6 += triple;
        first_moment += sum * triple;

        let outer = outer_product(a, a) + outer_product(b, b) + outer_product(c, c)
            + outer_product(sum, sum);
        covariance = covariance + outer * triple;
    }

    if volume6 == 0.0 {
        return Err(MeshError::DegenerateVolume);
    }

    let volume = volume6 / 6.0;
    let first_moment = first_moment / 24.0;
    let covariance = covariance * (1.0 / 120.0);

    let center_of_mass = first_moment / volume;

    // Parallel-axis shift of the second moment to the centre of mass
    let centered = covariance - outer_product(center_of_mass, center_of_mass) * volume;
    let tensor = (DMat3::from_diagonal(DVec3::splat(trace(&centered))) - centered) * density;

    let properties = MassProperties {
        volume,
        mass: mass_from_volume(volume, density),
        center_of_mass,
        inertia: InertiaMatrix::from_tensor(tensor),
    };

    tracing::debug!(
        "Mass properties: volume={} mass={} com={:?} inertia={:?}",
        properties.volume,
        properties.mass,
        properties.center_of_mass,
        properties.inertia.to_array()
    );

    Ok(properties)
}

/// Compute mass properties after verifying the mesh is a closed, consistently
/// wound manifold
pub fn compute_mass_properties_checked(
    mesh: &TriangleMesh,
    density: f64,
) -> Result<MassProperties, MeshError> {
    check_closed_manifold(mesh)?;
    compute_mass_properties(mesh, density)
}

/// Calculate enclosed volume of a mesh using the signed tetrahedron method
///
/// The sign follows the winding: outward faces give a positive volume.
pub fn calculate_mesh_volume(mesh: &TriangleMesh) -> Result<f64, MeshError> {
    mesh.check_indices()?;
    // V = (1/6) * sum of v0 . (v1 x v2)
    Ok(mesh
        .triangles()
        .map(|[a, b, c]| a.dot(b.cross(c)))
        .sum::<f64>()
        / 6.0)
}

fn outer_product(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

fn trace(m: &DMat3) -> f64 {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}

/// Estimate mass from volume and density
pub fn mass_from_volume(volume: f64, density: f64) -> f64 {
    volume * density
}

/// Default density for common materials (kg/m^3)
pub mod density {
    pub const PLASTIC_ABS: f64 = 1050.0;
    pub const PLASTIC_PLA: f64 = 1240.0;
    pub const ALUMINUM: f64 = 2700.0;
    pub const STEEL: f64 = 7850.0;
    pub const TITANIUM: f64 = 4500.0;
    pub const WATER: f64 = 1000.0;
}

//! Closed reference solids
//!
//! Both generators share corner vertices and wind every face outward, so
//! their output passes [`check_closed_manifold`](super::check_closed_manifold).

use std::f64::consts::PI;

use glam::DVec3;

use super::TriangleMesh;

/// Default number of latitude bands for sphere generation
pub const SPHERE_LAT_SEGMENTS: u32 = 32;

/// Default number of longitude segments for sphere generation
pub const SPHERE_LON_SEGMENTS: u32 = 64;

/// Generate a box centred on the origin
///
/// # Arguments
/// * `size` - [width (x), depth (y), height (z)]
///
/// # Returns
/// 8 vertices, 12 triangles
pub fn generate_box_mesh(size: [f64; 3]) -> TriangleMesh {
    let half = DVec3::from_array(size) / 2.0;

    // Corner i sits on the positive side of axis k when bit k of i is set
    let vertices = (0..8u32)
        .map(|i| {
            DVec3::new(
                if i & 1 != 0 { half.x } else { -half.x },
                if i & 2 != 0 { half.y } else { -half.y },
                if i & 4 != 0 { half.z } else { -half.z },
            )
        })
        .collect();

    let faces = vec![
        // -Z
        [0, 2, 3],
        [0, 3, 1],
        // +Z
        [4, 5, 7],
        [4, 7, 6],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [2, 6, 7],
        [2, 7, 3],
        // -X
        [0, 4, 6],
        [0, 6, 2],
        // +X
        [1, 3, 7],
        [1, 7, 5],
    ];

    TriangleMesh {
        vertices,
        faces,
        normals: None,
    }
}

/// Generate a UV sphere centred on the origin
pub fn generate_sphere_mesh(radius: f64) -> TriangleMesh {
    generate_sphere_mesh_with_segments(radius, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS)
}

/// Generate a UV sphere with custom resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_segments` - Number of latitude bands (clamped to at least 2)
/// * `lon_segments` - Number of longitude segments (clamped to at least 3)
pub fn generate_sphere_mesh_with_segments(
    radius: f64,
    lat_segments: u32,
    lon_segments: u32,
) -> TriangleMesh {
    let lat_segments = lat_segments.max(2);
    let lon_segments = lon_segments.max(3);

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    // North pole, interior rings, south pole
    vertices.push(DVec3::new(0.0, 0.0, radius));
    for lat in 1..lat_segments {
        let theta = (lat as f64 / lat_segments as f64) * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..lon_segments {
            let phi = (lon as f64 / lon_segments as f64) * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();
            vertices.push(radius * DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta));
        }
    }
    let south = vertices.len() as u32;
    vertices.push(DVec3::new(0.0, 0.0, -radius));

    let ring = |lat: u32, lon: u32| 1 + (lat - 1) * lon_segments + lon % lon_segments;

    for lon in 0..lon_segments {
        faces.push([0, ring(1, lon), ring(1, lon + 1)]);
    }

    for lat in 1..lat_segments - 1 {
        for lon in 0..lon_segments {
            let current = ring(lat, lon);
            let next = ring(lat + 1, lon);
            let current_right = ring(lat, lon + 1);
            let next_right = ring(lat + 1, lon + 1);

            faces.push([current, next, current_right]);
            faces.push([current_right, next, next_right]);
        }
    }

    let last = lat_segments - 1;
    for lon in 0..lon_segments {
        faces.push([south, ring(last, lon + 1), ring(last, lon)]);
    }

    TriangleMesh {
        vertices,
        faces,
        normals: None,
    }
}

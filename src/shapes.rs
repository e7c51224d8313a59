//! Built-in meshes for the viewer, benchmarks and tests
//!
//! Everything is centered on the origin and wound clockwise when seen from
//! outside, which is the front-facing order for the rasterizer.

use crate::rasterizer::Mesh;
use glam::Vec3;

/// Radius of [`sphere`]
pub const SPHERE_RADIUS: f32 = 0.5;

/// Axis-aligned cube with unit edges and flat face normals (24 vertices).
pub fn cube() -> Mesh {
    // Four corners per face, counter-clockwise seen from outside
    let faces = [
        (Vec3::Z, [(-1.0, -1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)]),
        (Vec3::NEG_Z, [(-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0), (1.0, 1.0, -1.0), (1.0, -1.0, -1.0)]),
        (Vec3::Y, [(-1.0, 1.0, -1.0), (-1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, -1.0)]),
        (Vec3::NEG_Y, [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)]),
        (Vec3::X, [(1.0, -1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0), (1.0, -1.0, 1.0)]),
        (Vec3::NEG_X, [(-1.0, -1.0, -1.0), (-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0), (-1.0, 1.0, -1.0)]),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = positions.len() as u32;
        for (x, y, z) in corners {
            positions.push(Vec3::new(x, y, z) * 0.5);
            normals.push(normal);
        }
        // Reverse the corner order to get clockwise triangles
        indices.extend_from_slice(&[base, base + 3, base + 2, base, base + 2, base + 1]);
    }

    Mesh::new(positions, normals, indices)
}

/// UV sphere of radius [`SPHERE_RADIUS`] with `subdivisions` latitude bands
/// and as many longitude segments. Normals point straight out.
///
/// # Panics
/// If `subdivisions` is below 3.
pub fn sphere(subdivisions: u32) -> Mesh {
    uv_sphere(subdivisions, subdivisions)
}

/// UV sphere with separate latitude and longitude counts.
pub fn uv_sphere(latitudes: u32, longitudes: u32) -> Mesh {
    assert!(latitudes >= 2 && longitudes >= 3, "sphere needs at least 2 bands and 3 segments");

    let rings = latitudes - 1;
    let vertex_count = (rings * longitudes + 2) as usize;
    let mut normals = Vec::with_capacity(vertex_count);

    normals.push(Vec3::Y);
    for ring in 1..latitudes {
        let theta = ring as f32 * std::f32::consts::PI / latitudes as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for segment in 0..longitudes {
            let phi = segment as f32 * std::f32::consts::TAU / longitudes as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            normals.push(Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta));
        }
    }
    normals.push(Vec3::NEG_Y);

    let positions = normals.iter().map(|&n| n * SPHERE_RADIUS).collect();

    let north = 0;
    let south = vertex_count as u32 - 1;
    let at = |ring: u32, segment: u32| 1 + ring * longitudes + segment % longitudes;

    let mut indices = Vec::with_capacity((longitudes * 6 * (latitudes - 1)) as usize);
    for segment in 0..longitudes {
        indices.extend_from_slice(&[north, at(0, segment), at(0, segment + 1)]);
    }
    for ring in 0..rings - 1 {
        for segment in 0..longitudes {
            let upper = at(ring, segment);
            let upper_next = at(ring, segment + 1);
            let lower = at(ring + 1, segment);
            let lower_next = at(ring + 1, segment + 1);
            indices.extend_from_slice(&[upper_next, upper, lower]);
            indices.extend_from_slice(&[upper_next, lower, lower_next]);
        }
    }
    for segment in 0..longitudes {
        indices.extend_from_slice(&[south, at(rings - 1, segment + 1), at(rings - 1, segment)]);
    }

    Mesh::new(positions, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clockwise from outside means the right-handed face normal points in.
    fn assert_wound_clockwise(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) < 0.0, "triangle {tri:?} faces outward");
        }
    }

    #[test]
    fn test_cube_layout() {
        let cube = cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.positions.iter().all(|p| p.abs() == Vec3::splat(0.5)));
        assert_wound_clockwise(&cube);
    }

    #[test]
    fn test_sphere_layout() {
        let sphere = sphere(28);
        assert_eq!(sphere.vertex_count(), 27 * 28 + 2);
        assert_eq!(sphere.triangle_count(), 28 * 2 * 27);
        for p in &sphere.positions {
            assert!((p.length() - SPHERE_RADIUS).abs() < 1e-5);
        }
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertex_count()));
        assert_wound_clockwise(&sphere);
    }

    #[test]
    fn test_coarse_sphere_is_closed() {
        // every edge is shared by exactly two triangles
        let mesh = uv_sphere(3, 4);
        let mut edges = std::collections::HashMap::new();
        for tri in mesh.indices.chunks(3) {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(edges.values().all(|&count| count == 2));
    }
}

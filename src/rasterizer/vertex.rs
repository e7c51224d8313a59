//! Vertex stage: model/view/projection transform to integer screen space

use super::math::{ndc_to_screen, perspective_divide};
use super::raster::Triangle;
use super::stats::RenderStats;
use glam::{IVec2, Mat4, Vec3};

/// Indexed triangle list with a model transform.
///
/// The normal transform is kept in sync with the model transform by
/// [`Mesh::set_transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Three per triangle
    pub indices: Vec<u32>,
    transform: Mat4,
    normal_transform: Mat4,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        assert_eq!(positions.len(), normals.len(), "one normal per position");
        assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
        Self {
            positions,
            normals,
            indices,
            transform: Mat4::IDENTITY,
            normal_transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.set_transform(transform);
        self
    }

    /// Set the model transform and recompute its inverse transpose.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.normal_transform = transform.inverse().transpose();
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-index output of the vertex stage. Entry `j` belongs to
/// `mesh.indices[j]`, so triangles are consecutive triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexOutput {
    pub screen: Vec<IVec2>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl VertexOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.screen.clear();
        self.positions.clear();
        self.normals.clear();
    }

    pub fn len(&self) -> usize {
        self.screen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screen.is_empty()
    }

    /// The triangle whose first corner is at `base`.
    pub fn triangle(&self, base: usize) -> Triangle {
        Triangle {
            screen: [self.screen[base], self.screen[base + 1], self.screen[base + 2]],
            positions: [self.positions[base], self.positions[base + 1], self.positions[base + 2]],
            normals: [self.normals[base], self.normals[base + 1], self.normals[base + 2]],
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.len() / 3).map(move |t| self.triangle(t * 3))
    }
}

/// Transform every index of `mesh` into `out`, replacing its contents.
///
/// Positions go through model, view and projection, then the perspective
/// divide and viewport mapping. World positions and transformed normals are
/// kept for shading; normals are not renormalized here.
///
/// # Panics
/// If `width` or `height` is zero or an index is out of range.
pub fn vertex_stage(
    mesh: &Mesh,
    view: Mat4,
    projection: Mat4,
    width: usize,
    height: usize,
    out: &mut VertexOutput,
    stats: &mut RenderStats,
) {
    assert!(width > 0 && height > 0, "viewport must not be empty");

    out.clear();
    out.screen.reserve(mesh.indices.len());
    out.positions.reserve(mesh.indices.len());
    out.normals.reserve(mesh.indices.len());

    let vertex_count = mesh.positions.len();
    let view_projection = projection * view;
    for &index in &mesh.indices {
        let i = index as usize;
        assert!(i < vertex_count, "index {i} out of range for {vertex_count} vertices");

        let world = mesh.transform.transform_point3(mesh.positions[i]);
        let clip = view_projection * world.extend(1.0);
        let ndc = perspective_divide(clip);

        out.screen.push(ndc_to_screen(ndc.truncate(), width, height));
        out.positions.push(world);
        out.normals.push(mesh.normal_transform.transform_vector3(mesh.normals[i]));
    }

    stats.vertices += mesh.indices.len() as u32;
}

//! Triangle setup and block rasterization
//!
//! Triangles are walked over their bounding box one block of `W` pixels at a
//! time. The three edge functions are stepped incrementally, coverage comes
//! out as a lane mask, and covered blocks are interpolated and shaded as a
//! whole before the covered lanes are stored.

use super::edge::{coverage, Block, Edge};
use super::lane::{F32Lane, I32Lane, V3Lane};
use super::math::edge_function;
use super::render::Region;
use super::shading::FragmentShader;
use super::stats::RenderStats;
use glam::{IVec2, Vec3};

/// One screen-space triangle plus the attributes interpolated across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub screen: [IVec2; 3],
    /// World-space positions
    pub positions: [Vec3; 3],
    /// Unnormalized shading normals
    pub normals: [Vec3; 3],
}

impl Triangle {
    /// Twice the signed screen area. Positive means clockwise on screen.
    pub fn area(&self) -> i32 {
        edge_function(self.screen[0], self.screen[1], self.screen[2])
    }

    /// Inclusive pixel bounding box as (min, max).
    pub fn bounds(&self) -> (IVec2, IVec2) {
        let [a, b, c] = self.screen;
        (a.min(b).min(c), a.max(b).max(c))
    }

    fn swap_winding(mut self) -> Self {
        self.screen.swap(1, 2);
        self.positions.swap(1, 2);
        self.normals.swap(1, 2);
        self
    }
}

/// A triangle that survived culling, wound clockwise, ready for any region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedTriangle {
    pub triangle: Triangle,
    /// Always positive
    pub area: i32,
    pub min: IVec2,
    pub max: IVec2,
}

/// Cull and orient a triangle.
///
/// Zero-area triangles are always rejected. Counter-clockwise ones are
/// rejected when `cull_back_faces` is set, otherwise their second and third
/// corners are swapped so every prepared triangle has positive area.
pub fn prepare_triangle(triangle: Triangle, cull_back_faces: bool) -> Option<PreparedTriangle> {
    let area = triangle.area();
    let triangle = match area {
        0 => return None,
        a if a < 0 && cull_back_faces => return None,
        a if a < 0 => triangle.swap_winding(),
        _ => triangle,
    };
    let (min, max) = triangle.bounds();
    Some(PreparedTriangle {
        triangle,
        area: area.abs(),
        min,
        max,
    })
}

/// Barycentric weights for a block.
///
/// `w0..w2` are raw (unbiased) edge values. Lanes outside `mask` get zero
/// weight so their interpolated attributes stay finite.
#[inline]
pub fn barycentric_weights<const W: usize>(
    w0: I32Lane<W>,
    w1: I32Lane<W>,
    w2: I32Lane<W>,
    mask: I32Lane<W>,
    area: i32,
) -> [F32Lane<W>; 3] {
    let area = F32Lane::splat(area as f32);
    [w0, w1, w2].map(|w| (w & mask).to_f32() / area)
}

#[inline]
fn interpolate<const W: usize>(corners: &[Vec3; 3], weights: &[F32Lane<W>; 3]) -> V3Lane<W> {
    V3Lane::splat(corners[0]) * weights[0]
        + V3Lane::splat(corners[1]) * weights[1]
        + V3Lane::splat(corners[2]) * weights[2]
}

/// Pack unit colors as `R << 16 | G << 8 | B`, truncating each channel.
#[inline]
pub fn pack_colors<const W: usize>(color: V3Lane<W>) -> I32Lane<W> {
    let color = color.clamp(F32Lane::zero(), F32Lane::one()) * 255.0;
    (color.x.to_i32() << 16) | (color.y.to_i32() << 8) | color.z.to_i32()
}

/// Rasterize one prepared triangle into `region`, clipped to its bounds.
pub fn rasterize_triangle<const W: usize, S>(
    region: &mut Region<'_>,
    prepared: &PreparedTriangle,
    shader: &S,
    stats: &mut RenderStats,
) where
    S: FragmentShader<W> + ?Sized,
{
    let (clip_min, clip_max) = region.bounds();
    let min = prepared.min.max(clip_min);
    let max = prepared.max.min(clip_max);
    if min.x > max.x || min.y > max.y {
        return;
    }

    let tri = &prepared.triangle;
    let [v0, v1, v2] = tri.screen;
    let (e12, mut w0_row) = Edge::<W>::new(v1, v2, min);
    let (e20, mut w1_row) = Edge::<W>::new(v2, v0, min);
    let (e01, mut w2_row) = Edge::<W>::new(v0, v1, min);

    let (offset_x, offset_y) = Block::<W>::offsets();
    let limit_x = I32Lane::splat(max.x);
    let limit_y = I32Lane::splat(max.y);

    let mut y = min.y;
    while y <= max.y {
        let (mut w0, mut w1, mut w2) = (w0_row, w1_row, w2_row);
        let py = I32Lane::splat(y) + offset_y;
        let outside_y = limit_y.lt(py);

        let mut x = min.x;
        while x <= max.x {
            let px = I32Lane::splat(x) + offset_x;
            let outside = outside_y | limit_x.lt(px);
            let mask = outside.and_not(coverage(w0, w1, w2));

            if mask.is_all_zero() {
                stats.pixels_skipped += W as u64;
            } else {
                let weights = barycentric_weights(
                    e12.unbiased(w0),
                    e20.unbiased(w1),
                    e01.unbiased(w2),
                    mask,
                    prepared.area,
                );
                let position = interpolate(&tri.positions, &weights);
                let normal = interpolate(&tri.normals, &weights);
                let colors = pack_colors(shader.shade(position, normal));

                let mut written = 0;
                for k in 0..W {
                    if mask.lane(k) != 0 {
                        region.put(px.lane(k), py.lane(k), colors.lane(k) as u32);
                        written += 1;
                    }
                }
                stats.pixels_computed += W as u64;
                stats.pixels_wasted += (W - written) as u64;
            }

            w0 += e12.one_step_x;
            w1 += e20.one_step_x;
            w2 += e01.one_step_x;
            x += Block::<W>::STEP_X;
        }

        w0_row += e12.one_step_y;
        w1_row += e20.one_step_y;
        w2_row += e01.one_step_y;
        y += Block::<W>::STEP_Y;
    }
}

//! Incremental edge functions over pixel blocks
//!
//! A block is the group of `W` pixels evaluated together. Lane `k` of every
//! block sits at offset `(k % STEP_X, k / STEP_X)` from the block origin.

use super::lane::I32Lane;
use glam::IVec2;

/// Pixel block shape for lane width `W`.
pub struct Block<const W: usize>;

impl<const W: usize> Block<W> {
    /// Block width in pixels.
    pub const STEP_X: i32 = if W == 1 || cfg!(feature = "row-blocks") {
        W as i32
    } else {
        (W / 2) as i32
    };
    /// Block height in pixels.
    pub const STEP_Y: i32 = W as i32 / Self::STEP_X;

    /// Per-lane x and y offsets inside the block.
    #[inline]
    pub fn offsets() -> (I32Lane<W>, I32Lane<W>) {
        let xs = std::array::from_fn(|k| k as i32 % Self::STEP_X);
        let ys = std::array::from_fn(|k| k as i32 / Self::STEP_X);
        (I32Lane::from_array(xs), I32Lane::from_array(ys))
    }
}

/// One triangle edge prepared for stepping.
///
/// Values handed out by [`Edge::new`] are biased by the top-left fill rule:
/// a pixel is on the inside of the edge exactly when its biased value is
/// non-negative. [`Edge::unbiased`] recovers the true edge function.
#[derive(Debug, Clone, Copy)]
pub struct Edge<const W: usize> {
    pub one_step_x: I32Lane<W>,
    pub one_step_y: I32Lane<W>,
    bias: i32,
}

impl<const W: usize> Edge<W> {
    /// Set up edge `v0 -> v1` and evaluate it for the block anchored at
    /// `origin`.
    pub fn new(v0: IVec2, v1: IVec2, origin: IVec2) -> (Self, I32Lane<W>) {
        let a = v0.y - v1.y;
        let b = v1.x - v0.x;
        let c = v0.x * v1.y - v0.y * v1.x;

        // Pixels exactly on an edge belong to it only if it is a top edge
        // (horizontal, interior below) or a left edge (interior to the right).
        let top_left = a > 0 || (a == 0 && b > 0);
        let bias = if top_left { 0 } else { -1 };

        let edge = Self {
            one_step_x: I32Lane::splat(a * Block::<W>::STEP_X),
            one_step_y: I32Lane::splat(b * Block::<W>::STEP_Y),
            bias,
        };

        let (dx, dy) = Block::<W>::offsets();
        let x = I32Lane::splat(origin.x) + dx;
        let y = I32Lane::splat(origin.y) + dy;
        let values = x * a + y * b + I32Lane::splat(c + bias);
        (edge, values)
    }

    /// Strip the fill-rule bias from a stepped value.
    #[inline]
    pub fn unbiased(&self, values: I32Lane<W>) -> I32Lane<W> {
        values - I32Lane::splat(self.bias)
    }

    #[inline]
    pub fn is_top_left(&self) -> bool {
        self.bias == 0
    }
}

/// Lanes whose biased edge values are all non-negative.
///
/// ORing the three values keeps the sign bit if any of them is negative, so a
/// single compare against -1 decides coverage for the whole block.
#[inline]
pub fn coverage<const W: usize>(w0: I32Lane<W>, w1: I32Lane<W>, w2: I32Lane<W>) -> I32Lane<W> {
    I32Lane::splat(-1).lt(w0 | w1 | w2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::edge_function;

    fn check_increments<const W: usize>() {
        let v0 = IVec2::new(3, 1);
        let v1 = IVec2::new(40, 17);
        let origin = IVec2::new(5, 9);
        let (edge, start) = Edge::<W>::new(v0, v1, origin);
        let (dx, dy) = Block::<W>::offsets();

        let stepped_x = edge.unbiased(start + edge.one_step_x);
        let stepped_y = edge.unbiased(start + edge.one_step_y);
        for k in 0..W {
            let p = origin + IVec2::new(dx.lane(k), dy.lane(k));
            assert_eq!(edge.unbiased(start).lane(k), edge_function(v0, v1, p));
            let px = p + IVec2::new(Block::<W>::STEP_X, 0);
            assert_eq!(stepped_x.lane(k), edge_function(v0, v1, px));
            let py = p + IVec2::new(0, Block::<W>::STEP_Y);
            assert_eq!(stepped_y.lane(k), edge_function(v0, v1, py));
        }
    }

    #[test]
    fn test_edge_increments_match_direct_evaluation() {
        check_increments::<1>();
        check_increments::<4>();
        check_increments::<8>();
    }

    #[test]
    fn test_block_covers_every_lane_once() {
        let (dx, dy) = Block::<8>::offsets();
        let mut seen = std::collections::HashSet::new();
        for k in 0..8 {
            assert!(dx.lane(k) < Block::<8>::STEP_X);
            assert!(dy.lane(k) < Block::<8>::STEP_Y);
            assert!(seen.insert((dx.lane(k), dy.lane(k))));
        }
        assert_eq!(Block::<8>::STEP_X * Block::<8>::STEP_Y, 8);
        assert_eq!(Block::<1>::STEP_X * Block::<1>::STEP_Y, 1);
    }

    #[test]
    fn test_top_left_classification() {
        let origin = IVec2::ZERO;
        // clockwise-on-screen triangle (0,0) (4,0) (0,4)
        let (top, _) = Edge::<4>::new(IVec2::new(0, 0), IVec2::new(4, 0), origin);
        let (left, _) = Edge::<4>::new(IVec2::new(0, 4), IVec2::new(0, 0), origin);
        let (diagonal, _) = Edge::<4>::new(IVec2::new(4, 0), IVec2::new(0, 4), origin);
        assert!(top.is_top_left());
        assert!(left.is_top_left());
        assert!(!diagonal.is_top_left());
    }

    #[test]
    fn test_coverage_rejects_any_negative_edge() {
        let w0 = I32Lane::<4>::from_array([0, 5, -1, 3]);
        let w1 = I32Lane::from_array([0, 5, 2, -7]);
        let w2 = I32Lane::from_array([0, 5, 2, 3]);
        assert_eq!(coverage(w0, w1, w2), I32Lane::from_array([-1, -1, 0, 0]));
    }
}

//! Scalar helpers for screen-space geometry
//! Linear algebra itself comes from glam

use glam::{IVec2, Vec2, Vec3, Vec4};

/// Twice the signed area of (a, b, c). Positive when c lies to the right of
/// a->b with y pointing down (clockwise on screen).
#[inline]
pub fn edge_function(a: IVec2, b: IVec2, c: IVec2) -> i32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Float variant of [`edge_function`].
#[inline]
pub fn edge_function_f32(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Divide by w unless it is already 1.
#[inline]
pub fn perspective_divide(clip: Vec4) -> Vec4 {
    if clip.w != 1.0 {
        clip / clip.w
    } else {
        clip
    }
}

/// Map normalized device coordinates to a pixel. Row 0 is the top of the
/// image, so y is flipped. The result is clamped into the buffer.
#[inline]
pub fn ndc_to_screen(ndc: Vec3, width: usize, height: usize) -> IVec2 {
    let w = width as f32;
    let h = height as f32;
    let x = ((ndc.x + 1.0) * 0.5 * w).floor() as i32;
    let y = ((1.0 - (ndc.y + 1.0) * 0.5) * h).floor() as i32;
    IVec2::new(
        x.clamp(0, width as i32 - 1),
        y.clamp(0, height as i32 - 1),
    )
}

/// Calculate barycentric coordinates for point p in triangle (v0, v1, v2)
/// Returns (w0, w1, w2) summing to 1, or None for a degenerate triangle
pub fn barycentric(p: IVec2, v0: IVec2, v1: IVec2, v2: IVec2) -> Option<Vec3> {
    let area = edge_function(v0, v1, v2);
    if area == 0 {
        return None;
    }
    let area = area as f32;
    Some(Vec3::new(
        edge_function(v1, v2, p) as f32 / area,
        edge_function(v2, v0, p) as f32 / area,
        edge_function(v0, v1, p) as f32 / area,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_function_sign() {
        let a = IVec2::new(0, 0);
        let b = IVec2::new(4, 0);
        assert!(edge_function(a, b, IVec2::new(0, 4)) > 0);
        assert!(edge_function(a, b, IVec2::new(0, -4)) < 0);
        assert_eq!(edge_function(a, b, IVec2::new(9, 0)), 0);
    }

    #[test]
    fn test_edge_function_f32_agrees_with_integer() {
        let (a, b, c) = (IVec2::new(1, 2), IVec2::new(7, 3), IVec2::new(2, 9));
        let f = edge_function_f32(a.as_vec2(), b.as_vec2(), c.as_vec2());
        assert_eq!(f, edge_function(a, b, c) as f32);
    }

    #[test]
    fn test_ndc_to_screen_corners() {
        assert_eq!(ndc_to_screen(Vec3::new(-1.0, 1.0, 0.0), 100, 50), IVec2::new(0, 0));
        assert_eq!(ndc_to_screen(Vec3::new(1.0, -1.0, 0.0), 100, 50), IVec2::new(99, 49));
        assert_eq!(ndc_to_screen(Vec3::ZERO, 100, 50), IVec2::new(50, 25));
        assert_eq!(ndc_to_screen(Vec3::new(-5.0, 5.0, 0.0), 100, 50), IVec2::new(0, 0));
    }

    #[test]
    fn test_perspective_divide() {
        assert_eq!(perspective_divide(Vec4::new(2.0, 4.0, 6.0, 2.0)), Vec4::new(1.0, 2.0, 3.0, 1.0));
        let affine = Vec4::new(0.3, 0.2, 0.1, 1.0);
        assert_eq!(perspective_divide(affine), affine);
    }

    #[test]
    fn test_barycentric_inside() {
        let v0 = IVec2::new(0, 0);
        let v1 = IVec2::new(10, 0);
        let v2 = IVec2::new(5, 10);
        let bc = barycentric(IVec2::new(5, 3), v0, v1, v2).unwrap();
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!((bc.x + bc.y + bc.z - 1.0).abs() < 1e-5);
        assert!(barycentric(IVec2::ZERO, v0, v0, v1).is_none());
    }
}

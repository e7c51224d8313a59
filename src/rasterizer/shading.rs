//! Fragment stage: lane-wide lighting
//!
//! A shader turns interpolated world positions and normals for one pixel
//! block into linear-to-display colors in [0, 1].

use super::approx;
use super::lane::{F32Lane, V3Lane};
use crate::config::ShadingConfig;
use glam::Vec3;

/// Per-block fragment shading. Shared by every worker thread, hence `Sync`.
pub trait FragmentShader<const W: usize>: Sync {
    /// `normal` arrives interpolated but not normalized. Lanes the
    /// rasterizer will not write may hold garbage; the result for those
    /// lanes is ignored.
    fn shade(&self, position: V3Lane<W>, normal: V3Lane<W>) -> V3Lane<W>;
}

/// Fills every covered pixel with one color.
#[derive(Debug, Clone, Copy)]
pub struct ConstantShader {
    pub color: Vec3,
}

impl ConstantShader {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl<const W: usize> FragmentShader<W> for ConstantShader {
    #[inline]
    fn shade(&self, _position: V3Lane<W>, _normal: V3Lane<W>) -> V3Lane<W> {
        V3Lane::splat(self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Exponent {
    Integer(u32),
    Real(f32),
}

/// Blinn-Phong with a single point light, sRGB encoded output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinnPhong {
    light_position: Vec3,
    eye: Vec3,
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    light_intensity: f32,
    specular_intensity: f32,
    exponent: Exponent,
}

impl BlinnPhong {
    /// `eye` is the world-space camera position used for the view vector.
    /// The shader keeps its own copy, so call [`BlinnPhong::set_eye`] after
    /// moving the camera.
    pub fn new(config: &ShadingConfig, eye: Vec3) -> Self {
        let exponent = if config.shininess.fract() == 0.0 && config.shininess <= u32::MAX as f32 {
            Exponent::Integer(config.shininess as u32)
        } else {
            Exponent::Real(config.shininess)
        };
        Self {
            light_position: Vec3::from(config.light_position),
            eye,
            ambient: Vec3::from(config.ambient_color),
            diffuse: Vec3::from(config.diffuse_color),
            specular: Vec3::from(config.specular_color),
            light_intensity: config.light_intensity,
            specular_intensity: config.specular_intensity,
            exponent,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    #[inline]
    fn highlight<const W: usize>(&self, n_dot_h: F32Lane<W>) -> F32Lane<W> {
        match self.exponent {
            Exponent::Integer(n) => approx::powi(n_dot_h, n),
            Exponent::Real(e) => approx::pow(n_dot_h, F32Lane::splat(e)),
        }
    }
}

impl<const W: usize> FragmentShader<W> for BlinnPhong {
    fn shade(&self, position: V3Lane<W>, normal: V3Lane<W>) -> V3Lane<W> {
        let zero = F32Lane::zero();
        let one = F32Lane::one();

        let normal = normal.normalize();
        let light_dir = (V3Lane::splat(self.light_position) - position).normalize();
        let view_dir = (V3Lane::splat(self.eye) - position).normalize();
        let half = (view_dir + light_dir).normalize();

        let n_dot_l = normal.dot(light_dir).clamp(zero, one);
        let n_dot_h = normal.dot(half).clamp(zero, one);

        let diffuse = V3Lane::splat(self.diffuse) * (n_dot_l * self.light_intensity);
        let specular =
            V3Lane::splat(self.specular) * (self.highlight(n_dot_h) * self.specular_intensity);
        let color = V3Lane::splat(self.ambient) + diffuse + specular;

        color.map(approx::linear_to_srgb).clamp(zero, one)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim_config() -> ShadingConfig {
        ShadingConfig {
            light_intensity: 0.6,
            specular_intensity: 0.3,
            ..ShadingConfig::default()
        }
    }

    /// Same lighting with std math, one pixel at a time.
    fn reference(config: &ShadingConfig, eye: Vec3, position: Vec3, normal: Vec3) -> Vec3 {
        let normal = normal.normalize_or_zero();
        let light_dir = (Vec3::from(config.light_position) - position).normalize();
        let view_dir = (eye - position).normalize();
        let half = (view_dir + light_dir).normalize();
        let n_dot_l = normal.dot(light_dir).clamp(0.0, 1.0);
        let n_dot_h = normal.dot(half).clamp(0.0, 1.0);
        let color = Vec3::from(config.ambient_color)
            + Vec3::from(config.diffuse_color) * n_dot_l * config.light_intensity
            + Vec3::from(config.specular_color) * n_dot_h.powf(config.shininess) * config.specular_intensity;
        let encode = |c: f32| {
            if c < 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        };
        Vec3::new(encode(color.x), encode(color.y), encode(color.z)).clamp(Vec3::ZERO, Vec3::ONE)
    }

    fn sample_points() -> [(Vec3, Vec3); 4] {
        [
            (Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(1.0, 0.5, -2.0), Vec3::new(-0.3, 0.8, 0.4)),
            (Vec3::new(-1.0, 0.2, -4.0), Vec3::new(0.0, -1.0, 0.0)),
            (Vec3::new(0.3, -0.4, -2.5), Vec3::new(2.0, 3.0, 1.0)),
        ]
    }

    #[test]
    fn test_blinn_phong_matches_scalar_reference() {
        let config = dim_config();
        let shader = BlinnPhong::new(&config, Vec3::ZERO);
        let points = sample_points();
        let positions = V3Lane::<4>::from_array(points.map(|(p, _)| p));
        let normals = V3Lane::<4>::from_array(points.map(|(_, n)| n));
        let shaded = shader.shade(positions, normals);
        for (k, (p, n)) in points.iter().enumerate() {
            let expected = reference(&config, Vec3::ZERO, *p, *n);
            assert!((shaded.lane(k) - expected).abs().max_element() < 1e-3, "lane {k}");
        }
    }

    #[test]
    fn test_set_eye_moves_the_highlight() {
        let config = dim_config();
        let mut shader = BlinnPhong::new(&config, Vec3::ZERO);
        let eye = Vec3::new(2.0, 3.0, 1.0);
        shader.set_eye(eye);
        assert_eq!(shader.eye(), eye);

        let points = sample_points();
        let positions = V3Lane::<4>::from_array(points.map(|(p, _)| p));
        let normals = V3Lane::<4>::from_array(points.map(|(_, n)| n));
        let shaded = shader.shade(positions, normals);
        for (k, (p, n)) in points.iter().enumerate() {
            let expected = reference(&config, eye, *p, *n);
            assert!((shaded.lane(k) - expected).abs().max_element() < 1e-3, "lane {k}");
        }
    }

    #[test]
    fn test_non_integer_shininess_uses_fast_pow() {
        let config = ShadingConfig {
            shininess: 12.5,
            ..dim_config()
        };
        let shader = BlinnPhong::new(&config, Vec3::ZERO);
        for (p, n) in sample_points() {
            let shaded = shader.shade(V3Lane::<1>::splat(p), V3Lane::splat(n)).lane(0);
            let expected = reference(&config, Vec3::ZERO, p, n);
            assert!((shaded - expected).abs().max_element() < 1e-3);
        }
    }

    #[test]
    fn test_width_does_not_change_results() {
        let shader = BlinnPhong::new(&ShadingConfig::default(), Vec3::ZERO);
        for (p, n) in sample_points() {
            let one = shader.shade(V3Lane::<1>::splat(p), V3Lane::splat(n)).lane(0);
            let eight = shader.shade(V3Lane::<8>::splat(p), V3Lane::splat(n)).lane(6);
            assert_eq!(one, eight);
        }
    }

    #[test]
    fn test_zero_normal_gives_ambient_only() {
        let config = ShadingConfig::default();
        let shader = BlinnPhong::new(&config, Vec3::ZERO);
        let shaded = shader
            .shade(V3Lane::<4>::splat(Vec3::new(0.0, 0.0, -2.0)), V3Lane::zero())
            .lane(1);
        assert!(shaded.is_finite());
        let expected = reference(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO);
        assert!((shaded - expected).abs().max_element() < 1e-3);
    }

    #[test]
    fn test_output_is_clamped() {
        // default intensities overdrive the red channel
        let shader = BlinnPhong::new(&ShadingConfig::default(), Vec3::ZERO);
        let lit = shader.shade(
            V3Lane::<4>::splat(Vec3::new(0.0, 0.0, -3.0)),
            V3Lane::splat(Vec3::new(-0.3, 0.9, 0.3)),
        );
        for k in 0..4 {
            let c = lit.lane(k);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
        assert_eq!(lit.lane(0).x, 1.0);
    }

    #[test]
    fn test_constant_shader() {
        let shader = ConstantShader::new(Vec3::new(0.2, 0.4, 0.6));
        let c = FragmentShader::<8>::shade(&shader, V3Lane::zero(), V3Lane::zero());
        assert_eq!(c.lane(3), Vec3::new(0.2, 0.4, 0.6));
    }
}

//! Core types for the rasterizer

use glam::Vec3;

/// 8-bit RGB color, packed into frame buffer pixels as `0x00RRGGBB`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From channels in [0, 1]. Each channel is scaled by 255 and truncated;
    /// out-of-range values saturate.
    pub fn from_unit(rgb: Vec3) -> Self {
        Self {
            r: (rgb.x * 255.0) as u8,
            g: (rgb.y * 255.0) as u8,
            b: (rgb.z * 255.0) as u8,
        }
    }

    /// Pack as `R << 16 | G << 8 | B`
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_u32(pixel: u32) -> Self {
        Self {
            r: (pixel >> 16) as u8,
            g: (pixel >> 8) as u8,
            b: pixel as u8,
        }
    }

    /// Convert to [u8; 4] RGBA with opaque alpha, for presentation
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(Color::new(0x12, 0x34, 0x56).to_u32(), 0x0012_3456);
        assert_eq!(Color::from_u32(0x00ab_cdef), Color::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn test_from_unit_truncates_and_saturates() {
        let c = Color::from_unit(Vec3::new(1.0, 0.5, -0.2));
        assert_eq!(c, Color::new(255, 127, 0));
        assert_eq!(Color::from_unit(Vec3::splat(3.0)), Color::WHITE);
    }
}

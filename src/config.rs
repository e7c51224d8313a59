//! Renderer configuration
//!
//! Stored as RON so it can sit next to other hand-edited data files. Every
//! field has a default, so a file only needs the values it changes:
//!
//! ```ron
//! (
//!     threads: 4,
//!     shading: (shininess: 16.0),
//! )
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound on [`RenderConfig::threads`]
pub const MAX_THREADS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Rotation about the x axis in degrees, negative looks down
    pub pitch: f32,
    pub eye: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 90.0,
            near: 0.1,
            far: 100.0,
            pitch: -10.0,
            eye: [0.0, 0.0, 0.0],
        }
    }
}

/// Single point light, Blinn-Phong material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// World space, y up
    pub light_position: [f32; 3],
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub light_intensity: f32,
    pub specular_intensity: f32,
    pub shininess: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light_position: [-3.0, 8.0, 0.0],
            ambient_color: [0.1, 0.0, 0.0],
            diffuse_color: [1.0, 0.0, 0.0],
            specular_color: [1.0, 1.0, 1.0],
            light_intensity: 40.0,
            specular_intensity: 8.0,
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Worker threads, or 0 for one per available core. The frame is split
    /// into a `floor(sqrt(threads))` square grid, so only square counts use
    /// every thread.
    pub threads: usize,
    /// Drop back-facing triangles instead of flipping them
    pub cull_back_faces: bool,
    pub clear_color: [u8; 3],
    pub camera: CameraConfig,
    pub shading: ShadingConfig,
    /// Hand per-frame counters to the stats sink
    pub collect_stats: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            cull_back_faces: true,
            clear_color: [0, 0, 0],
            camera: CameraConfig::default(),
            shading: ShadingConfig::default(),
            collect_stats: true,
        }
    }
}

impl RenderConfig {
    /// Thread count after resolving 0 to the number of available cores.
    pub fn worker_threads(&self) -> usize {
        match self.threads {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(MAX_THREADS),
            n => n,
        }
    }

    /// Read and validate a RON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(s: &str) -> Result<Self> {
        let config: RenderConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_ron_string()?;
        fs::write(path, contents).map_err(|source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads > MAX_THREADS {
            return Err(Error::InvalidConfig(format!(
                "threads must be at most {MAX_THREADS}, got {}",
                self.threads
            )));
        }
        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(Error::InvalidConfig(format!(
                "camera planes must satisfy 0 < near < far (near {}, far {})",
                camera.near, camera.far
            )));
        }
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(Error::InvalidConfig(format!(
                "fov must be between 0 and 180 degrees, got {}",
                camera.fov
            )));
        }
        if !(self.shading.shininess >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "shininess must be non-negative, got {}",
                self.shading.shininess
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        RenderConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = RenderConfig::from_ron_str("(threads: 4, shading: (shininess: 16.0))").unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.shading.shininess, 16.0);
        assert_eq!(config.shading.light_position, [-3.0, 8.0, 0.0]);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_round_trip_through_ron() {
        let mut config = RenderConfig::default();
        config.threads = 9;
        config.cull_back_faces = false;
        config.clear_color = [12, 34, 56];
        let text = config.to_ron_string().unwrap();
        assert_eq!(RenderConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let too_many = RenderConfig::from_ron_str("(threads: 1000000)");
        assert!(matches!(too_many, Err(Error::InvalidConfig(_))));
        let at_cap = format!("(threads: {MAX_THREADS})");
        assert!(RenderConfig::from_ron_str(&at_cap).is_ok());

        let planes = RenderConfig::from_ron_str("(camera: (near: 5.0, far: 1.0))");
        assert!(matches!(planes, Err(Error::InvalidConfig(_))));

        let shininess = RenderConfig::from_ron_str("(shading: (shininess: -1.0))");
        assert!(matches!(shininess, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_threads_uses_available_cores() {
        let config = RenderConfig::from_ron_str("(threads: 0)").unwrap();
        let workers = config.worker_threads();
        assert!((1..=MAX_THREADS).contains(&workers));

        let fixed = RenderConfig { threads: 9, ..RenderConfig::default() };
        assert_eq!(fixed.worker_threads(), 9);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = RenderConfig::from_ron_str("(threads: \"many\")");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = RenderConfig::load("/nonexistent/lane-raster.ron");
        assert!(matches!(result, Err(Error::ConfigRead { .. })));
    }
}

//! lane-raster: a CPU triangle renderer built on width-generic lane types
//!
//! ```no_run
//! use lane_raster::glam::{Mat4, Vec3};
//! use lane_raster::{shapes, BlinnPhong, Framebuffer, RenderConfig, Renderer};
//!
//! let config = RenderConfig::default();
//! let mut renderer: Renderer = Renderer::new(&config)?;
//! let shader = BlinnPhong::new(&config.shading, renderer.camera().eye());
//! let mut fb = Framebuffer::new(640, 480);
//! let sphere = shapes::sphere(28).with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)));
//! renderer.render_frame(&mut fb, &[sphere], &shader);
//! fb.save_png("frame.png")?;
//! # Ok::<(), lane_raster::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod rasterizer;
pub mod shapes;

pub use config::{CameraConfig, RenderConfig, ShadingConfig, MAX_THREADS};
pub use error::{Error, Result};
pub use rasterizer::*;

pub use glam;

//! Lane-parallel software rasterizer
//!
//! Features:
//! - Lane types generic over width (1, 4 or 8), picked at build time
//! - Incremental edge functions evaluated one pixel block at a time
//! - Top-left fill rule, so shared edges are drawn exactly once
//! - Blinn-Phong shading with fast exp/log/pow and sRGB encoding
//! - Optional fork-join rendering over a square grid of frame regions

pub mod approx;
pub mod edge;
pub mod lane;
mod math;
mod raster;
mod render;
mod shading;
mod stats;
mod types;
mod vertex;

pub use edge::Block;
pub use lane::{F32Lane, I32Lane, V3Lane, LANE_WIDTH};
pub use math::*;
pub use raster::*;
pub use render::*;
pub use shading::*;
pub use stats::*;
pub use types::*;
pub use vertex::*;

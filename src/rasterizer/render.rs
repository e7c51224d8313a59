//! Frame buffer, camera and the per-frame driver
//!
//! [`Renderer::render_frame`] runs the vertex stage and triangle setup on the
//! calling thread, then rasterizes. With more than one thread the frame
//! buffer is cut into a square grid of regions, each handed to a scoped
//! worker as its own set of row slices, so no two workers can ever touch the
//! same pixel.

use super::edge::Block;
use super::lane::LANE_WIDTH;
use super::raster::{prepare_triangle, rasterize_triangle, PreparedTriangle};
use super::shading::FragmentShader;
use super::stats::{NoopSink, RenderStats, StatsSink};
use super::types::Color;
use super::vertex::{vertex_stage, Mesh, VertexOutput};
use crate::config::{CameraConfig, RenderConfig};
use crate::error::Result;
use glam::{IVec2, Mat4, Vec3};
use std::path::Path;
use std::thread;

/// Framebuffer for software rendering, one `0x00RRGGBB` word per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "framebuffer must not be empty");
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    /// Words per row
    pub fn pitch(&self) -> usize {
        self.width
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Reallocate for a new size. Contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "framebuffer must not be empty");
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// RGBA bytes with opaque alpha, row 0 first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| Color::from_u32(p).to_rgba())
            .collect()
    }

    /// Write the buffer as an image; the format follows the file extension.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            &self.to_rgba8(),
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }

    /// The whole buffer as one region.
    pub fn region(&mut self) -> Region<'_> {
        let max = IVec2::new(self.width as i32 - 1, self.height as i32 - 1);
        Region {
            min: IVec2::ZERO,
            max,
            rows: self.pixels.chunks_mut(self.width).collect(),
        }
    }

    /// Split into `grid` x `grid` disjoint regions, row-major.
    ///
    /// # Panics
    /// If `grid` is zero or larger than either dimension.
    pub fn split_regions(&mut self, grid: usize) -> Vec<Region<'_>> {
        assert!(grid > 0, "grid must not be empty");
        assert!(
            grid <= self.width && grid <= self.height,
            "{grid}x{grid} grid does not fit a {}x{} buffer",
            self.width,
            self.height
        );

        let (width, height) = (self.width, self.height);
        let columns: Vec<(usize, usize)> = (0..grid)
            .map(|c| (c * width / grid, (c + 1) * width / grid))
            .collect();

        let mut regions = Vec::with_capacity(grid * grid);
        let mut rest: &mut [u32] = &mut self.pixels;
        for band in 0..grid {
            let (y0, y1) = (band * height / grid, (band + 1) * height / grid);
            let (band_pixels, tail) = std::mem::take(&mut rest).split_at_mut((y1 - y0) * width);
            rest = tail;

            let mut band_regions: Vec<Region<'_>> = columns
                .iter()
                .map(|&(x0, x1)| Region {
                    min: IVec2::new(x0 as i32, y0 as i32),
                    max: IVec2::new(x1 as i32 - 1, y1 as i32 - 1),
                    rows: Vec::with_capacity(y1 - y0),
                })
                .collect();

            for row in band_pixels.chunks_mut(width) {
                let mut row_rest = row;
                for (region, &(x0, x1)) in band_regions.iter_mut().zip(&columns) {
                    let (cells, tail) = std::mem::take(&mut row_rest).split_at_mut(x1 - x0);
                    row_rest = tail;
                    region.rows.push(cells);
                }
            }
            regions.extend(band_regions);
        }
        regions
    }
}

/// Exclusive access to a rectangle of a [`Framebuffer`].
#[derive(Debug)]
pub struct Region<'a> {
    min: IVec2,
    max: IVec2,
    /// One slice per row, starting at column `min.x`
    rows: Vec<&'a mut [u32]>,
}

impl Region<'_> {
    /// Inclusive pixel bounds as (min, max).
    pub fn bounds(&self) -> (IVec2, IVec2) {
        (self.min, self.max)
    }

    /// Store one pixel at buffer coordinates. Panics outside the region.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: u32) {
        debug_assert!(x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y);
        self.rows[(y - self.min.y) as usize][(x - self.min.x) as usize] = color;
    }
}

/// Camera state
///
/// The projection depends on the viewport aspect ratio and is rebuilt lazily
/// after [`Camera::set_viewport`] changes it.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    /// Radians, negative looks down
    pub pitch: f32,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    projection: Option<Mat4>,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            eye: Vec3::from(config.eye),
            pitch: config.pitch.to_radians(),
            fov_y: config.fov.to_radians(),
            near: config.near,
            far: config.far,
            aspect: 1.0,
            projection: None,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_x(-self.pitch) * Mat4::from_translation(-self.eye)
    }

    pub fn projection(&mut self) -> Mat4 {
        let (fov_y, aspect, near, far) = (self.fov_y, self.aspect, self.near, self.far);
        *self
            .projection
            .get_or_insert_with(|| Mat4::perspective_rh_gl(fov_y, aspect, near, far))
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        let aspect = width as f32 / height as f32;
        if aspect != self.aspect {
            self.aspect = aspect;
            self.projection = None;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

/// Side of the square worker grid for `threads`, limited so every region
/// keeps at least one pixel.
pub fn grid_size(threads: usize, width: usize, height: usize) -> usize {
    let mut side = (threads as f64).sqrt() as usize;
    // float rounding can land one off for huge counts
    while side.checked_mul(side).map_or(true, |sq| sq > threads) {
        side -= 1;
    }
    while (side + 1).checked_mul(side + 1).is_some_and(|sq| sq <= threads) {
        side += 1;
    }
    side.min(width).min(height).max(1)
}

/// Owns everything that lives across frames: camera, scratch buffers,
/// statistics and the diagnostics sink.
pub struct Renderer<const W: usize = LANE_WIDTH> {
    camera: Camera,
    threads: usize,
    grid: usize,
    cull_back_faces: bool,
    clear_color: u32,
    collect_stats: bool,
    width: usize,
    height: usize,
    vertices: VertexOutput,
    prepared: Vec<PreparedTriangle>,
    stats: RenderStats,
    sink: Box<dyn StatsSink>,
}

impl<const W: usize> Renderer<W> {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        let [r, g, b] = config.clear_color;
        Ok(Self {
            camera: Camera::new(&config.camera),
            threads: config.worker_threads(),
            grid: 1,
            cull_back_faces: config.cull_back_faces,
            clear_color: Color::new(r, g, b).to_u32(),
            collect_stats: config.collect_stats,
            width: 0,
            height: 0,
            vertices: VertexOutput::new(),
            prepared: Vec::new(),
            stats: RenderStats::new(Block::<W>::STEP_X as u32, Block::<W>::STEP_Y as u32),
            sink: Box::new(NoopSink),
        })
    }

    pub fn with_sink(mut self, sink: impl StatsSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_sink(&mut self, sink: impl StatsSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Counters from the last frame
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Side of the worker grid for the current viewport
    pub fn grid(&self) -> usize {
        self.grid
    }

    pub fn set_cull_back_faces(&mut self, cull: bool) {
        self.cull_back_faces = cull;
    }

    /// Adapt to a new viewport. Called by [`Renderer::render_frame`] when the
    /// frame buffer size changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "viewport must not be empty");
        self.width = width;
        self.height = height;
        self.camera.set_viewport(width, height);
        self.grid = grid_size(self.threads, width, height);

        let used = self.grid * self.grid;
        if used != self.threads {
            tracing::warn!(
                threads = self.threads,
                used,
                "thread count does not form a square grid, extra threads stay idle"
            );
        }
        tracing::debug!(width, height, grid = self.grid, "viewport resized");
    }

    /// Clear `fb` and draw every mesh into it.
    pub fn render_frame<S>(&mut self, fb: &mut Framebuffer, meshes: &[Mesh], shader: &S)
    where
        S: FragmentShader<W> + ?Sized,
    {
        if (fb.width, fb.height) != (self.width, self.height) {
            self.resize(fb.width, fb.height);
        }

        self.stats.reset();
        fb.clear(self.clear_color);

        let view = self.camera.view();
        let projection = self.camera.projection();

        self.prepared.clear();
        for mesh in meshes {
            vertex_stage(mesh, view, projection, fb.width, fb.height, &mut self.vertices, &mut self.stats);
            for triangle in self.vertices.triangles() {
                self.stats.triangles += 1;
                match prepare_triangle(triangle, self.cull_back_faces) {
                    Some(prepared) => self.prepared.push(prepared),
                    None => self.stats.triangles_culled += 1,
                }
            }
        }

        let prepared = &self.prepared;
        if self.grid == 1 {
            let mut region = fb.region();
            for triangle in prepared {
                rasterize_triangle::<W, S>(&mut region, triangle, shader, &mut self.stats);
            }
        } else {
            let grid = self.grid;
            let stats = &mut self.stats;
            let (block_width, block_height) = (stats.block_width, stats.block_height);
            thread::scope(|scope| {
                let workers: Vec<_> = fb
                    .split_regions(grid)
                    .into_iter()
                    .map(|mut region| {
                        scope.spawn(move || {
                            let mut local = RenderStats::new(block_width, block_height);
                            for triangle in prepared {
                                rasterize_triangle::<W, S>(&mut region, triangle, shader, &mut local);
                            }
                            local
                        })
                    })
                    .collect();

                for worker in workers {
                    match worker.join() {
                        Ok(local) => stats.merge_pixels(&local),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
            });
        }

        if self.collect_stats {
            self.sink.frame_finished(&self.stats);
        }
    }
}

//! lane-raster viewer
//!
//! Draws a rotating sphere and cube with the software renderer and shows the
//! result in a window:
//! - `Space` pauses the rotation
//! - `Up` / `Down` tilt the camera
//! - `W` / `S` move the camera forward and back
//! - `P` saves a PNG screenshot
//!
//! An optional RON config path can be passed as the first argument.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use lane_raster::glam;
use lane_raster::{shapes, BlinnPhong, Framebuffer, RenderConfig, Renderer, TracingSink, LANE_WIDTH};
use macroquad::prelude::*;
use std::path::PathBuf;

const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;

/// Degrees per frame
const SPIN_SPEED: f32 = 0.5;
const PITCH_STEP: f32 = 1.0;
/// World units per frame
const MOVE_STEP: f32 = 0.02;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("lane-raster v{}", VERSION),
        window_width: WIDTH,
        window_height: HEIGHT,
        window_resizable: true,
        ..Default::default()
    }
}

fn load_config() -> RenderConfig {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return RenderConfig::default();
    };
    match RenderConfig::load(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        Err(e) => {
            tracing::error!("{e}; falling back to defaults");
            RenderConfig::default()
        }
    }
}

fn viewport_size() -> (usize, usize) {
    (screen_width().max(1.0) as usize, screen_height().max(1.0) as usize)
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = load_config();
    let mut renderer: Renderer = match Renderer::new(&config) {
        Ok(renderer) => renderer.with_sink(TracingSink),
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };
    let mut shader = BlinnPhong::new(&config.shading, renderer.camera().eye());

    let mut meshes = [shapes::sphere(28), shapes::cube()];
    let placements = [glam::Vec3::new(-1.0, 0.5, -2.0), glam::Vec3::new(1.0, 0.0, -2.0)];

    let (width, height) = viewport_size();
    let mut fb = Framebuffer::new(width, height);
    let mut angle = 0.0f32;
    let mut paused = false;
    let mut screenshots = 0u32;

    tracing::info!(
        version = VERSION,
        lane_width = LANE_WIDTH,
        threads = renderer.threads(),
        "viewer started"
    );

    loop {
        let size = viewport_size();
        if size != (fb.width, fb.height) {
            fb.resize(size.0, size.1);
        }

        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if is_key_down(KeyCode::Up) {
            renderer.camera_mut().pitch += PITCH_STEP.to_radians();
        }
        if is_key_down(KeyCode::Down) {
            renderer.camera_mut().pitch -= PITCH_STEP.to_radians();
        }
        let forward = is_key_down(KeyCode::W) as i32 - is_key_down(KeyCode::S) as i32;
        if forward != 0 {
            renderer.camera_mut().eye.z -= forward as f32 * MOVE_STEP;
            shader.set_eye(renderer.camera().eye());
        }
        if !paused {
            angle = (angle + SPIN_SPEED) % 360.0;
        }

        let rotation = glam::Mat4::from_rotation_y(angle.to_radians());
        for (mesh, offset) in meshes.iter_mut().zip(placements) {
            mesh.set_transform(glam::Mat4::from_translation(offset) * rotation);
        }

        renderer.render_frame(&mut fb, &meshes, &shader);

        if is_key_pressed(KeyCode::P) {
            let path = format!("lane-raster-{screenshots:03}.png");
            match fb.save_png(&path) {
                Ok(()) => {
                    tracing::info!(%path, "saved screenshot");
                    screenshots += 1;
                }
                Err(e) => tracing::error!("{e}"),
            }
        }

        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.to_rgba8());
        texture.set_filter(FilterMode::Nearest);
        draw_texture(&texture, 0.0, 0.0, WHITE);

        let stats = renderer.stats();
        draw_text(&stats.to_string(), 10.0, 20.0, 18.0, YELLOW);
        draw_text(
            &format!(
                "{} fps | W={} | {}x{} regions{}",
                get_fps(),
                LANE_WIDTH,
                renderer.grid(),
                renderer.grid(),
                if paused { " | paused" } else { "" }
            ),
            10.0,
            40.0,
            18.0,
            YELLOW,
        );

        next_frame().await
    }
}

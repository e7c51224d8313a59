//! Frame rendering benchmarks.
//!
//! Renders the viewer scene (sphere and cube) at every lane width, then the
//! default width over a 2x2 worker grid.
//!
//! Run with: cargo bench --bench frame

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lane_raster::glam::{Mat4, Vec3};
use lane_raster::{shapes, BlinnPhong, Framebuffer, Mesh, RenderConfig, Renderer};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

fn scene() -> Vec<Mesh> {
    let rotation = Mat4::from_rotation_y(30f32.to_radians());
    vec![
        shapes::sphere(28).with_transform(Mat4::from_translation(Vec3::new(-1.0, 0.5, -2.0)) * rotation),
        shapes::cube().with_transform(Mat4::from_translation(Vec3::new(1.0, 0.0, -2.0)) * rotation),
    ]
}

fn render_at_width<const W: usize>(c: &mut Criterion, name: &str, config: &RenderConfig) {
    let meshes = scene();
    let mut renderer: Renderer<W> = Renderer::new(config).expect("valid config");
    let shader = BlinnPhong::new(&config.shading, renderer.camera().eye());
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);

    let mut group = c.benchmark_group("frame");
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));
    group.bench_function(name, |b| {
        b.iter(|| {
            renderer.render_frame(&mut fb, black_box(&meshes), &shader);
            black_box(fb.pixels[WIDTH * HEIGHT / 2])
        });
    });
    group.finish();
}

fn benchmark_lane_widths(c: &mut Criterion) {
    let config = RenderConfig::default();
    render_at_width::<1>(c, "w1_single_thread", &config);
    render_at_width::<4>(c, "w4_single_thread", &config);
    render_at_width::<8>(c, "w8_single_thread", &config);
}

fn benchmark_threaded(c: &mut Criterion) {
    let config = RenderConfig {
        threads: 4,
        ..RenderConfig::default()
    };
    render_at_width::<8>(c, "w8_2x2_grid", &config);
}

criterion_group!(benches, benchmark_lane_widths, benchmark_threaded);
criterion_main!(benches);

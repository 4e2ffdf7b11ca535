//! Benchmarks for the CPU shading reference and mesh generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};

use iridescent::shader::generate_render_shader;
use iridescent::shading::{compose_fragment, displace_vertex, fractal_noise, wavelength_to_rgb, FragmentInput};
use iridescent::textures::repeat_uv;
use iridescent::{IcoSphere, NoiseTexture, ShadingParams};

fn bench_fractal_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("fractal_noise");
    let p = Vec3::new(0.37, 1.91, -4.2);

    for octaves in [1u32, 3, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(octaves), &octaves, |b, &octaves| {
            b.iter(|| black_box(fractal_noise(black_box(p), octaves, 1.0)))
        });
    }

    group.finish();
}

fn bench_fragment(c: &mut Criterion) {
    let params = ShadingParams::default();
    let camera = Vec3::new(0.0, -3.0, 8.0);

    c.bench_function("wavelength_to_rgb", |b| {
        b.iter(|| black_box(wavelength_to_rgb(black_box(555.0))))
    });

    c.bench_function("compose_fragment", |b| {
        let input = FragmentInput {
            normal: Vec3::new(0.3, 0.4, 0.866),
            position: Vec3::new(0.75, 1.0, 2.16),
            noise_sample: 0.42,
        };
        b.iter(|| black_box(compose_fragment(black_box(&input), camera, &params)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_frame");
    group.sample_size(10);

    let params = ShadingParams::default();
    let texture = NoiseTexture::noise(256, 0);
    let camera = Vec3::new(0.0, -3.0, 8.0);

    for detail in [8u32, 20] {
        let mesh = IcoSphere::new(2.5, detail);
        group.bench_with_input(BenchmarkId::from_parameter(detail), &mesh, |b, mesh| {
            b.iter(|| {
                let mut acc = 0.0;
                for v in mesh.vertices() {
                    let normal = Vec3::from(v.normal);
                    let displaced = displace_vertex(Vec3::from(v.position), normal, 1.0, &params);
                    let noise_sample =
                        texture.sample_red(repeat_uv(Vec2::from(v.uv), params.noise_strength));
                    let input = FragmentInput {
                        normal,
                        position: displaced,
                        noise_sample,
                    };
                    acc += compose_fragment(&input, camera, &params).x;
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}

fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("icosphere");
    group.sample_size(10);

    for detail in [5u32, 20, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(detail), &detail, |b, &detail| {
            b.iter(|| black_box(IcoSphere::new(2.5, detail)))
        });
    }

    group.finish();
}

fn bench_shader_gen(c: &mut Criterion) {
    c.bench_function("generate_render_shader", |b| {
        b.iter(|| black_box(generate_render_shader()))
    });
}

criterion_group!(
    benches,
    bench_fractal_noise,
    bench_fragment,
    bench_frame,
    bench_mesh,
    bench_shader_gen
);
criterion_main!(benches);

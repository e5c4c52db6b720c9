use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use isomesh_mc::{Dims, Pitch, Volume, extract, extract_slabs};

fn ball(n: usize) -> Vec<f32> {
    let c = (n as f32 - 1.0) * 0.5;
    let r = c * 0.8;
    let mut data = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let (dx, dy, dz) = (x as f32 - c, y as f32 - c, z as f32 - c);
                data.push(r - (dx * dx + dy * dy + dz * dz).sqrt());
            }
        }
    }
    data
}

// Layered sine field: many small closed pieces, lots of shared edges.
fn gyroid(n: usize) -> Vec<f32> {
    let s = 0.35f32;
    let mut data = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let (x, y, z) = (x as f32 * s, y as f32 * s, z as f32 * s);
                data.push(x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos());
            }
        }
    }
    data
}

fn bench_extract_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_sphere");
    for n in [64usize, 128] {
        let data = ball(n);
        let vol = Volume::new(&data, Dims::cube(n), Pitch::UNIT).unwrap();
        group.bench_with_input(BenchmarkId::new("serial", n), &vol, |b, vol| {
            b.iter(|| black_box(extract(vol, 0.0, None).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("slabs8", n), &vol, |b, vol| {
            b.iter(|| black_box(extract_slabs(vol, 0.0, None, 8).unwrap()))
        });
    }
    group.finish();
}

fn bench_extract_gyroid_u8(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_gyroid_u8");
    let n = 96;
    let bytes: Vec<u8> = gyroid(n)
        .into_iter()
        .map(|v| ((v + 1.5) * 85.0).clamp(0.0, 255.0) as u8)
        .collect();
    let vol = Volume::new(&bytes, Dims::cube(n), Pitch::UNIT).unwrap();
    group.bench_function("serial_96", |b| b.iter(|| black_box(extract(&vol, 128, None).unwrap())));
    group.bench_function("slabs8_96", |b| {
        b.iter(|| black_box(extract_slabs(&vol, 128, None, 8).unwrap()))
    });
    group.finish();
}

fn long_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(15))
        .warm_up_time(Duration::from_secs(3))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = long_config();
    targets =
        bench_extract_sphere,
        bench_extract_gyroid_u8
}
criterion_main!(benches);

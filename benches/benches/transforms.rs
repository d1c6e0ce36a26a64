use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use opsin_color::cube_root::cube_root_and_add;
use opsin_color::ycbcr::rgb_to_ycbcr;
use opsin_color::{to_xyb, AbsorbanceTable};
use opsin_core::{ColorEncoding, Image3F, ImageBundle, ImageMetadata};

fn gradient_bundle<'m>(
    metadata: &'m ImageMetadata,
    encoding: ColorEncoding,
    xsize: usize,
    ysize: usize,
) -> ImageBundle<'m> {
    let mut color = Image3F::new(xsize, ysize);
    for c in 0..3 {
        for y in 0..ysize {
            for (x, v) in color.plane_row_mut(c, y)[..xsize].iter_mut().enumerate() {
                *v = ((c * 37 + y * 11 + x * 3) % 97) as f32 / 96.0;
            }
        }
    }
    let mut bundle = ImageBundle::new(metadata);
    bundle.set_from_image(color, encoding);
    bundle
}

/// Benchmark the cube root kernel at each lane width
fn benchmark_cube_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_root_and_add");

    let samples: Vec<f32> = (0..4096).map(|i| i as f32 / 4096.0 * 20.0).collect();

    group.bench_function("scalar", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for &x in &samples {
                acc += cube_root_and_add(black_box(x), 0.0);
            }
            acc
        });
    });

    group.bench_function("f32x8", |b| {
        b.iter(|| {
            let mut acc = wide::f32x8::splat(0.0);
            for chunk in samples.chunks_exact(8) {
                let mut lanes = [0.0f32; 8];
                lanes.copy_from_slice(chunk);
                acc = acc + cube_root_and_add(black_box(wide::f32x8::new(lanes)), wide::f32x8::splat(0.0));
            }
            acc
        });
    });

    group.finish();
}

/// Benchmark the single-sample XYB conversion
fn benchmark_xyb_sample(c: &mut Criterion) {
    let table = AbsorbanceTable::new();
    c.bench_function("linear_rgb_to_xyb", |b| {
        b.iter(|| {
            opsin_color::linear_rgb_to_xyb(
                black_box(0.5),
                black_box(0.3),
                black_box(0.8),
                &table,
            )
        });
    });
}

/// Benchmark the full image conversion with and without a thread pool
fn benchmark_to_xyb(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_xyb");
    let metadata = ImageMetadata::default();
    let pool = rayon::ThreadPoolBuilder::new().build().unwrap();

    for size in [64usize, 256, 512] {
        group.throughput(Throughput::Elements((size * size) as u64));

        let linear = gradient_bundle(&metadata, ColorEncoding::linear_srgb(false), size, size);
        group.bench_with_input(BenchmarkId::new("linear_seq", size), &size, |b, &size| {
            let mut xyb = Image3F::new(size, size);
            b.iter(|| to_xyb(black_box(&linear), None, &mut xyb, None).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("linear_pool", size), &size, |b, &size| {
            let mut xyb = Image3F::new(size, size);
            b.iter(|| to_xyb(black_box(&linear), Some(&pool), &mut xyb, None).unwrap());
        });

        let srgb = gradient_bundle(&metadata, ColorEncoding::srgb(false), size, size);
        group.bench_with_input(BenchmarkId::new("srgb_seq", size), &size, |b, &size| {
            let mut xyb = Image3F::new(size, size);
            let mut scratch = ImageBundle::new(&metadata);
            b.iter(|| to_xyb(black_box(&srgb), None, &mut xyb, Some(&mut scratch)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark YCbCr conversion
fn benchmark_ycbcr(c: &mut Criterion) {
    let mut group = c.benchmark_group("rgb_to_ycbcr");
    let pool = rayon::ThreadPoolBuilder::new().build().unwrap();

    for size in [256usize, 512] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let metadata = ImageMetadata::default();
        let bundle = gradient_bundle(&metadata, ColorEncoding::srgb(false), size, size);
        let image = bundle.color();

        group.bench_with_input(BenchmarkId::new("seq", size), &size, |b, _| {
            b.iter(|| {
                rgb_to_ycbcr(
                    black_box(image.plane(0)),
                    black_box(image.plane(1)),
                    black_box(image.plane(2)),
                    None,
                )
            });
        });
        group.bench_with_input(BenchmarkId::new("pool", size), &size, |b, _| {
            b.iter(|| {
                rgb_to_ycbcr(
                    black_box(image.plane(0)),
                    black_box(image.plane(1)),
                    black_box(image.plane(2)),
                    Some(&pool),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_cube_root,
    benchmark_xyb_sample,
    benchmark_to_xyb,
    benchmark_ycbcr
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use segdisp::{
    charmap, composite, CellLayout, DisplayConfig, DisplayId, DisplayStyle, Layer, LitMask,
    RasterCache, SegmentType, Surface,
};

const TY: SegmentType = SegmentType::Alphanumeric14;

fn criterion_benchmark(c: &mut Criterion) {
    let cache = RasterCache::with_builtin_geometry();
    let style = DisplayStyle::default();
    let config = DisplayConfig::new(
        DisplayId(0),
        TY,
        CellLayout::new([48, 72]).with_padding([8.0, 8.0]),
    );
    cache.rasterize_all(&config, &style).unwrap();

    c.bench_function("rasterize_all", |b| {
        b.iter(|| cache.rasterize_all(black_box(&config), &style).unwrap());
    });

    c.bench_function("rasterize_layer/outer_glow", |b| {
        b.iter(|| {
            cache
                .rasterize_layer(
                    config.id,
                    Layer::OuterGlow,
                    &style.outer_glow,
                    0..16,
                    style.skew_angle,
                )
                .unwrap()
        });
    });

    let mut group = c.benchmark_group("composite");
    let mut frame = Surface::new([48 * 8, 72]);
    for &(name, text) in &[
        ("blank", "        "),
        ("eights", "8.8.8.8.8.8.8.8."),
        ("text", "HELLO ST"),
    ] {
        let masks = charmap::text_masks(TY, text);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                for (i, &lit) in masks.iter().enumerate() {
                    composite(
                        &cache,
                        config.id,
                        TY,
                        black_box(lit),
                        &style,
                        &mut frame,
                        [i as isize * 48, 0],
                    );
                }
            });
        });
    }
    group.bench_function("all_segments", |b| {
        b.iter(|| {
            composite(&cache, config.id, TY, black_box(LitMask::all(16)), &style, &mut frame, [0, 0]);
        });
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

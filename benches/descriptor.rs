use criterion::{Criterion, black_box, criterion_group, criterion_main};
use imretrieve::{ColorImage, DescriptorFactory, DescriptorKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// 带噪声的色块图片，比纯随机像素更接近真实照片
fn generate_image(width: usize, height: usize) -> ColorImage {
    let mut rng = StdRng::seed_from_u64(42);
    let palette: Vec<[u8; 3]> = (0..8).map(|_| rng.random()).collect();
    let noise: Vec<u8> = (0..width * height).map(|_| rng.random::<u8>() & 0x0F).collect();
    ColorImage::from_fn(width, height, |x, y| {
        let base = palette[(x / 64 + y / 64) % palette.len()];
        let n = noise[y * width + x];
        base.map(|c| c.saturating_add(n))
    })
}

fn bench_descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptor");
    let factory = DescriptorFactory::default();

    for (w, h) in black_box(vec![(320, 240), (640, 480)]) {
        let image = generate_image(w, h);
        for kind in [
            DescriptorKind::SingleColor,
            DescriptorKind::DominantColor,
            DescriptorKind::ColorStructure,
            DescriptorKind::ScalableColor,
            DescriptorKind::Gridded,
        ] {
            group.bench_function(format!("{kind}_{w}x{h}"), |b| b.iter(|| factory.create(kind, &image).unwrap()));
        }
    }

    group.finish();
}

criterion_group!(benches, bench_descriptors);
criterion_main!(benches);

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fastblur::{box3, downscaled_box_blur_in_place, gaussian_blur, PixelBufMut, ResampleMethod};

const W: usize = 512;
const H: usize = 512;
const STRIDE: usize = W * 4;

fn gradient_image() -> Vec<u8> {
    let mut data = vec![0u8; STRIDE * H];
    for y in 0..H {
        for x in 0..W {
            let at = y * STRIDE + x * 4;
            data[at] = (x * 255 / W) as u8;
            data[at + 1] = (y * 255 / H) as u8;
            data[at + 2] = ((x + y) * 255 / (W + H)) as u8;
            data[at + 3] = 255;
        }
    }
    data
}

fn bench_blurs(c: &mut Criterion) {
    let base = gradient_image();

    c.bench_function("box3_512_r8", |b| {
        b.iter(|| {
            let mut data = base.clone();
            let mut buf = PixelBufMut::new(&mut data, W, H, STRIDE).unwrap();
            box3(&mut buf, black_box(8));
        });
    });

    c.bench_function("downscaled_512_r8", |b| {
        b.iter(|| {
            let mut data = base.clone();
            let mut buf = PixelBufMut::new(&mut data, W, H, STRIDE).unwrap();
            downscaled_box_blur_in_place(&mut buf, black_box(8.0), 0.5, ResampleMethod::Nearest);
        });
    });

    c.bench_function("gaussian_512_s4", |b| {
        b.iter(|| {
            let mut data = base.clone();
            let mut buf = PixelBufMut::new(&mut data, W, H, STRIDE).unwrap();
            gaussian_blur(&mut buf, black_box(4.0), false);
        });
    });

    #[cfg(feature = "simd")]
    c.bench_function("gaussian_simd_512_s4", |b| {
        b.iter(|| {
            let mut data = base.clone();
            let mut buf = PixelBufMut::new(&mut data, W, H, STRIDE).unwrap();
            fastblur::gaussian_blur_simd(&mut buf, black_box(4.0), false);
        });
    });
}

criterion_group!(benches, bench_blurs);
criterion_main!(benches);

//! Property tests for the recursive Gaussian paths: no-op thresholds,
//! DC preservation, smoothing monotonicity, symmetry, and agreement
//! between the scalar and vectorized implementations.

use super::*;
use crate::boxblur::box3;
use crate::buffer::PixelBufMut;

const STRIDE_PAD: usize = 8;

fn make_canvas(w: usize, h: usize, fill: [u8; 4]) -> (Vec<u8>, usize) {
    let stride = w * 4 + STRIDE_PAD;
    let mut data = vec![0xEE; stride * h];
    for y in 0..h {
        for x in 0..w {
            data[y * stride + x * 4..y * stride + x * 4 + 4].copy_from_slice(&fill);
        }
    }
    (data, stride)
}

fn checkerboard(w: usize, h: usize) -> (Vec<u8>, usize) {
    let (mut data, stride) = make_canvas(w, h, [0, 0, 0, 255]);
    for y in 0..h {
        for x in 0..w {
            if (x / 4 + y / 4) % 2 == 0 {
                let at = y * stride + x * 4;
                data[at] = 255;
                data[at + 1] = 255;
                data[at + 2] = 255;
            }
        }
    }
    (data, stride)
}

fn variance(data: &[u8], w: usize, h: usize, stride: usize, channel: usize) -> f64 {
    let n = (w * h) as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let v = data[y * stride + x * 4 + channel] as f64;
            sum += v;
            sum_sq += v * v;
        }
    }
    sum_sq / n - (sum / n) * (sum / n)
}

fn max_channel_diff(a: &[u8], b: &[u8], w: usize, h: usize, stride: usize) -> u8 {
    let mut worst = 0u8;
    for y in 0..h {
        for x in 0..w {
            for c in 0..4 {
                let at = y * stride + x * 4 + c;
                worst = worst.max(a[at].abs_diff(b[at]));
            }
        }
    }
    worst
}

#[test]
fn test_coefficients_preserve_dc() {
    for sigma in [0.5f32, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0] {
        let c = DericheCoeffs::from_sigma(sigma);
        // Combined steady-state gain of both sweeps must be unity.
        let dc = c.coefp + c.coefn;
        assert!((dc - 1.0).abs() < 1e-3, "sigma={sigma}: dc={dc}");
        // And the boundary gains must be consistent with the taps.
        let denom = 1.0 + c.b1 + c.b2;
        let taps = c.a0 + c.a1 + c.a2 + c.a3;
        assert!((taps / denom - 1.0).abs() < 1e-3, "sigma={sigma}");
    }
}

#[test]
fn test_sigma_below_threshold_is_noop() {
    let (mut data, stride) = checkerboard(16, 16);
    let before = data.clone();
    let mut buf = PixelBufMut::new(&mut data, 16, 16, stride).unwrap();
    gaussian_blur(&mut buf, 0.1, false);
    gaussian_blur(&mut buf, 0.0, true);
    gaussian_blur(&mut buf, -4.0, false);
    assert_eq!(data, before);
}

#[test]
fn test_uniform_image_preserved() {
    for sigma in [1.0f32, 5.0, 50.0] {
        let (mut data, stride) = make_canvas(32, 32, [37, 99, 200, 255]);
        let before = data.clone();
        let mut buf = PixelBufMut::new(&mut data, 32, 32, stride).unwrap();
        gaussian_blur(&mut buf, sigma, false);
        assert!(
            max_channel_diff(&data, &before, 32, 32, stride) <= 1,
            "sigma={sigma}"
        );
    }
}

#[test]
fn test_variance_decreases_with_sigma() {
    let (base, stride) = checkerboard(32, 32);
    let mut last = f64::INFINITY;
    for sigma in [2.0f32, 4.0, 8.0] {
        let mut data = base.clone();
        let mut buf = PixelBufMut::new(&mut data, 32, 32, stride).unwrap();
        gaussian_blur(&mut buf, sigma, false);
        let var = variance(&data, 32, 32, stride, 0);
        assert!(var < last, "variance {var} not below {last} at sigma={sigma}");
        last = var;
    }
}

#[test]
fn test_center_impulse_radially_symmetric() {
    // White field, one black pixel in the center; the response must be
    // symmetric across both axes and under transposition, within one
    // quantization step per pass.
    let w = 64;
    let h = 64;
    let (mut data, stride) = make_canvas(w, h, [255, 255, 255, 255]);
    let (cx, cy) = (w / 2, h / 2);
    for c in 0..3 {
        data[cy * stride + cx * 4 + c] = 0;
    }
    let mut buf = PixelBufMut::new(&mut data, w, h, stride).unwrap();
    gaussian_blur(&mut buf, 5.0, false);

    let at = |x: usize, y: usize| data[y * stride + x * 4];
    for d in 1..14 {
        let right = at(cx + d, cy);
        let left = at(cx - d, cy);
        let down = at(cx, cy + d);
        let up = at(cx, cy - d);
        assert!(right.abs_diff(left) <= 1, "x mirror broken at d={d}");
        assert!(down.abs_diff(up) <= 1, "y mirror broken at d={d}");
        assert!(right.abs_diff(down) <= 1, "transpose broken at d={d}");
    }
    // It must actually blur: the impulse spreads.
    assert!(at(cx, cy) > 0);
    assert!(at(cx + 3, cy) < 255);
}

#[test]
fn test_matches_triple_box_on_step_edge() {
    // Triple box of radius r has variance r*(r+1), so radius 6 pairs
    // with sigma ~ sqrt(42) ~ 6.5. The two approximators must agree to
    // a mean absolute difference under 5 on an 8-bit step edge.
    let w = 64;
    let h = 64;
    let (mut boxed, stride) = make_canvas(w, h, [0, 0, 0, 255]);
    for y in 0..h {
        for x in w / 2..w {
            let at = y * stride + x * 4;
            boxed[at] = 255;
            boxed[at + 1] = 255;
            boxed[at + 2] = 255;
        }
    }
    let mut gaussed = boxed.clone();

    let mut buf = PixelBufMut::new(&mut boxed, w, h, stride).unwrap();
    box3(&mut buf, 6);
    let mut buf = PixelBufMut::new(&mut gaussed, w, h, stride).unwrap();
    gaussian_blur(&mut buf, 6.5, false);

    let mut total = 0u64;
    for y in 0..h {
        for x in 0..w {
            let at = y * stride + x * 4;
            total += boxed[at].abs_diff(gaussed[at]) as u64;
        }
    }
    let mad = total as f64 / (w * h) as f64;
    assert!(mad < 5.0, "mean absolute difference {mad}");
}

#[test]
fn test_stride_padding_does_not_leak() {
    // The same image content must blur identically whether or not the
    // rows carry alignment padding.
    let w = 16;
    let h = 16;
    let (mut padded, stride) = checkerboard(w, h);
    let mut tight = vec![0u8; w * 4 * h];
    for y in 0..h {
        tight[y * w * 4..(y + 1) * w * 4]
            .copy_from_slice(&padded[y * stride..y * stride + w * 4]);
    }

    let mut buf = PixelBufMut::new(&mut padded, w, h, stride).unwrap();
    gaussian_blur(&mut buf, 3.0, false);
    let mut buf = PixelBufMut::new(&mut tight, w, h, w * 4).unwrap();
    gaussian_blur(&mut buf, 3.0, false);

    for y in 0..h {
        assert_eq!(
            &padded[y * stride..y * stride + w * 4],
            &tight[y * w * 4..(y + 1) * w * 4],
            "row {y}"
        );
    }
    // Padding bytes survive untouched (last row has none).
    for y in 0..h - 1 {
        let pad = &padded[y * stride + w * 4..(y + 1) * stride];
        assert!(pad.iter().all(|&b| b == 0xEE), "padding clobbered in row {y}");
    }
}

#[test]
fn test_single_row_and_single_column() {
    let (mut row, stride) = make_canvas(16, 1, [100, 150, 200, 255]);
    let before = row.clone();
    let mut buf = PixelBufMut::new(&mut row, 16, 1, stride).unwrap();
    gaussian_blur(&mut buf, 4.0, false);
    assert!(max_channel_diff(&row, &before, 16, 1, stride) <= 1);

    let (mut col, stride) = make_canvas(1, 16, [100, 150, 200, 255]);
    let before = col.clone();
    let mut buf = PixelBufMut::new(&mut col, 1, 16, stride).unwrap();
    gaussian_blur(&mut buf, 4.0, false);
    assert!(max_channel_diff(&col, &before, 1, 16, stride) <= 1);
}

#[test]
fn test_wrappers_match_flag_forms() {
    let (base, stride) = checkerboard(16, 16);

    let mut a = base.clone();
    let mut buf = PixelBufMut::new(&mut a, 16, 16, stride).unwrap();
    gaussian_blur_fast(&mut buf, 3.0);
    let mut b = base.clone();
    let mut buf = PixelBufMut::new(&mut b, 16, 16, stride).unwrap();
    gaussian_blur(&mut buf, 3.0, false);
    assert_eq!(a, b);

    let mut a = base.clone();
    let mut buf = PixelBufMut::new(&mut a, 16, 16, stride).unwrap();
    gaussian_blur_quality(&mut buf, 3.0);
    let mut b = base;
    let mut buf = PixelBufMut::new(&mut b, 16, 16, stride).unwrap();
    gaussian_blur(&mut buf, 3.0, true);
    assert_eq!(a, b);
}

#[cfg(feature = "simd")]
mod simd_parity {
    use super::*;
    use crate::gaussian::simd::gaussian_blur_simd;

    fn textured(w: usize, h: usize) -> (Vec<u8>, usize) {
        let (mut data, stride) = make_canvas(w, h, [0, 0, 0, 255]);
        for y in 0..h {
            for x in 0..w {
                let at = y * stride + x * 4;
                data[at] = ((x * 17 + y * 3) % 256) as u8;
                data[at + 1] = ((x * 5 + y * 29) % 256) as u8;
                data[at + 2] = ((x * 11 + y * 13) % 256) as u8;
                data[at + 3] = 255;
            }
        }
        (data, stride)
    }

    #[test]
    fn test_capability_reported() {
        assert!(simd_available());
    }

    #[test]
    fn test_simd_noop_below_threshold() {
        let (mut data, stride) = textured(8, 8);
        let before = data.clone();
        let mut buf = PixelBufMut::new(&mut data, 8, 8, stride).unwrap();
        gaussian_blur_simd(&mut buf, 0.05, false);
        assert_eq!(data, before);
    }

    #[test]
    fn test_simd_uniform_image_preserved() {
        let (mut data, stride) = make_canvas(32, 32, [37, 99, 200, 255]);
        let before = data.clone();
        let mut buf = PixelBufMut::new(&mut data, 32, 32, stride).unwrap();
        gaussian_blur_simd(&mut buf, 5.0, false);
        assert!(max_channel_diff(&data, &before, 32, 32, stride) <= 1);
    }

    #[test]
    fn test_simd_matches_scalar_nonlinear() {
        let (base, stride) = textured(48, 32);
        let mut scalar = base.clone();
        let mut buf = PixelBufMut::new(&mut scalar, 48, 32, stride).unwrap();
        gaussian_blur(&mut buf, 3.0, false);
        let mut vector = base;
        let mut buf = PixelBufMut::new(&mut vector, 48, 32, stride).unwrap();
        gaussian_blur_simd(&mut buf, 3.0, false);
        let worst = max_channel_diff(&scalar, &vector, 48, 32, stride);
        assert!(worst <= 2, "worst channel difference {worst}");
    }

    #[test]
    fn test_simd_matches_scalar_linear() {
        // The reciprocal-square-root estimate only enters the linear
        // path; tolerance covers its residual error.
        let (base, stride) = textured(48, 32);
        let mut scalar = base.clone();
        let mut buf = PixelBufMut::new(&mut scalar, 48, 32, stride).unwrap();
        gaussian_blur(&mut buf, 3.0, true);
        let mut vector = base;
        let mut buf = PixelBufMut::new(&mut vector, 48, 32, stride).unwrap();
        gaussian_blur_simd(&mut buf, 3.0, true);
        let worst = max_channel_diff(&scalar, &vector, 48, 32, stride);
        assert!(worst <= 2, "worst channel difference {worst}");
    }

    #[test]
    fn test_auto_dispatch_uses_vector_path() {
        let (base, stride) = textured(24, 24);
        let mut auto = base.clone();
        let mut buf = PixelBufMut::new(&mut auto, 24, 24, stride).unwrap();
        gaussian_blur_auto(&mut buf, 4.0, false);
        let mut vector = base;
        let mut buf = PixelBufMut::new(&mut vector, 24, 24, stride).unwrap();
        gaussian_blur_simd(&mut buf, 4.0, false);
        assert_eq!(auto, vector);
    }
}

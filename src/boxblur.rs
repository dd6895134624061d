//! Separable sliding-window box filter and its Gaussian approximations.
//!
//! One box pass is a horizontal then vertical moving average of width
//! `2*radius + 1` with edge replication. The window slides in O(1) per
//! pixel: subtract the outgoing edge sample, add the incoming one.
//! Three passes approximate a Gaussian (central limit theorem) at
//! O(1)-in-sigma cost; the effective sigma of the triple pass is
//! `sqrt(r*(r+1))`.
//!
//! The downsample fast path shrinks the image first, runs a single box
//! pass on the small image, and scales back up; the resampling itself
//! smooths, so a triple pass there would over-blur.

use tracing::debug;

use crate::buffer::{PixelBuf, PixelBufMut, BYTES_PER_PIXEL};
use crate::resample::{resample_into, ResampleMethod};

/// Largest radius the triple-pass blur accepts before clamping.
pub const MAX_BOX_RADIUS: i32 = 50;
/// Radius bounds for the downsample fast path.
pub const MAX_DOWNSCALED_RADIUS: f32 = 25.0;
/// Downscale factor bounds for the downsample fast path.
pub const MIN_DOWNSCALE: f32 = 0.01;

/// Horizontal sliding-window average, `src` and `dst` same geometry.
fn box_blur_h(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    w: usize,
    h: usize,
    radius: usize,
) {
    let diameter = 2 * radius + 1;
    let inv = 1.0 / diameter as f32;

    for y in 0..h {
        let src_row = &src[y * src_stride..y * src_stride + w * BYTES_PER_PIXEL];
        let dst_row = &mut dst[y * dst_stride..y * dst_stride + w * BYTES_PER_PIXEL];

        // Prime the window over [-radius, radius], edge-replicated.
        let mut sum = [0i32; 4];
        for i in -(radius as isize)..=(radius as isize) {
            let x = i.clamp(0, w as isize - 1) as usize;
            for c in 0..4 {
                sum[c] += src_row[x * 4 + c] as i32;
            }
        }

        for x in 0..w {
            for c in 0..4 {
                dst_row[x * 4 + c] = (sum[c] as f32 * inv + 0.5) as u8;
            }
            let x_out = x.saturating_sub(radius);
            let x_in = (x + radius + 1).min(w - 1);
            for c in 0..4 {
                sum[c] += src_row[x_in * 4 + c] as i32 - src_row[x_out * 4 + c] as i32;
            }
        }
    }
}

/// Vertical counterpart of [`box_blur_h`].
fn box_blur_v(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    w: usize,
    h: usize,
    radius: usize,
) {
    let diameter = 2 * radius + 1;
    let inv = 1.0 / diameter as f32;

    for x in 0..w {
        let mut sum = [0i32; 4];
        for i in -(radius as isize)..=(radius as isize) {
            let y = i.clamp(0, h as isize - 1) as usize;
            let at = y * src_stride + x * 4;
            for c in 0..4 {
                sum[c] += src[at + c] as i32;
            }
        }

        for y in 0..h {
            let at = y * dst_stride + x * 4;
            for c in 0..4 {
                dst[at + c] = (sum[c] as f32 * inv + 0.5) as u8;
            }
            let y_out = y.saturating_sub(radius);
            let y_in = (y + radius + 1).min(h - 1);
            let out_at = y_out * src_stride + x * 4;
            let in_at = y_in * src_stride + x * 4;
            for c in 0..4 {
                sum[c] += src[in_at + c] as i32 - src[out_at + c] as i32;
            }
        }
    }
}

/// One full separable pass (horizontal then vertical) on raw slices.
fn box_blur_pass_raw(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    w: usize,
    h: usize,
    radius: usize,
) {
    let mut tmp = vec![0u8; src_stride * h];
    box_blur_h(src, src_stride, &mut tmp, src_stride, w, h, radius);
    box_blur_v(&tmp, src_stride, dst, dst_stride, w, h, radius);
}

fn copy_rows(src: &[u8], src_stride: usize, dst: &mut [u8], dst_stride: usize, w: usize, h: usize) {
    for y in 0..h {
        let s = &src[y * src_stride..y * src_stride + w * BYTES_PER_PIXEL];
        dst[y * dst_stride..y * dst_stride + w * BYTES_PER_PIXEL].copy_from_slice(s);
    }
}

/// One separable box pass from `src` into `dst` (same dimensions,
/// strides may differ). A non-positive radius degenerates to the
/// identity window and copies the image through unchanged.
///
/// # Panics
/// Panics if `src` and `dst` dimensions differ.
pub fn box_blur_pass(src: PixelBuf<'_>, dst: &mut PixelBufMut<'_>, radius: i32) {
    assert_eq!(
        (src.width(), src.height()),
        (dst.width(), dst.height()),
        "box_blur_pass requires matching dimensions"
    );
    let radius = radius.max(0) as usize;
    let dst_stride = dst.stride();
    box_blur_pass_raw(
        src.data(),
        src.stride(),
        dst.data_mut(),
        dst_stride,
        src.width(),
        src.height(),
        radius,
    );
}

/// Triple-pass box blur in place: three full separable passes through a
/// ping-pong scratch buffer. `radius <= 0` is a no-op; radii above
/// [`MAX_BOX_RADIUS`] are clamped (and logged).
pub fn box3(buf: &mut PixelBufMut<'_>, radius: i32) {
    if radius <= 0 {
        return;
    }
    let radius = if radius > MAX_BOX_RADIUS {
        debug!(radius, max = MAX_BOX_RADIUS, "box radius clamped");
        MAX_BOX_RADIUS as usize
    } else {
        radius as usize
    };

    let (w, h, stride) = (buf.width(), buf.height(), buf.stride());
    let mut tmp = vec![0u8; stride * h];

    box_blur_pass_raw(buf.data(), stride, &mut tmp, stride, w, h, radius);
    box_blur_pass_raw(&tmp, stride, buf.data_mut(), stride, w, h, radius);
    box_blur_pass_raw(buf.data(), stride, &mut tmp, stride, w, h, radius);
    copy_rows(&tmp, stride, buf.data_mut(), stride, w, h);
}

#[allow(clippy::too_many_arguments)]
fn downscaled_box_blur_raw(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    w: usize,
    h: usize,
    radius: f32,
    downscale: f32,
    method: ResampleMethod,
) {
    let small_w = ((w as f32 * downscale + 0.5) as usize).max(1);
    let small_h = ((h as f32 * downscale + 0.5) as usize).max(1);
    let small_stride = small_w * BYTES_PER_PIXEL;

    debug!(w, h, small_w, small_h, downscale, radius, "downscaled box blur");

    let mut small = vec![0u8; small_stride * small_h];
    let mut blurred = vec![0u8; small_stride * small_h];

    resample_into(
        src,
        w,
        h,
        src_stride,
        &mut small,
        small_w,
        small_h,
        small_stride,
        method,
    );

    // Radius shrinks with the image; one pass only, the resampling
    // already smooths.
    let small_radius = ((radius * downscale + 0.5) as usize).max(1);
    box_blur_pass_raw(
        &small,
        small_stride,
        &mut blurred,
        small_stride,
        small_w,
        small_h,
        small_radius,
    );

    resample_into(
        &blurred,
        small_w,
        small_h,
        small_stride,
        dst,
        w,
        h,
        dst_stride,
        method,
    );
}

/// Downsample-optimized box blur from `src` into `dst` (same
/// dimensions). `downscale` is clamped to `[0.01, 1]`, `radius` to
/// `[0, 25]`; a radius under 0.5 degenerates to a plain copy.
/// `method` selects the resampling at both ends: [`ResampleMethod::Nearest`]
/// is the fast variant, [`ResampleMethod::Bilinear`] the high-quality one.
///
/// # Panics
/// Panics if `src` and `dst` dimensions differ.
pub fn downscaled_box_blur(
    src: PixelBuf<'_>,
    dst: &mut PixelBufMut<'_>,
    radius: f32,
    downscale: f32,
    method: ResampleMethod,
) {
    assert_eq!(
        (src.width(), src.height()),
        (dst.width(), dst.height()),
        "downscaled_box_blur requires matching dimensions"
    );
    let downscale = downscale.clamp(MIN_DOWNSCALE, 1.0);
    let radius = radius.clamp(0.0, MAX_DOWNSCALED_RADIUS);
    let (w, h) = (src.width(), src.height());

    if radius < 0.5 {
        let dst_stride = dst.stride();
        copy_rows(src.data(), src.stride(), dst.data_mut(), dst_stride, w, h);
        return;
    }

    let dst_stride = dst.stride();
    downscaled_box_blur_raw(
        src.data(),
        src.stride(),
        dst.data_mut(),
        dst_stride,
        w,
        h,
        radius,
        downscale,
        method,
    );
}

/// In-place form of [`downscaled_box_blur`], covering callers whose
/// source and destination are the same buffer.
pub fn downscaled_box_blur_in_place(
    buf: &mut PixelBufMut<'_>,
    radius: f32,
    downscale: f32,
    method: ResampleMethod,
) {
    let downscale = downscale.clamp(MIN_DOWNSCALE, 1.0);
    let radius = radius.clamp(0.0, MAX_DOWNSCALED_RADIUS);
    if radius < 0.5 {
        return;
    }

    let (w, h, stride) = (buf.width(), buf.height(), buf.stride());
    // The downsample step consumes the source before the upsample step
    // writes it, so reading and writing the same buffer is safe here.
    let mut out = vec![0u8; stride * h];
    downscaled_box_blur_raw(
        buf.data(),
        stride,
        &mut out,
        stride,
        w,
        h,
        radius,
        downscale,
        method,
    );
    copy_rows(&out, stride, buf.data_mut(), stride, w, h);
}

//! Nearest-neighbor and bilinear rescaling over strided BGRA8 buffers.
//!
//! Both directions (upsample and downsample) use the same coordinate
//! mapping; the only difference is which buffer is larger. Out-of-range
//! source coordinates clamp to the nearest valid pixel, never wrap or
//! mirror.

use crate::buffer::{PixelBuf, PixelBufMut, BYTES_PER_PIXEL};
use crate::pixel::{lerp, Pixel4};

/// Interpolation mode for [`resample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleMethod {
    /// Integer-truncated source mapping, channels copied verbatim.
    /// Fastest; quality loss is acceptable when a blur follows.
    Nearest,
    /// Half-pixel-center mapping, 4-tap blend per channel, rounded
    /// half-up.
    Bilinear,
}

/// Scale `src` into `dst` (any size in either direction).
pub fn resample(src: PixelBuf<'_>, dst: &mut PixelBufMut<'_>, method: ResampleMethod) {
    let (dst_w, dst_h, dst_stride) = (dst.width(), dst.height(), dst.stride());
    resample_into(
        src.data(),
        src.width(),
        src.height(),
        src.stride(),
        dst.data_mut(),
        dst_w,
        dst_h,
        dst_stride,
        method,
    );
}

/// Raw-slice form shared with the box-blur downsample path, which
/// resamples through its own scratch allocations.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resample_into(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_w: usize,
    dst_h: usize,
    dst_stride: usize,
    method: ResampleMethod,
) {
    match method {
        ResampleMethod::Nearest => {
            nearest(src, src_w, src_h, src_stride, dst, dst_w, dst_h, dst_stride);
        }
        ResampleMethod::Bilinear => {
            bilinear(src, src_w, src_h, src_stride, dst, dst_w, dst_h, dst_stride);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn nearest(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_w: usize,
    dst_h: usize,
    dst_stride: usize,
) {
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;

    for y in 0..dst_h {
        let sy = ((y as f32 * scale_y) as usize).min(src_h - 1);
        let src_row = &src[sy * src_stride..];
        let dst_row = &mut dst[y * dst_stride..y * dst_stride + dst_w * BYTES_PER_PIXEL];

        for x in 0..dst_w {
            let sx = ((x as f32 * scale_x) as usize).min(src_w - 1);
            let s = &src_row[sx * BYTES_PER_PIXEL..sx * BYTES_PER_PIXEL + BYTES_PER_PIXEL];
            dst_row[x * BYTES_PER_PIXEL..x * BYTES_PER_PIXEL + BYTES_PER_PIXEL]
                .copy_from_slice(s);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn bilinear(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_w: usize,
    dst_h: usize,
    dst_stride: usize,
) {
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;

    let tap = |x: usize, y: usize| -> Pixel4 {
        let at = y * src_stride + x * BYTES_PER_PIXEL;
        Pixel4::from_bgra8(&src[at..at + BYTES_PER_PIXEL])
    };

    for y in 0..dst_h {
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, (src_h - 1) as f32);
        let y0 = sy as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let fy = sy - y0 as f32;

        for x in 0..dst_w {
            let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, (src_w - 1) as f32);
            let x0 = sx as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let fx = sx - x0 as f32;

            let top = lerp(tap(x0, y0), tap(x1, y0), fx);
            let bottom = lerp(tap(x0, y1), tap(x1, y1), fx);
            let at = y * dst_stride + x * BYTES_PER_PIXEL;
            lerp(top, bottom, fy).write_bgra8(&mut dst[at..at + BYTES_PER_PIXEL]);
        }
    }
}

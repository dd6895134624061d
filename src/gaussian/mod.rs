//! Separable recursive (IIR) Gaussian blur, Deriche parameterization.
//!
//! The Gaussian kernel is approximated by a pair of causal/anticausal
//! second-order recursive filters, so the cost per pixel is constant in
//! sigma. Coefficients are derived from sigma in double precision and
//! the recursion runs in single precision. Image edges are handled by
//! seeding each sweep with its steady-state response to the border
//! sample, so a constant input produces a constant output with no
//! ringing or energy bleed at the boundary.
//!
//! Both sweeps consume the original scanline samples and their results
//! are summed; the causal result is staged in a per-scanline scratch so
//! the anticausal sweep never reads filtered data. This is what keeps a
//! uniform image exactly uniform (DC gain `coefp + coefn ~ 1`).
//!
//! Layout per pass: each row (or column) is deinterleaved into a planar
//! `[r | g | b | a]` f32 work buffer, the four channels are filtered
//! independently, and the result is quantized back into the pixel
//! buffer before the other axis runs.

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::buffer::PixelBufMut;
use crate::color::{linear_to_srgb_fast, srgb_to_linear_fast};

/// Sigma below which the blur is a no-op.
pub const MIN_SIGMA: f32 = 0.1;
/// Largest sigma accepted before clamping.
pub const MAX_SIGMA: f32 = 50.0;

/// Alpha below which a pixel is treated as fully transparent when
/// un-premultiplying for linear-light filtering. The smallest nonzero
/// 8-bit alpha is 1/255 ~ 0.0039, comfortably above this.
const UNPREMULTIPLY_EPS: f32 = 0.001;

/// Deriche filter coefficients, derived once per call and shared by all
/// four channels and both spatial passes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DericheCoeffs {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub a3: f32,
    pub b1: f32,
    pub b2: f32,
    /// Steady-state gain seeding the causal sweep's history.
    pub coefp: f32,
    /// Steady-state gain seeding the anticausal sweep's history.
    pub coefn: f32,
}

impl DericheCoeffs {
    pub(crate) fn from_sigma(sigma: f32) -> Self {
        let alpha = 1.695 / sigma as f64;
        let ema = (-alpha).exp();
        let ema2 = ema * ema;

        let b1 = -2.0 * ema;
        let b2 = ema2;

        let k = (1.0 - ema) * (1.0 - ema) / (1.0 + 2.0 * alpha * ema - ema2);
        let a0 = k;
        let a1 = k * ema * (alpha - 1.0);
        let a2 = k * ema * (alpha + 1.0);
        let a3 = -k * ema2;

        let denom = 1.0 + b1 + b2;
        let coefp = (a0 + a1) / denom;
        let coefn = (a2 + a3) / denom;

        Self {
            a0: a0 as f32,
            a1: a1 as f32,
            a2: a2 as f32,
            a3: a3 as f32,
            b1: b1 as f32,
            b2: b2 as f32,
            coefp: coefp as f32,
            coefn: coefn as f32,
        }
    }
}

/// Validate and clamp sigma for the recursive entry points. Returns
/// `None` when the call should be a no-op.
pub(crate) fn effective_sigma(sigma: f32) -> Option<f32> {
    if sigma.is_nan() || sigma <= MIN_SIGMA {
        return None;
    }
    if sigma > MAX_SIGMA {
        debug!(sigma, max = MAX_SIGMA, "sigma clamped");
        Some(MAX_SIGMA)
    } else {
        Some(sigma)
    }
}

/// One causal + anticausal sweep over `line`, result written back into
/// `line`. `causal` is scanline-length scratch holding the causal
/// result until the anticausal sweep has consumed the original samples.
fn iir_1d(line: &mut [f32], causal: &mut [f32], c: &DericheCoeffs) {
    let n = line.len();
    debug_assert!(n > 0 && causal.len() >= n);

    // Causal sweep, seeded with the steady-state response to line[0].
    let mut xp = line[0];
    let mut yp1 = xp * c.coefp;
    let mut yp2 = yp1;
    for i in 0..n {
        let xc = line[i];
        let yc = c.a0 * xc + c.a1 * xp - c.b1 * yp1 - c.b2 * yp2;
        causal[i] = yc;
        xp = xc;
        yp2 = yp1;
        yp1 = yc;
    }

    // Anticausal sweep over the original samples, accumulated.
    let mut xn1 = line[n - 1];
    let mut xn2 = xn1;
    let mut yn1 = xn1 * c.coefn;
    let mut yn2 = yn1;
    for i in (0..n).rev() {
        let yc = c.a2 * xn1 + c.a3 * xn2 - c.b1 * yn1 - c.b2 * yn2;
        causal[i] += yc;
        xn2 = xn1;
        xn1 = line[i];
        yn2 = yn1;
        yn1 = yc;
    }

    line.copy_from_slice(&causal[..n]);
}

/// Deinterleave one scanline into the planar work buffer, normalizing
/// to [0, 1] and optionally moving color into linear light.
///
/// `read` maps a scanline index to the pixel's byte offset.
fn load_line(
    data: &[u8],
    read: impl Fn(usize) -> usize,
    n: usize,
    work: &mut [f32],
    linear: bool,
) {
    for i in 0..n {
        let at = read(i);
        let fb = data[at] as f32 / 255.0;
        let fg = data[at + 1] as f32 / 255.0;
        let fr = data[at + 2] as f32 / 255.0;
        let fa = data[at + 3] as f32 / 255.0;

        let (fr, fg, fb) = if linear {
            if fa > UNPREMULTIPLY_EPS {
                (
                    srgb_to_linear_fast(fr / fa),
                    srgb_to_linear_fast(fg / fa),
                    srgb_to_linear_fast(fb / fa),
                )
            } else {
                (0.0, 0.0, 0.0)
            }
        } else {
            (fr, fg, fb)
        };

        work[i] = fr;
        work[n + i] = fg;
        work[2 * n + i] = fb;
        work[3 * n + i] = fa;
    }
}

/// Quantize the planar work buffer back into the scanline, undoing the
/// linear-light transform. Alpha is clamped to [0, 1] before it is used
/// as the premultiplication factor.
fn store_line(
    data: &mut [u8],
    write: impl Fn(usize) -> usize,
    n: usize,
    work: &[f32],
    linear: bool,
) {
    for i in 0..n {
        let mut fr = work[i];
        let mut fg = work[n + i];
        let mut fb = work[2 * n + i];
        let fa = work[3 * n + i].clamp(0.0, 1.0);

        if linear {
            fr = linear_to_srgb_fast(fr) * fa;
            fg = linear_to_srgb_fast(fg) * fa;
            fb = linear_to_srgb_fast(fb) * fa;
        }

        let at = write(i);
        data[at] = (fb * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
        data[at + 1] = (fg * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
        data[at + 2] = (fr * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
        data[at + 3] = (fa * 255.0 + 0.5) as u8;
    }
}

#[allow(clippy::too_many_arguments)]
fn blur_axis(
    data: &mut [u8],
    lines: usize,
    n: usize,
    line_of: impl Fn(usize, usize) -> usize,
    c: &DericheCoeffs,
    work: &mut [f32],
    causal: &mut [f32],
    linear: bool,
) {
    for line in 0..lines {
        load_line(data, |i| line_of(line, i), n, work, linear);
        for ch in 0..4 {
            iir_1d(&mut work[ch * n..(ch + 1) * n], &mut causal[..n], c);
        }
        store_line(data, |i| line_of(line, i), n, work, linear);
    }
}

/// Recursive Gaussian blur in place.
///
/// A sigma at or below [`MIN_SIGMA`] returns without touching the
/// buffer; sigmas above [`MAX_SIGMA`] are clamped. With `linear` set,
/// color is un-premultiplied and moved to linear light (fast 2.2-gamma
/// fit) for the duration of the filter; alpha is always filtered in
/// non-linear space.
pub fn gaussian_blur(buf: &mut PixelBufMut<'_>, sigma: f32, linear: bool) {
    let Some(sigma) = effective_sigma(sigma) else {
        return;
    };
    let c = DericheCoeffs::from_sigma(sigma);

    let (w, h, stride) = (buf.width(), buf.height(), buf.stride());
    let max_dim = w.max(h);
    let mut work = vec![0.0f32; 4 * max_dim];
    let mut causal = vec![0.0f32; max_dim];
    let data = buf.data_mut();

    // Horizontal: one line per row, samples 4 bytes apart.
    blur_axis(
        data,
        h,
        w,
        |y, x| y * stride + x * 4,
        &c,
        &mut work,
        &mut causal,
        linear,
    );
    // Vertical: one line per column, samples one stride apart.
    blur_axis(
        data,
        w,
        h,
        |x, y| y * stride + x * 4,
        &c,
        &mut work,
        &mut causal,
        linear,
    );
}

/// [`gaussian_blur`] without linear-light processing.
pub fn gaussian_blur_fast(buf: &mut PixelBufMut<'_>, sigma: f32) {
    gaussian_blur(buf, sigma, false);
}

/// [`gaussian_blur`] with linear-light processing.
pub fn gaussian_blur_quality(buf: &mut PixelBufMut<'_>, sigma: f32) {
    gaussian_blur(buf, sigma, true);
}

/// Whether the vectorized recursive path was compiled into this build.
/// Callers should check this before [`simd::gaussian_blur_simd`] and
/// fall back to [`gaussian_blur`]; [`gaussian_blur_auto`] does both.
pub fn simd_available() -> bool {
    cfg!(feature = "simd")
}

/// Strategy dispatch: the vectorized path when the build carries it,
/// the scalar path otherwise.
pub fn gaussian_blur_auto(buf: &mut PixelBufMut<'_>, sigma: f32, linear: bool) {
    #[cfg(feature = "simd")]
    simd::gaussian_blur_simd(buf, sigma, linear);
    #[cfg(not(feature = "simd"))]
    gaussian_blur(buf, sigma, linear);
}

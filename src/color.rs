//! sRGB / linear-light transfer functions.
//!
//! The blur passes use fast polynomial fits of the 2.2-gamma curve
//! instead of the exact piecewise sRGB transfer. The coefficients are
//! empirical and load-bearing: regression images were rendered with
//! exactly these polynomials, so they must not be "improved" or
//! re-derived. The exact piecewise pair is kept for tests and for
//! callers that want reference conversions.

/// Fast `x^2.2` fit: `x * x * (0.2*x + 0.8)`. Absolute error stays
/// under 0.02 on [0, 1].
#[inline(always)]
pub fn srgb_to_linear_fast(x: f32) -> f32 {
    x * x * (x * 0.2 + 0.8)
}

/// Fast `x^(1/2.2)` fit: `sqrt(x) * (1 - 0.2*x)`. A crude fit that
/// undershoots near white (0.8 at x = 1); kept verbatim for output
/// compatibility.
#[inline(always)]
pub fn linear_to_srgb_fast(x: f32) -> f32 {
    x.sqrt() * (1.0 - 0.2 * x)
}

/// Exact piecewise sRGB electro-optical transfer.
#[inline]
pub fn srgb_to_linear_exact(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Exact piecewise sRGB opto-electronic transfer.
#[inline]
pub fn linear_to_srgb_exact(linear: f32) -> f32 {
    if linear <= 0.04045 / 12.92 {
        linear * 12.92
    } else {
        1.055 * linear.max(0.0).powf(1.0 / 2.4) - 0.055
    }
}

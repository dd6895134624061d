//! Command-line argument definitions and type conversions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Algorithm {
    /// Triple-pass box blur
    Box3,
    /// Downsample, single box pass, upsample (nearest resampling)
    Downscale,
    /// Downsample path with bilinear resampling (higher quality)
    DownscaleHq,
    /// Recursive (IIR) Deriche Gaussian, scalar path
    Gaussian,
    /// Vectorized recursive Gaussian; falls back to the scalar path
    /// when the build lacks the simd feature
    GaussianSimd,
    /// Recursive Gaussian, vectorized when available
    Auto,
}

/// Approximate Gaussian blur over RGBA images.
///
/// Pipeline: decode -> premultiply -> blur in place -> un-premultiply
/// -> encode. All blur math happens on interleaved BGRA bytes exactly
/// as the library applies it to raw pixel buffers.
#[derive(Parser, Debug)]
#[command(name = "blur", version)]
pub struct Args {
    /// Input image (anything the image crate can decode)
    pub input: PathBuf,

    /// Output image path (format from extension)
    pub output: PathBuf,

    /// Blur algorithm
    #[arg(long, value_enum, default_value_t = Algorithm::Box3)]
    pub algorithm: Algorithm,

    /// Box radius in pixels (box3 and downscale paths; box3 rounds to
    /// the nearest integer)
    #[arg(long, default_value_t = 6.0)]
    pub radius: f32,

    /// Gaussian sigma (recursive paths)
    #[arg(long, default_value_t = 4.0)]
    pub sigma: f32,

    /// Downscale factor for the downsample fast path, clamped to
    /// [0.01, 1]
    #[arg(long, default_value_t = 0.5)]
    pub downscale: f32,

    /// Filter color in linear light (recursive paths only)
    #[arg(long)]
    pub linear: bool,
}

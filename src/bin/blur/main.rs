//! blur - approximate Gaussian blur CLI
//!
//! A thin boundary around the fastblur engine: decode an image, hand
//! the engine a premultiplied BGRA buffer, write the result back out.

mod args;

use args::{Algorithm, Args};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use fastblur::pixel::{premultiply_alpha, unpremultiply_alpha};
use fastblur::{
    box3, downscaled_box_blur_in_place, gaussian_blur, gaussian_blur_auto, simd_available,
    PixelBufMut, ResampleMethod,
};

/// The image crate decodes to R,G,B,A byte order; the engine speaks
/// B,G,R,A. Same swap in both directions.
fn swap_red_blue(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

fn run(args: Args) -> Result<(), String> {
    let img = image::open(&args.input)
        .map_err(|e| format!("failed to read {}: {e}", args.input.display()))?;
    let mut rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let (width, height) = (width as usize, height as usize);
    let stride = width * 4;

    swap_red_blue(&mut rgba);
    let mut buf = PixelBufMut::new(&mut rgba, width, height, stride)
        .map_err(|e| format!("bad buffer geometry: {e}"))?;
    premultiply_alpha(&mut buf);

    match args.algorithm {
        Algorithm::Box3 => box3(&mut buf, args.radius.round() as i32),
        Algorithm::Downscale => downscaled_box_blur_in_place(
            &mut buf,
            args.radius,
            args.downscale,
            ResampleMethod::Nearest,
        ),
        Algorithm::DownscaleHq => downscaled_box_blur_in_place(
            &mut buf,
            args.radius,
            args.downscale,
            ResampleMethod::Bilinear,
        ),
        Algorithm::Gaussian => gaussian_blur(&mut buf, args.sigma, args.linear),
        Algorithm::GaussianSimd => {
            if !simd_available() {
                warn!("vectorized path not compiled into this build, using scalar filter");
            }
            gaussian_blur_auto(&mut buf, args.sigma, args.linear);
        }
        Algorithm::Auto => gaussian_blur_auto(&mut buf, args.sigma, args.linear),
    }

    unpremultiply_alpha(&mut buf);
    swap_red_blue(&mut rgba);

    rgba.save(&args.output)
        .map_err(|e| format!("failed to write {}: {e}", args.output.display()))?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

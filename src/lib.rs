//! Fast approximate Gaussian blur for interleaved 8-bit pixel buffers.
//!
//! Three interchangeable algorithms over one buffer contract
//! (4 channels, byte order B/G/R/A, premultiplied alpha, explicit row
//! stride):
//!
//! - [`box3`]: a separable sliding-window box filter run three times,
//!   approximating a Gaussian by the central limit theorem at
//!   O(1)-in-radius cost, plus a downsample→blur→upsample fast path
//!   ([`downscaled_box_blur`]).
//! - [`gaussian_blur`]: a recursive (IIR) Deriche filter (constant
//!   work per pixel regardless of sigma) with optional linear-light
//!   color processing.
//! - [`gaussian_blur_simd`](gaussian::simd::gaussian_blur_simd): the
//!   same filter with each pixel's 4 channels processed as one vector
//!   lane (cargo feature `simd`, on by default). Check
//!   [`simd_available`] or use [`gaussian_blur_auto`].
//!
//! All entry points run synchronously on the calling thread, allocate
//! scratch only for the duration of the call, and hold no state between
//! calls. Distinct buffers may be processed concurrently; the borrow
//! checker already rules out concurrent calls against one buffer.
//!
//! ```
//! use fastblur::{box3, PixelBufMut};
//!
//! let (width, height, stride) = (4, 4, 16);
//! let mut pixels = vec![128u8; stride * height];
//! let mut buf = PixelBufMut::new(&mut pixels, width, height, stride)?;
//! box3(&mut buf, 2);
//! # Ok::<(), fastblur::BufferError>(())
//! ```

pub mod boxblur;
pub mod buffer;
pub mod color;
pub mod gaussian;
pub mod pixel;
pub mod resample;

pub use boxblur::{box3, box_blur_pass, downscaled_box_blur, downscaled_box_blur_in_place};
pub use buffer::{BufferError, PixelBuf, PixelBufMut};
pub use gaussian::{
    gaussian_blur, gaussian_blur_auto, gaussian_blur_fast, gaussian_blur_quality, simd_available,
};
#[cfg(feature = "simd")]
pub use gaussian::simd::gaussian_blur_simd;
pub use resample::{resample, ResampleMethod};

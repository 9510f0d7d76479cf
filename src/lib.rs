/*!
`tiny-gradient` is a port of [Skia](https://skia.org/)'s legacy fixed-point gradient shaders.

A gradient is built once from a list of color stops, bound to a paint and a transform,
and then asked to produce horizontal spans of premultiplied RGBA8888 or RGB565 pixels.
Colors come from small precomputed lookup tables, so the per-pixel work is
a position computation, a tile function and a table read.

See the `demos/` directory for usage examples.
*/

#![no_std]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::identity_op)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unreadable_literal)]

#[cfg(not(any(feature = "std", feature = "no-std-float")))]
compile_error!("You have to activate either the `std` or the `no-std-float` feature.");

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod color;
mod fixed_point;
mod math;
mod pixmap;
mod shaders;

pub use color::{dither_pack_rgb16, pack_rgb16, unpack_rgb16};
pub use color::{ColorU8, PremultipliedColorU8, ALPHA_U8_OPAQUE, ALPHA_U8_TRANSPARENT};
pub use fixed_point::FDot16;
pub use pixmap::{Pixmap, BYTES_PER_PIXEL};
pub use shaders::{CosineMapper, DiscreteMapper, UnitMapper};
pub use shaders::{LinearGradient, RadialGradient, Shader, StopTable};
pub use shaders::{Paint, PixelFormat, ShaderFlags, TileMode};
pub use shaders::{CACHE16_BITS, CACHE32_BITS};

pub use tiny_gradient_geom::{IntSize, MatrixClass, Point, Transform};

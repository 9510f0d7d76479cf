// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod cache;
mod clamp_range;
mod gradient;
mod linear_gradient;
mod radial_gradient;
mod sqrt_table;
mod stops;
mod tile;
mod unit_mapper;

pub use cache::{CACHE16_BITS, CACHE32_BITS};
pub use linear_gradient::LinearGradient;
pub use radial_gradient::RadialGradient;
pub use stops::StopTable;
pub use unit_mapper::{CosineMapper, DiscreteMapper, UnitMapper};

use tiny_gradient_geom::Transform;

use crate::color::PremultipliedColorU8;

use gradient::Gradient;

/// A gradient tiling mode.
///
/// Decides what happens to positions outside of the `0..=1` range.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TileMode {
    /// Replicate the edge color.
    Clamp,

    /// Repeat the gradient.
    Repeat,

    /// Repeat the gradient, alternating mirror images so that adjacent
    /// periods always seam.
    Mirror,
}

impl Default for TileMode {
    fn default() -> Self {
        TileMode::Clamp
    }
}

/// A destination pixel format.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PixelFormat {
    /// Premultiplied RGBA8888. Produced by `Shader::shade_span`.
    Rgba8888,
    /// RGB565. Produced by `Shader::shade_span16`.
    Rgb565,
}

/// The part of a paint a gradient cares about.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Paint {
    /// Paint's alpha. Folded into every stop color.
    ///
    /// Default: 255
    pub alpha: u8,

    /// Whether the paint requests dithering.
    ///
    /// Default: false
    pub dither: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Paint {
            alpha: 255,
            dither: false,
        }
    }
}

/// Properties of a bound shader.
///
/// Refreshed by every successful `Shader::bind`.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ShaderFlags {
    /// Every produced color is opaque, so blending can be skipped.
    pub opaque_alpha: bool,
    /// `Shader::shade_span16` produces correct colors.
    ///
    /// Requires every stop to be opaque. Paint's alpha doesn't matter.
    pub has_span16: bool,
    /// Every row of a 32-bit span is the same.
    pub const_in_y32: bool,
    /// Every row of a 16-bit span is the same.
    pub const_in_y16: bool,
}

/// A gradient shader.
///
/// A shader is created once, bound to a paint and a transform with [`Shader::bind`]
/// and then asked to produce spans of pixels.
///
/// A freshly created shader is bound to an identity transform and a default [`Paint`].
///
/// A shader is not meant to be shared between threads while shading:
/// color caches are built lazily on first use after a bind.
#[derive(Clone, Debug)]
pub enum Shader {
    /// A linear gradient shader.
    LinearGradient(LinearGradient),
    /// A radial gradient shader.
    RadialGradient(RadialGradient),
}

impl Shader {
    fn base(&self) -> &Gradient {
        match self {
            Shader::LinearGradient(ref g) => &g.base,
            Shader::RadialGradient(ref g) => &g.base,
        }
    }

    fn base_mut(&mut self) -> &mut Gradient {
        match self {
            Shader::LinearGradient(ref mut g) => &mut g.base,
            Shader::RadialGradient(ref mut g) => &mut g.base,
        }
    }

    /// Checks if the shader is guaranteed to produce only opaque colors
    /// when drawn with an opaque paint.
    pub fn is_opaque(&self) -> bool {
        self.base().colors_are_opaque()
    }

    /// Returns shader's tile mode.
    pub fn tile_mode(&self) -> TileMode {
        self.base().tile_mode()
    }

    /// Prepares the shader for drawing with `paint` through `ts`.
    ///
    /// `ts` maps gradient space (after the gradient's own transform) to the destination.
    ///
    /// Color caches are invalidated only when paint's alpha differs
    /// from the one used by the previous bind. They are rebuilt lazily.
    ///
    /// Returns `None` when:
    ///
    /// - `ts` combined with the gradient's transform is not invertible
    /// - the resulting destination-to-gradient transform is not finite
    ///
    /// In this case the shader keeps its previous binding and
    /// the caller should draw nothing with it.
    pub fn bind(&mut self, format: PixelFormat, paint: &Paint, ts: Transform) -> Option<()> {
        let is_linear = matches!(self, Shader::LinearGradient(_));
        self.base_mut().bind(format, paint, ts, is_linear)
    }

    /// Returns flags computed by the last successful bind.
    pub fn flags(&self) -> ShaderFlags {
        self.base().flags()
    }

    /// Returns how many times a color cache was built.
    ///
    /// 16-bit and 32-bit caches are counted together.
    pub fn cache_builds(&self) -> u32 {
        self.base().cache_builds()
    }

    /// Writes `dst.len()` premultiplied colors, starting at the destination pixel `(x, y)`.
    pub fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PremultipliedColorU8]) {
        if dst.is_empty() {
            return;
        }

        if let Some(c) = self.base().solid_color() {
            for p in dst.iter_mut() {
                *p = c;
            }
            return;
        }

        match self {
            Shader::LinearGradient(ref mut g) => g.shade_span(x, y, dst),
            Shader::RadialGradient(ref mut g) => g.shade_span(x, y, dst),
        }
    }

    /// Writes `dst.len()` RGB565 colors, starting at the destination pixel `(x, y)`.
    ///
    /// Output is dithered: adjacent pixels alternate between two cache entries
    /// depending on the parity of `x ^ y`.
    ///
    /// Colors are correct only when `ShaderFlags::has_span16` is set.
    /// Paint's alpha is ignored.
    pub fn shade_span16(&mut self, x: i32, y: i32, dst: &mut [u16]) {
        if dst.is_empty() {
            return;
        }

        if let Some((plain, dithered)) = self.base().solid_color16() {
            let (v0, v1) = if (x ^ y) & 1 == 0 {
                (plain, dithered)
            } else {
                (dithered, plain)
            };
            cache::fill_dither(dst, v0, v1);
            return;
        }

        match self {
            Shader::LinearGradient(ref mut g) => g.shade_span16(x, y, dst),
            Shader::RadialGradient(ref mut g) => g.shade_span16(x, y, dst),
        }
    }
}

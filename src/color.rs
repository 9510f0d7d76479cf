// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// 8-bit type for an alpha value. 255 is 100% opaque, zero is 100% transparent.
pub type AlphaU8 = u8;

/// Represents fully transparent AlphaU8 value.
pub const ALPHA_U8_TRANSPARENT: AlphaU8 = 0x00;

/// Represents fully opaque AlphaU8 value.
pub const ALPHA_U8_OPAQUE: AlphaU8 = 0xFF;

const R16_BITS: u32 = 5;
const G16_BITS: u32 = 6;
const B16_BITS: u32 = 5;

/// A 32-bit RGBA color value.
///
/// This is the unpremultiplied color a gradient stop is made of.
///
/// Byteorder: ABGR
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ColorU8(u32);

impl ColorU8 {
    /// A black color.
    pub const BLACK: Self = ColorU8::from_rgba(0, 0, 0, 255);
    /// A white color.
    pub const WHITE: Self = ColorU8::from_rgba(255, 255, 255, 255);

    /// Creates a new color.
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        ColorU8(pack_rgba(r, g, b, a))
    }

    /// Creates a new color from a packed `0xAARRGGBB` value.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        ColorU8::from_rgba(
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        )
    }

    /// Returns color's red component.
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Returns color's green component.
    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Returns color's blue component.
    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Returns color's alpha component.
    #[inline]
    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Check that color is opaque.
    ///
    /// Alpha == 255
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.alpha() == ALPHA_U8_OPAQUE
    }

    /// Returns the value as a primitive type.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Converts into a premultiplied color.
    #[inline]
    pub fn premultiply(&self) -> PremultipliedColorU8 {
        premultiply_argb(self.alpha(), self.red(), self.green(), self.blue())
    }

    /// Returns the same color with its alpha scaled by `alpha`.
    pub(crate) fn fold_alpha(&self, alpha: AlphaU8) -> Self {
        ColorU8::from_rgba(
            self.red(),
            self.green(),
            self.blue(),
            premultiply_u8(self.alpha(), alpha),
        )
    }
}

impl core::fmt::Debug for ColorU8 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColorU8")
            .field("r", &self.red())
            .field("g", &self.green())
            .field("b", &self.blue())
            .field("a", &self.alpha())
            .finish()
    }
}

/// A 32-bit premultiplied RGBA color value.
///
/// Byteorder: ABGR
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct PremultipliedColorU8(u32);

// Perfectly safe, since u32 is already Pod.
unsafe impl bytemuck::Zeroable for PremultipliedColorU8 {}
unsafe impl bytemuck::Pod for PremultipliedColorU8 {}

impl PremultipliedColorU8 {
    /// A transparent color.
    pub const TRANSPARENT: Self = PremultipliedColorU8::from_rgba_unchecked(0, 0, 0, 0);

    /// Creates a new premultiplied color.
    ///
    /// RGB components must be <= alpha.
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Option<Self> {
        if r <= a && g <= a && b <= a {
            Some(PremultipliedColorU8(pack_rgba(r, g, b, a)))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn from_rgba_unchecked(r: u8, g: u8, b: u8, a: u8) -> Self {
        PremultipliedColorU8(pack_rgba(r, g, b, a))
    }

    /// Returns color's red component.
    ///
    /// The value is <= alpha.
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Returns color's green component.
    ///
    /// The value is <= alpha.
    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Returns color's blue component.
    ///
    /// The value is <= alpha.
    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Returns color's alpha component.
    #[inline]
    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Check that color is opaque.
    ///
    /// Alpha == 255
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.alpha() == ALPHA_U8_OPAQUE
    }

    /// Returns the value as a primitive type.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns a demultiplied color.
    pub fn demultiply(&self) -> ColorU8 {
        let a = self.alpha();
        match a {
            ALPHA_U8_OPAQUE => ColorU8(self.0),
            ALPHA_U8_TRANSPARENT => ColorU8::from_rgba(0, 0, 0, 0),
            _ => ColorU8::from_rgba(
                demultiply_u8(self.red(), a),
                demultiply_u8(self.green(), a),
                demultiply_u8(self.blue(), a),
                a,
            ),
        }
    }
}

impl core::fmt::Debug for PremultipliedColorU8 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PremultipliedColorU8")
            .field("r", &self.red())
            .field("g", &self.green())
            .field("b", &self.blue())
            .field("a", &self.alpha())
            .finish()
    }
}

/// Return a*b/255, rounding any fractional bits.
#[inline]
pub fn premultiply_u8(c: u8, a: u8) -> u8 {
    let prod = u32::from(c) * u32::from(a) + 128;
    ((prod + (prod >> 8)) >> 8) as u8
}

#[inline]
fn demultiply_u8(c: u8, a: u8) -> u8 {
    debug_assert!(a != 0);
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

/// Premultiplies unpremultiplied components.
///
/// Fully opaque colors are passed through untouched.
#[inline]
pub(crate) fn premultiply_argb(a: u8, r: u8, g: u8, b: u8) -> PremultipliedColorU8 {
    if a != ALPHA_U8_OPAQUE {
        PremultipliedColorU8::from_rgba_unchecked(
            premultiply_u8(r, a),
            premultiply_u8(g, a),
            premultiply_u8(b, a),
            a,
        )
    } else {
        PremultipliedColorU8::from_rgba_unchecked(r, g, b, a)
    }
}

#[inline]
const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
}

/// Packs already reduced 5-6-5 components into an RGB565 pixel.
#[inline]
pub const fn pack_rgb16(r: u32, g: u32, b: u32) -> u16 {
    ((r << (G16_BITS + B16_BITS)) | (g << B16_BITS) | b) as u16
}

/// Reduces 8-bit components to RGB565, rounding with a 2x1 dither bias.
///
/// This is the alternate entry of the dither pair: adjacent pixels swap
/// between a truncated color and this one.
#[inline]
pub const fn dither_pack_rgb16(r: u8, g: u8, b: u8) -> u16 {
    pack_rgb16(
        dither_to_bits(r as u32, R16_BITS),
        dither_to_bits(g as u32, G16_BITS),
        dither_to_bits(b as u32, B16_BITS),
    )
}

/// Expands an RGB565 pixel back to 8-bit components.
///
/// Returns `(r, g, b)`.
#[inline]
pub const fn unpack_rgb16(c: u16) -> (u8, u8, u8) {
    let c = c as u32;
    let r = (c >> (G16_BITS + B16_BITS)) & 0x1F;
    let g = (c >> B16_BITS) & 0x3F;
    let b = c & 0x1F;
    (
        ((r << 3) | (r >> 2)) as u8,
        ((g << 2) | (g >> 4)) as u8,
        ((b << 3) | (b >> 2)) as u8,
    )
}

#[inline]
pub(crate) const fn reduce_to_rgb16(r: u8, g: u8, b: u8) -> u16 {
    pack_rgb16(
        (r as u32) >> (8 - R16_BITS),
        (g as u32) >> (8 - G16_BITS),
        (b as u32) >> (8 - B16_BITS),
    )
}

#[inline]
const fn dither_to_bits(c: u32, bits: u32) -> u32 {
    ((c << 1) - ((c >> (8 - bits) << (8 - bits)) | (c >> bits))) >> (8 - bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_u8() {
        assert_eq!(
            ColorU8::from_rgba(10, 20, 30, 40).premultiply(),
            PremultipliedColorU8::from_rgba_unchecked(2, 3, 5, 40)
        );
    }

    #[test]
    fn premultiply_u8_opaque() {
        assert_eq!(
            ColorU8::from_rgba(10, 20, 30, 255).premultiply(),
            PremultipliedColorU8::from_rgba_unchecked(10, 20, 30, 255)
        );
    }

    #[test]
    fn demultiply_u8_opaque() {
        assert_eq!(
            PremultipliedColorU8::from_rgba_unchecked(10, 20, 30, 255).demultiply(),
            ColorU8::from_rgba(10, 20, 30, 255)
        );
    }

    #[test]
    fn demultiply_u8_half() {
        assert_eq!(
            PremultipliedColorU8::from_rgba_unchecked(64, 0, 128, 128).demultiply(),
            ColorU8::from_rgba(128, 0, 255, 128)
        );
    }

    #[test]
    fn from_argb() {
        let c = ColorU8::from_argb(0x80FF4020);
        assert_eq!(c, ColorU8::from_rgba(0xFF, 0x40, 0x20, 0x80));
    }

    #[test]
    fn fold_alpha() {
        let c = ColorU8::from_rgba(10, 20, 30, 255).fold_alpha(128);
        assert_eq!(c, ColorU8::from_rgba(10, 20, 30, 128));
        assert_eq!(ColorU8::WHITE.fold_alpha(255), ColorU8::WHITE);
    }

    #[test]
    fn premultiplied_checks() {
        assert!(PremultipliedColorU8::from_rgba(10, 20, 30, 40).is_some());
        assert!(PremultipliedColorU8::from_rgba(50, 20, 30, 40).is_none());
    }

    #[test]
    fn rgb16() {
        assert_eq!(reduce_to_rgb16(255, 255, 255), 0xFFFF);
        assert_eq!(reduce_to_rgb16(255, 0, 0), 0xF800);
        assert_eq!(reduce_to_rgb16(0, 255, 0), 0x07E0);
        assert_eq!(reduce_to_rgb16(0, 0, 255), 0x001F);
        assert_eq!(unpack_rgb16(0xFFFF), (255, 255, 255));
        assert_eq!(unpack_rgb16(0xF800), (255, 0, 0));
    }

    #[test]
    fn dither_rgb16() {
        // Extremes never change.
        assert_eq!(dither_pack_rgb16(0, 0, 0), 0);
        assert_eq!(dither_pack_rgb16(255, 255, 255), 0xFFFF);

        // Never more than one step away from the truncated value.
        for c in 0..=255u8 {
            let plain = reduce_to_rgb16(c, c, c);
            let dithered = dither_pack_rgb16(c, c, c);
            let split = |v: u16| (i32::from(v >> 11), i32::from((v >> 5) & 0x3F), i32::from(v & 0x1F));
            let (pr, pg, pb) = split(plain);
            let (dr, dg, db) = split(dithered);
            assert!((dr - pr).abs() <= 1);
            assert!((dg - pg).abs() <= 1);
            assert!((db - pb).abs() <= 1);
        }
    }
}

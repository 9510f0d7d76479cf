// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// Skia uses fixed points pretty chaotically, therefore we cannot use
// strongly typed wrappers. Which is unfortunate.

use tiny_gradient_geom::SaturateCast;

use crate::math::isqrt;

/// A 16.16 fixed point.
///
/// The gradient engine represents positions along the gradient with it:
/// `0` is the first stop and `0x10000` is the last one.
pub type FDot16 = i32;

pub mod fdot16 {
    use super::*;

    pub const HALF: FDot16 = (1 << 16) / 2;
    pub const ONE: FDot16 = 1 << 16;

    // Anything below is considered a zero step.
    const NEARLY_ZERO: FDot16 = ONE >> 12;

    /// Truncates toward zero, saturating at the `i32` range. NaN becomes the maximum.
    pub fn from_f32(x: f32) -> FDot16 {
        i32::saturate_from(x * ONE as f32)
    }

    // The multiply may exceed 32 bits. Clamp to a signed 32 bit result.
    pub fn mul(a: FDot16, b: FDot16) -> FDot16 {
        saturate((i64::from(a) * i64::from(b)) >> 16)
    }

    pub fn nearly_zero(x: FDot16) -> bool {
        x.unsigned_abs() <= NEARLY_ZERO as u32
    }

    /// Maps `0..=ONE` onto `0..=0xFFFF`.
    pub fn to_ffff(x: FDot16) -> u32 {
        debug_assert!((0..=ONE).contains(&x));
        (x - (x >> 16)) as u32
    }

    /// Saturates a wide intermediate value.
    pub fn saturate(x: i64) -> FDot16 {
        x.max(i64::from(i32::MIN)).min(i64::from(i32::MAX)) as FDot16
    }

    /// Returns the length of a `(x, y)` vector.
    ///
    /// Exact to the last bit and saturated to `i32::MAX`,
    /// so it can be fed into any tile function.
    pub fn length(x: FDot16, y: FDot16) -> FDot16 {
        let x = u64::from(x.unsigned_abs());
        let y = u64::from(y.unsigned_abs());
        isqrt(x * x + y * y).min(i32::MAX as u64) as FDot16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f32() {
        assert_eq!(fdot16::from_f32(0.5), fdot16::HALF);
        assert_eq!(fdot16::from_f32(-1.0), -fdot16::ONE);
        assert_eq!(fdot16::from_f32(1e20), 2147483520);
        assert_eq!(fdot16::from_f32(f32::NAN), 2147483520);
    }

    #[test]
    fn mul() {
        assert_eq!(fdot16::mul(fdot16::HALF, fdot16::HALF), fdot16::ONE / 4);
        assert_eq!(fdot16::mul(i32::MAX, i32::MAX), i32::MAX);
        assert_eq!(fdot16::mul(i32::MIN, i32::MAX), i32::MIN);
    }

    #[test]
    fn to_ffff() {
        assert_eq!(fdot16::to_ffff(0), 0);
        assert_eq!(fdot16::to_ffff(fdot16::HALF), 0x8000);
        assert_eq!(fdot16::to_ffff(fdot16::ONE), 0xFFFF);
    }

    #[test]
    fn length() {
        assert_eq!(fdot16::length(3 << 16, 4 << 16), 5 << 16);
        assert_eq!(fdot16::length(-(3 << 16), 4 << 16), 5 << 16);
        assert_eq!(fdot16::length(0, 0), 0);
        assert_eq!(fdot16::length(i32::MIN, i32::MIN), i32::MAX);
    }

    #[test]
    fn nearly_zero() {
        assert!(fdot16::nearly_zero(0));
        assert!(fdot16::nearly_zero(-16));
        assert!(!fdot16::nearly_zero(200));
        assert!(!fdot16::nearly_zero(i32::MIN));
    }
}

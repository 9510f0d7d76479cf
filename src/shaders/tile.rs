// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::fixed_point::FDot16;
use crate::math::bound;

use super::TileMode;

const PERIOD: FDot16 = 0x10000;

/// A tile function, resolved at compile time.
///
/// Maps any 16.16 position into `0..=0xFFFF`, so that
/// `tile(x) >> (16 - bits)` is always a valid index into a `1 << bits` table.
pub trait TileProc {
    fn tile(x: FDot16) -> u32;
}

#[derive(Copy, Clone, Debug)]
pub struct ClampTile;

#[derive(Copy, Clone, Debug)]
pub struct RepeatTile;

#[derive(Copy, Clone, Debug)]
pub struct MirrorTile;

impl TileProc for ClampTile {
    #[inline]
    fn tile(x: FDot16) -> u32 {
        bound(0, x, PERIOD - 1) as u32
    }
}

impl TileProc for RepeatTile {
    #[inline]
    fn tile(x: FDot16) -> u32 {
        (x & (PERIOD - 1)) as u32
    }
}

impl TileProc for MirrorTile {
    #[inline]
    fn tile(x: FDot16) -> u32 {
        // Every odd period runs backwards, so `x` and `2 - x` fold together.
        let m = x.rem_euclid(PERIOD * 2);
        if m < PERIOD {
            m as u32
        } else {
            (PERIOD * 2 - m).min(PERIOD - 1) as u32
        }
    }
}

impl TileMode {
    /// Maps a 16.16 gradient position into `0..=0xFFFF`.
    ///
    /// Never fails, whatever the input is.
    pub fn apply(self, x: FDot16) -> u32 {
        match self {
            TileMode::Clamp => ClampTile::tile(x),
            TileMode::Repeat => RepeatTile::tile(x),
            TileMode::Mirror => MirrorTile::tile(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTREMES: &[FDot16] = &[
        i32::MIN,
        i32::MIN + 1,
        -0x20000,
        -0x10001,
        -0x10000,
        -1,
        0,
        1,
        0xFFFF,
        0x10000,
        0x1FFFF,
        0x20000,
        i32::MAX - 1,
        i32::MAX,
    ];

    #[test]
    fn clamp() {
        assert_eq!(TileMode::Clamp.apply(-5), 0);
        assert_eq!(TileMode::Clamp.apply(0x8000), 0x8000);
        assert_eq!(TileMode::Clamp.apply(0x10000), 0xFFFF);
        assert_eq!(TileMode::Clamp.apply(i32::MAX), 0xFFFF);
        assert_eq!(TileMode::Clamp.apply(i32::MIN), 0);
    }

    #[test]
    fn repeat() {
        assert_eq!(TileMode::Repeat.apply(0x18000), 0x8000);
        assert_eq!(TileMode::Repeat.apply(-0x8000), 0x8000);
        assert_eq!(TileMode::Repeat.apply(-1), 0xFFFF);

        for x in (-0x30000..0x30000).step_by(0x1234) {
            assert_eq!(TileMode::Repeat.apply(x), TileMode::Repeat.apply(x + 0x10000));
        }
    }

    #[test]
    fn mirror() {
        assert_eq!(TileMode::Mirror.apply(0x4000), 0x4000);
        assert_eq!(TileMode::Mirror.apply(0x10000), 0xFFFF);
        assert_eq!(TileMode::Mirror.apply(0x14000), 0xC000);
        assert_eq!(TileMode::Mirror.apply(0x1C000), 0x4000);
        assert_eq!(TileMode::Mirror.apply(0x24000), 0x4000);
        assert_eq!(TileMode::Mirror.apply(-0x4000), 0x4000);
        assert_eq!(TileMode::Mirror.apply(-1), 1);
    }

    #[test]
    fn mirror_is_symmetric() {
        for x in (-0x50000..0x50000).step_by(0x321) {
            // Around 1.0 and around 0.0.
            assert_eq!(TileMode::Mirror.apply(x), TileMode::Mirror.apply(0x20000 - x), "{}", x);
            assert_eq!(TileMode::Mirror.apply(x), TileMode::Mirror.apply(-x), "{}", x);
        }

        for x in 0..=0x20000 {
            assert_eq!(TileMode::Mirror.apply(x), TileMode::Mirror.apply(0x20000 - x), "{}", x);
        }
    }

    #[test]
    fn mirror_is_periodic() {
        for &x in &EXTREMES[2..EXTREMES.len() - 2] {
            assert_eq!(TileMode::Mirror.apply(x), TileMode::Mirror.apply(x + 0x20000), "{}", x);
        }
    }

    #[test]
    fn always_bounded() {
        for mode in [TileMode::Clamp, TileMode::Repeat, TileMode::Mirror].iter() {
            for &x in EXTREMES {
                assert!(mode.apply(x) <= 0xFFFF);
            }
        }
    }
}

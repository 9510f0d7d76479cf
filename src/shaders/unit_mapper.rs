// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

#[cfg(all(not(feature = "std"), feature = "no-std-float"))]
use tiny_gradient_geom::NoStdFloat;

/// A remapping of the gradient's unit domain.
///
/// Applied once per color cache build: every cache entry is resampled
/// from the linear ramp at the mapped position.
///
/// `0..=0xFFFF` represents `0..=1`. A mapper is shared through an `Arc`,
/// so it can be used by multiple shaders at once.
pub trait UnitMapper: core::fmt::Debug + Send + Sync {
    /// Maps a 16-bit unit position into another one.
    fn map_unit16(&self, x: u16) -> u16;
}

/// Quantizes the unit domain into evenly spaced steps.
///
/// Produces a banded gradient with `segments` distinct colors.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DiscreteMapper {
    segments: u32,
}

impl DiscreteMapper {
    /// Creates a new mapper.
    ///
    /// Fewer than 2 segments map everything to zero.
    /// Segments count is capped at 0xFFFF.
    pub fn new(segments: u32) -> Self {
        let segments = if segments < 2 { 0 } else { segments.min(0xFFFF) };
        DiscreteMapper { segments }
    }
}

impl UnitMapper for DiscreteMapper {
    fn map_unit16(&self, x: u16) -> u16 {
        if self.segments == 0 {
            return 0;
        }

        // The first step is 0 and the last one is 0xFFFF.
        let last = u64::from(self.segments - 1);
        let step = (u64::from(x) * u64::from(self.segments)) >> 16;
        (step * 0xFFFF / last) as u16
    }
}

/// A flipped cosine ease.
///
/// Maps `x` into `cos(x * PI / 2)`: starts at the last stop and ends at the first one.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct CosineMapper;

impl UnitMapper for CosineMapper {
    fn map_unit16(&self, x: u16) -> u16 {
        let x = f32::from(x) / 65536.0 * core::f32::consts::FRAC_PI_2;
        let y = (x.cos() * 65536.0) as u32;
        y.min(0xFFFF) as u16
    }
}

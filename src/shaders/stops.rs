// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::vec::Vec;

use tiny_gradient_geom::NormalizedF32;

use crate::color::ColorU8;
use crate::fixed_point::{fdot16, FDot16};

/// A stop position record.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Rec {
    /// Stop's position, `0..=ONE`.
    pub pos: FDot16,
    /// `(1 << 24) / (pos - previous pos)`, or zero for an empty segment.
    pub scale: u32,
}

/// An ordered list of gradient stops.
///
/// Colors are unpremultiplied. Positions are normalized to start at 0 and end at 1:
/// when the supplied positions don't, the first and/or the last color
/// is duplicated at the missing end.
#[derive(Clone, PartialEq, Debug)]
pub struct StopTable {
    colors: Vec<ColorU8>,
    recs: Vec<Rec>,
}

impl StopTable {
    /// Creates a new stop table.
    ///
    /// When `positions` is `None`, stops are evenly spaced.
    ///
    /// Returns `None` when:
    ///
    /// - `colors.len()` < 2
    /// - `positions.len()` != `colors.len()`
    /// - a position is not finite or is outside of the 0..=1 range
    /// - positions are not strictly increasing
    pub fn new(colors: &[ColorU8], positions: Option<&[f32]>) -> Option<Self> {
        if colors.len() < 2 {
            log::debug!("a gradient requires at least 2 colors, got {}", colors.len());
            return None;
        }

        match positions {
            Some(positions) => Self::from_positions(colors, positions),
            None => Some(Self::evenly_spaced_impl(colors)),
        }
    }

    /// Creates a new stop table with evenly spaced stops.
    ///
    /// Returns `None` when `colors.len()` < 2.
    pub fn evenly_spaced(colors: &[ColorU8]) -> Option<Self> {
        Self::new(colors, None)
    }

    fn evenly_spaced_impl(colors: &[ColorU8]) -> Self {
        let n = colors.len();
        let dp = fdot16::ONE / (n as i32 - 1);
        let scale = ((n as u32) - 1) << 8;

        let mut recs = Vec::with_capacity(n);
        recs.push(Rec { pos: 0, scale: 0 });
        let mut p = dp;
        for i in 1..n {
            let pos = if i + 1 == n { fdot16::ONE } else { p };
            recs.push(Rec { pos, scale });
            p += dp;
        }

        StopTable {
            colors: colors.to_vec(),
            recs,
        }
    }

    fn from_positions(colors: &[ColorU8], positions: &[f32]) -> Option<Self> {
        if positions.len() != colors.len() {
            log::debug!(
                "gradient has {} colors but {} positions",
                colors.len(),
                positions.len()
            );
            return None;
        }

        let mut prev: Option<f32> = None;
        for &p in positions {
            let p = match NormalizedF32::new(p) {
                Some(v) => v.get(),
                None => {
                    log::debug!("gradient stop position {} is outside of the 0..=1 range", p);
                    return None;
                }
            };

            if let Some(prev) = prev {
                if p <= prev {
                    log::debug!("gradient stop positions must be strictly increasing");
                    return None;
                }
            }

            prev = Some(p);
        }

        // Positions that don't start at 0 or don't end at 1 get a dummy stop,
        // so the table is always bracketed by [0, 1].
        let dummy_first = positions[0] != 0.0;
        let dummy_last = positions[positions.len() - 1] != 1.0;

        let count = colors.len() + dummy_first as usize + dummy_last as usize;
        let mut all_colors = Vec::with_capacity(count);
        let mut all_positions = Vec::with_capacity(count);
        if dummy_first {
            all_colors.push(colors[0]);
            all_positions.push(0);
        }

        for (c, p) in colors.iter().zip(positions) {
            all_colors.push(*c);
            all_positions.push(fdot16::from_f32(*p));
        }

        if dummy_last {
            all_colors.push(colors[colors.len() - 1]);
        }

        let mut recs = Vec::with_capacity(count);
        recs.push(Rec { pos: 0, scale: 0 });
        let mut prev = 0;
        for i in 1..count {
            // The last one is always exactly 1.
            let curr = if i + 1 == count {
                fdot16::ONE
            } else {
                all_positions[i].max(0).min(fdot16::ONE)
            };

            // Positions may collapse after the fixed point conversion.
            let scale = if curr > prev {
                (1u32 << 24) / (curr - prev) as u32
            } else {
                0
            };

            recs.push(Rec { pos: curr, scale });
            prev = curr;
        }

        Some(StopTable {
            colors: all_colors,
            recs,
        })
    }

    /// Returns the number of stops, including the inserted ones.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Checks that the table is empty.
    ///
    /// Always false, since a table has at least 2 stops.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns stop colors, including the inserted ones.
    pub fn colors(&self) -> &[ColorU8] {
        &self.colors
    }

    /// Returns stop positions in 16.16 fixed point.
    pub fn positions(&self) -> impl Iterator<Item = FDot16> + '_ {
        self.recs.iter().map(|r| r.pos)
    }

    pub(crate) fn recs(&self) -> &[Rec] {
        &self.recs
    }

    pub(crate) fn colors_are_opaque(&self) -> bool {
        self.colors.iter().fold(0xFF, |a, c| a & c.alpha()) == 0xFF
    }
}

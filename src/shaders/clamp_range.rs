// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::fixed_point::FDot16;

const MAX_INDEX: i64 = 0xFFFF;

/// A clamped linear span, split into three runs.
///
/// `count0` pixels pinned to `v0`, then `count1` pixels that never leave
/// `0..=0xFFFF` (starting at `fx` and stepping by `dx`),
/// then `count2` pixels pinned to `v1`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClampRange {
    pub count0: usize,
    pub count1: usize,
    pub count2: usize,
    /// Unclamped position of the first middle pixel.
    pub fx: FDot16,
    pub dx: FDot16,
    /// Whether the middle run is walked backwards,
    /// i.e. the leading run is pinned to the table end.
    pub reversed: bool,
}

impl ClampRange {
    pub fn new(fx: FDot16, dx: FDot16, count: usize) -> Self {
        let n = count as i64;
        let fx64 = i64::from(fx);
        let dx64 = i64::from(dx);

        if dx == 0 {
            // The whole span sits in one run.
            let reversed = fx64 > MAX_INDEX;
            let (count0, count1) = if (0..=MAX_INDEX).contains(&fx64) {
                (0, count)
            } else {
                (count, 0)
            };

            return ClampRange {
                count0,
                count1,
                count2: 0,
                fx,
                dx,
                reversed,
            };
        }

        let (c0, c01) = if dx > 0 {
            (
                count_below(fx64, dx64, 0, n),
                count_below(fx64, dx64, MAX_INDEX + 1, n),
            )
        } else {
            (
                count_below(-fx64, -dx64, -MAX_INDEX, n),
                count_below(-fx64, -dx64, 1, n),
            )
        };

        debug_assert!(c0 <= c01 && c01 <= n);

        // c0 pixels are before the range. The next one is inside of it
        // unless the whole span jumps over it.
        let mid_fx = fx64 + c0 * dx64;
        ClampRange {
            count0: c0 as usize,
            count1: (c01 - c0) as usize,
            count2: (n - c01) as usize,
            fx: if c01 > c0 { mid_fx as FDot16 } else { 0 },
            dx,
            reversed: dx < 0,
        }
    }
}

/// Returns the number of steps that stay below `edge`, capped at `n`.
fn count_below(fx: i64, dx: i64, edge: i64, n: i64) -> i64 {
    debug_assert!(dx > 0);
    if fx >= edge {
        0
    } else {
        ((edge - fx + dx - 1) / dx).min(n)
    }
}

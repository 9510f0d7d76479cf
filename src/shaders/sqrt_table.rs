// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::math::isqrt;

pub const SQRT_TABLE_BITS: u32 = 11;
pub const SQRT_TABLE_SIZE: usize = 1 << SQRT_TABLE_BITS;

/// `sqrt(i / SQRT_TABLE_SIZE)` as an 8-bit fraction.
///
/// Used by the clamped radial gradient instead of a real square root.
pub static SQRT_TABLE: [u8; SQRT_TABLE_SIZE] = build_table();

const fn build_table() -> [u8; SQRT_TABLE_SIZE] {
    let mut table = [0u8; SQRT_TABLE_SIZE];
    let mut i = 0;
    while i < SQRT_TABLE_SIZE {
        // A 16.16 sqrt of `i / SIZE`, reduced to 8 bits.
        table[i] = (isqrt((i as u64) << (32 - SQRT_TABLE_BITS)) >> 8) as u8;
        i += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(SQRT_TABLE[0], 0);
        // sqrt(0.25) = 0.5
        assert_eq!(SQRT_TABLE[SQRT_TABLE_SIZE / 4], 0x80);
        assert_eq!(SQRT_TABLE[SQRT_TABLE_SIZE - 1], 0xFF);
    }

    #[test]
    fn monotonic() {
        for i in 1..SQRT_TABLE_SIZE {
            assert!(SQRT_TABLE[i - 1] <= SQRT_TABLE[i]);
        }
    }
}

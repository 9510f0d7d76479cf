// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use core::ops::Range;

use alloc::boxed::Box;

use arrayref::{array_refs, mut_array_refs};

use crate::color::{dither_pack_rgb16, premultiply_argb, reduce_to_rgb16};
use crate::color::{AlphaU8, ColorU8, PremultipliedColorU8};
use crate::fixed_point::fdot16;

use super::stops::{Rec, StopTable};
use super::UnitMapper;

/// The number of bits used to index the 16-bit cache.
pub const CACHE16_BITS: u32 = 6;
/// The number of bits used to index the 32-bit cache.
pub const CACHE32_BITS: u32 = 8;

const CACHE16_COUNT: usize = 1 << CACHE16_BITS;
const CACHE32_COUNT: usize = 1 << CACHE32_BITS;

/// A color table a span shader can index into.
pub trait SpanCache {
    type Pixel: Copy;

    /// Index bits.
    const BITS: u32;

    /// Offset of the dither twin table. Zero when there is none.
    const DITHER_STRIDE: usize;

    /// Shifts a tiled `0..=0xFFFF` position into a table index.
    const SHIFT: u32 = 16 - Self::BITS;

    /// Shifts an 8-bit sqrt table value into a table index.
    const SQRT_SHIFT: u32 = 8 - Self::BITS;

    fn entries(&self) -> &[Self::Pixel];

    /// Returns the last table index.
    #[inline]
    fn last_index() -> usize {
        (1 << Self::BITS) - 1
    }
}

/// A 16-bit color cache: RGB565 entries followed by their dithered twins.
#[derive(Clone)]
pub struct Cache16 {
    entries: [u16; CACHE16_COUNT * 2],
}

impl Cache16 {
    pub fn build(stops: &StopTable, mapper: Option<&dyn UnitMapper>) -> Box<Self> {
        let mut cache = Box::new(Cache16 {
            entries: [0; CACHE16_COUNT * 2],
        });

        {
            let (plain, dithered) = mut_array_refs![&mut cache.entries, CACHE16_COUNT, CACHE16_COUNT];
            let colors = stops.colors();
            for_each_segment(stops.recs(), CACHE16_BITS, |i, range| {
                build16_segment(
                    &mut plain[range.clone()],
                    &mut dithered[range],
                    colors[i - 1],
                    colors[i],
                );
            });
        }

        if let Some(mapper) = mapper {
            let linear = cache.entries;
            let (plain, dithered) = mut_array_refs![&mut cache.entries, CACHE16_COUNT, CACHE16_COUNT];
            let (linear_plain, linear_dithered) = array_refs![&linear, CACHE16_COUNT, CACHE16_COUNT];
            for i in 0..CACHE16_COUNT {
                let idx = (mapper.map_unit16(expand6(i as u16)) >> Self::SHIFT) as usize;
                plain[i] = linear_plain[idx];
                dithered[i] = linear_dithered[idx];
            }
        }

        cache
    }

    /// Returns truncated entries.
    pub fn plain(&self) -> &[u16; CACHE16_COUNT] {
        array_refs![&self.entries, CACHE16_COUNT, CACHE16_COUNT].0
    }

    /// Returns dithered entries.
    pub fn dithered(&self) -> &[u16; CACHE16_COUNT] {
        array_refs![&self.entries, CACHE16_COUNT, CACHE16_COUNT].1
    }
}

impl SpanCache for Cache16 {
    type Pixel = u16;
    const BITS: u32 = CACHE16_BITS;
    const DITHER_STRIDE: usize = CACHE16_COUNT;

    #[inline]
    fn entries(&self) -> &[u16] {
        &self.entries
    }
}

impl core::fmt::Debug for Cache16 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cache16").finish()
    }
}

/// A 32-bit color cache of premultiplied colors.
#[derive(Clone)]
pub struct Cache32 {
    entries: [PremultipliedColorU8; CACHE32_COUNT],
}

impl Cache32 {
    pub fn build(stops: &StopTable, mapper: Option<&dyn UnitMapper>, alpha: AlphaU8) -> Box<Self> {
        let mut cache = Box::new(Cache32 {
            entries: [PremultipliedColorU8::TRANSPARENT; CACHE32_COUNT],
        });

        let colors = stops.colors();
        let entries = &mut cache.entries;
        for_each_segment(stops.recs(), CACHE32_BITS, |i, range| {
            build32_segment(
                &mut entries[range],
                colors[i - 1].fold_alpha(alpha),
                colors[i].fold_alpha(alpha),
            );
        });

        if let Some(mapper) = mapper {
            let linear = cache.entries;
            for (i, p) in cache.entries.iter_mut().enumerate() {
                let i = i as u16;
                let idx = mapper.map_unit16((i << 8) | i) >> Self::SHIFT;
                *p = linear[idx as usize];
            }
        }

        cache
    }
}

impl SpanCache for Cache32 {
    type Pixel = PremultipliedColorU8;
    const BITS: u32 = CACHE32_BITS;
    const DITHER_STRIDE: usize = 0;

    #[inline]
    fn entries(&self) -> &[PremultipliedColorU8] {
        &self.entries
    }
}

impl core::fmt::Debug for Cache32 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cache32").finish()
    }
}

/// Fills `dst` alternating between `v0` and `v1`, starting with `v0`.
#[inline]
pub(crate) fn fill_dither<T: Copy>(dst: &mut [T], v0: T, v1: T) {
    for pair in dst.chunks_mut(2) {
        pair[0] = v0;
        if let Some(p) = pair.get_mut(1) {
            *p = v1;
        }
    }
}

/// Returns the dither twin offset of the first pixel of a span.
#[inline]
pub fn start_toggle<C: SpanCache>(x: i32, y: i32) -> usize {
    ((x ^ y) & 1) as usize * C::DITHER_STRIDE
}

/// Fills `dst` with a single table entry, keeping the dither pattern.
///
/// Returns the toggle for the pixel after `dst`.
#[inline]
pub fn fill_index<C: SpanCache>(cache: &C, dst: &mut [C::Pixel], index: usize, toggle: usize) -> usize {
    let entries = cache.entries();
    fill_dither(
        dst,
        entries[index + toggle],
        entries[index + (toggle ^ C::DITHER_STRIDE)],
    );

    if dst.len() & 1 == 1 {
        toggle ^ C::DITHER_STRIDE
    } else {
        toggle
    }
}

/// Spreads a 6-bit index over the whole 16-bit unit.
#[inline]
fn expand6(i: u16) -> u16 {
    (i << 10) | (i << 4) | (i >> 2)
}

/// Calls `f` for each stop pair with the stop index and the inclusive table range it owns.
///
/// Neighboring ranges share their boundary entry.
fn for_each_segment<F: FnMut(usize, Range<usize>)>(recs: &[Rec], bits: u32, mut f: F) {
    let shift = 16 - bits;
    let mut prev = 0;
    for (i, rec) in recs.iter().enumerate().skip(1) {
        let next = (fdot16::to_ffff(rec.pos) >> shift) as usize;
        if next > prev {
            f(i, prev..next + 1);
        }
        prev = next;
    }

    debug_assert_eq!(prev, (1 << bits) - 1);
}

/// A single color channel stepped in 16.16.
#[derive(Copy, Clone)]
struct ChannelRamp {
    value: i32,
    delta: i32,
}

impl ChannelRamp {
    fn new(c0: u8, c1: u8, count: usize) -> Self {
        // Derived from the target value so the last entry lands exactly on `c1`.
        let delta = if count > 1 {
            ((i32::from(c1) - i32::from(c0)) << 16) / (count as i32 - 1)
        } else {
            0
        };

        ChannelRamp {
            value: (i32::from(c0) << 16) + fdot16::HALF,
            delta,
        }
    }

    #[inline]
    fn step(&mut self) -> u8 {
        let v = (self.value >> 16) as u8;
        self.value += self.delta;
        v
    }
}

fn build16_segment(plain: &mut [u16], dithered: &mut [u16], c0: ColorU8, c1: ColorU8) {
    debug_assert_eq!(plain.len(), dithered.len());

    let count = plain.len();
    let mut r = ChannelRamp::new(c0.red(), c1.red(), count);
    let mut g = ChannelRamp::new(c0.green(), c1.green(), count);
    let mut b = ChannelRamp::new(c0.blue(), c1.blue(), count);
    for (p, d) in plain.iter_mut().zip(dithered.iter_mut()) {
        let (cr, cg, cb) = (r.step(), g.step(), b.step());
        *p = reduce_to_rgb16(cr, cg, cb);
        *d = dither_pack_rgb16(cr, cg, cb);
    }
}

fn build32_segment(dst: &mut [PremultipliedColorU8], c0: ColorU8, c1: ColorU8) {
    let count = dst.len();
    let mut a = ChannelRamp::new(c0.alpha(), c1.alpha(), count);
    let mut r = ChannelRamp::new(c0.red(), c1.red(), count);
    let mut g = ChannelRamp::new(c0.green(), c1.green(), count);
    let mut b = ChannelRamp::new(c0.blue(), c1.blue(), count);
    for p in dst {
        *p = premultiply_argb(a.step(), r.step(), g.step(), b.step());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::unpack_rgb16;
    use crate::shaders::{CosineMapper, DiscreteMapper};

    const RED: ColorU8 = ColorU8::from_rgba(255, 0, 0, 255);
    const GREEN: ColorU8 = ColorU8::from_rgba(0, 255, 0, 255);
    const BLUE: ColorU8 = ColorU8::from_rgba(0, 0, 255, 255);

    fn close(a: u8, b: u8, tolerance: i32) -> bool {
        (i32::from(a) - i32::from(b)).abs() <= tolerance
    }

    #[test]
    fn two_stop_linearity_32() {
        let c0 = ColorU8::from_rgba(10, 200, 30, 255);
        let c1 = ColorU8::from_rgba(250, 0, 130, 255);
        let stops = StopTable::evenly_spaced(&[c0, c1]).unwrap();
        let cache = Cache32::build(&stops, None, 255);

        let last = Cache32::last_index() as i32;
        for (i, p) in cache.entries().iter().enumerate() {
            let lerp = |a: u8, b: u8| {
                let v = i32::from(a) + (i32::from(b) - i32::from(a)) * i as i32 / last;
                v as u8
            };
            assert!(close(p.red(), lerp(c0.red(), c1.red()), 1), "{}", i);
            assert!(close(p.green(), lerp(c0.green(), c1.green()), 1), "{}", i);
            assert!(close(p.blue(), lerp(c0.blue(), c1.blue()), 1), "{}", i);
            assert_eq!(p.alpha(), 255);
        }
    }

    #[test]
    fn endpoints_32() {
        let stops = StopTable::evenly_spaced(&[RED, GREEN, BLUE]).unwrap();
        let cache = Cache32::build(&stops, None, 255);
        assert_eq!(cache.entries()[0], RED.premultiply());
        assert_eq!(cache.entries()[Cache32::last_index()], BLUE.premultiply());
        // The middle stop owns an exact entry.
        assert_eq!(cache.entries()[128], GREEN.premultiply());
    }

    #[test]
    fn alpha_is_folded_32() {
        let stops = StopTable::evenly_spaced(&[RED, RED]).unwrap();
        let cache = Cache32::build(&stops, None, 128);
        for p in cache.entries() {
            assert_eq!(*p, PremultipliedColorU8::from_rgba(128, 0, 0, 128).unwrap());
        }
    }

    #[test]
    fn uneven_stops_32() {
        let stops = StopTable::new(&[RED, GREEN, BLUE], Some(&[0.0, 0.25, 1.0])).unwrap();
        let cache = Cache32::build(&stops, None, 255);
        // 0x4000 >> 8
        assert_eq!(cache.entries()[64], GREEN.premultiply());
        assert_eq!(cache.entries()[255], BLUE.premultiply());
    }

    #[test]
    fn endpoints_16() {
        let stops = StopTable::evenly_spaced(&[RED, BLUE]).unwrap();
        let cache = Cache16::build(&stops, None);
        assert_eq!(unpack_rgb16(cache.plain()[0]), (255, 0, 0));
        assert_eq!(unpack_rgb16(cache.plain()[63]), (0, 0, 255));
        assert_eq!(unpack_rgb16(cache.dithered()[0]), (255, 0, 0));
        assert_eq!(unpack_rgb16(cache.dithered()[63]), (0, 0, 255));
    }

    #[test]
    fn dither_twins_16() {
        let c0 = ColorU8::from_rgba(0, 0, 0, 255);
        let c1 = ColorU8::from_rgba(255, 255, 255, 255);
        let stops = StopTable::evenly_spaced(&[c0, c1]).unwrap();
        let cache = Cache16::build(&stops, None);
        for i in 0..CACHE16_COUNT {
            let (r0, g0, b0) = unpack_rgb16(cache.plain()[i]);
            let (r1, g1, b1) = unpack_rgb16(cache.dithered()[i]);
            // One 5/6-bit step at most.
            assert!(close(r0, r1, 9));
            assert!(close(g0, g1, 5));
            assert!(close(b0, b1, 9));
        }

        let mut prev = 0;
        for &c in cache.plain().iter() {
            assert!(c >= prev);
            prev = c;
        }
    }

    #[test]
    fn discrete_mapper_32() {
        let stops = StopTable::evenly_spaced(&[RED, BLUE]).unwrap();
        let mapper = DiscreteMapper::new(2);
        let cache = Cache32::build(&stops, Some(&mapper), 255);
        let entries = cache.entries();
        assert!(entries[..128].iter().all(|c| *c == RED.premultiply()));
        assert!(entries[128..].iter().all(|c| *c == BLUE.premultiply()));
    }

    #[test]
    fn cosine_mapper_16() {
        let stops = StopTable::evenly_spaced(&[RED, BLUE]).unwrap();
        let cache = Cache16::build(&stops, Some(&CosineMapper));
        // Flipped: starts at the last stop.
        assert_eq!(unpack_rgb16(cache.plain()[0]), (0, 0, 255));
        assert_eq!(unpack_rgb16(cache.dithered()[0]), (0, 0, 255));
    }

    #[test]
    fn expand() {
        assert_eq!(expand6(0), 0);
        assert_eq!(expand6(63), 0xFFFF);
        assert_eq!(expand6(32) >> 10, 32);
    }

    #[test]
    fn fill_keeps_pattern() {
        let stops = StopTable::evenly_spaced(&[RED, BLUE]).unwrap();
        let cache = Cache16::build(&stops, None);
        let mut buf = [0u16; 3];
        let toggle = fill_index(&*cache, &mut buf, 10, CACHE16_COUNT);
        assert_eq!(buf[0], cache.dithered()[10]);
        assert_eq!(buf[1], cache.plain()[10]);
        assert_eq!(buf[2], cache.dithered()[10]);
        assert_eq!(toggle, 0);
        assert_eq!(start_toggle::<Cache16>(3, 4), CACHE16_COUNT);
        assert_eq!(start_toggle::<Cache32>(3, 4), 0);
    }

    #[test]
    fn dither_fill() {
        let mut buf = [0u16; 5];
        fill_dither(&mut buf, 1, 2);
        assert_eq!(buf, [1, 2, 1, 2, 1]);
    }
}

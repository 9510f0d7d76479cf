// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::sync::Arc;

use tiny_gradient_geom::{MatrixClass, Point, Scalar, Transform};

use crate::color::PremultipliedColorU8;
use crate::fixed_point::{fdot16, FDot16};
use crate::math::bound;

use super::cache::{fill_index, start_toggle, Cache16, Cache32, SpanCache};
use super::gradient::{Gradient, SpanContext, DEGENERATE_THRESHOLD};
use super::sqrt_table::{SQRT_TABLE, SQRT_TABLE_BITS, SQRT_TABLE_SIZE};
use super::tile::{ClampTile, MirrorTile, RepeatTile, TileProc};
use super::{Shader, StopTable, TileMode, UnitMapper};

// Positions are halved before squaring, so a squared unit distance is 1 << 30.
const SQUARED_SHIFT: u32 = 14 + 16 - SQRT_TABLE_BITS;

// The largest halved coordinate that is still inside the unit circle.
const PIN_LIMIT: i64 = 0x7FFF;

/// A radial gradient shader.
///
/// The first stop is at the center and the last one is on the circle.
#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub(crate) base: Gradient,
}

impl RadialGradient {
    /// Creates a new radial gradient shader.
    ///
    /// Returns `None` when:
    ///
    /// - `radius` <= 0 or is not finite
    /// - `center` is not finite
    /// - `transform` is not invertible
    pub fn new(
        center: Point,
        radius: f32,
        stops: StopTable,
        mode: TileMode,
        mapper: Option<Arc<dyn UnitMapper>>,
        transform: Transform,
    ) -> Option<Shader> {
        if !radius.is_finite()
            || radius <= 0.0
            || radius.is_nearly_zero_within_tolerance(DEGENERATE_THRESHOLD)
        {
            log::debug!("a radial gradient with an invalid radius {}", radius);
            return None;
        }

        if !center.is_finite() {
            log::debug!("a radial gradient center is not finite");
            return None;
        }

        transform.invert()?;

        let unit_ts = rad_to_unit_ts(center, radius);
        Some(Shader::RadialGradient(RadialGradient {
            base: Gradient::new(stops, mode, mapper, transform, unit_ts, false)?,
        }))
    }

    pub(crate) fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PremultipliedColorU8]) {
        let ctx = self.base.span_context();
        let cache = self.base.cache32();
        shade::<Cache32>(&ctx, cache, x, y, dst);
    }

    pub(crate) fn shade_span16(&mut self, x: i32, y: i32, dst: &mut [u16]) {
        let ctx = self.base.span_context();
        let cache = self.base.cache16();
        shade::<Cache16>(&ctx, cache, x, y, dst);
    }
}

/// Maps `center` to (0, 0) and the circle to the unit circle.
fn rad_to_unit_ts(center: Point, radius: f32) -> Transform {
    let inv = radius.invert();
    Transform::from_translate(-center.x, -center.y).post_scale(inv, inv)
}

fn shade<C: SpanCache>(ctx: &SpanContext, cache: &C, x: i32, y: i32, dst: &mut [C::Pixel]) {
    let toggle = start_toggle::<C>(x, y);
    let ts = &ctx.dst_to_index;
    let dst_x = x as f32 + 0.5;
    let dst_y = y as f32 + 0.5;

    let step = match ctx.class {
        MatrixClass::Linear => Some(Point::from_xy(ts.sx, ts.ky)),
        MatrixClass::FixedStepInX => ts.fixed_step_in_x(dst_y),
        MatrixClass::Perspective => None,
    };

    let step = match step {
        Some(v) => v,
        None => {
            match ctx.tile_mode {
                TileMode::Clamp => {
                    shade_perspective::<C, ClampTile>(ts, cache, dst_x, dst_y, dst, toggle)
                }
                TileMode::Repeat => {
                    shade_perspective::<C, RepeatTile>(ts, cache, dst_x, dst_y, dst, toggle)
                }
                TileMode::Mirror => {
                    shade_perspective::<C, MirrorTile>(ts, cache, dst_x, dst_y, dst, toggle)
                }
            }
            return;
        }
    };

    let pt = ts.map_xy(dst_x, dst_y);
    let span = Span {
        fx: fdot16::from_f32(pt.x),
        fy: fdot16::from_f32(pt.y),
        dx: fdot16::from_f32(step.x),
        dy: fdot16::from_f32(step.y),
    };

    match ctx.tile_mode {
        TileMode::Clamp => shade_clamp(cache, span, dst, toggle),
        TileMode::Repeat => shade_tiled::<C, RepeatTile>(cache, span, dst, toggle),
        TileMode::Mirror => shade_tiled::<C, MirrorTile>(cache, span, dst, toggle),
    }
}

/// A start position and a per-pixel step in unit space.
#[derive(Copy, Clone, Debug)]
struct Span {
    fx: FDot16,
    fy: FDot16,
    dx: FDot16,
    dy: FDot16,
}

/// Uses the sqrt table instead of a real square root.
fn shade_clamp<C: SpanCache>(cache: &C, span: Span, dst: &mut [C::Pixel], mut toggle: usize) {
    let fx = span.fx >> 1;
    let fy = span.fy >> 1;
    let dx = span.dx >> 1;
    let dy = span.dy >> 1;

    let count = dst.len();
    if count > 4 && completely_pinned(fx, dx, fy, dy) {
        fill_index(cache, dst, C::last_index(), toggle);
        return;
    }

    let entries = cache.entries();
    let index = |squared: u32| {
        let fi = (squared >> SQUARED_SHIFT) as usize;
        (SQRT_TABLE[fi.min(SQRT_TABLE_SIZE - 1)] >> C::SQRT_SHIFT) as usize
    };

    if count > 4 && no_need_for_pin(fx, dx, fy, dy, count) {
        let mut fx = fx;
        let mut fy = fy;
        for p in dst {
            let squared = (fx * fx + fy * fy) as u32;
            *p = entries[index(squared) + toggle];
            toggle ^= C::DITHER_STRIDE;
            fx += dx;
            fy += dy;
        }

        return;
    }

    let mut fx = i64::from(fx);
    let dx = i64::from(dx);
    if dy == 0 {
        let yy = pin(i64::from(fy));
        let yy = yy * yy;
        for p in dst {
            let xx = pin(fx);
            *p = entries[index((xx * xx + yy) as u32) + toggle];
            toggle ^= C::DITHER_STRIDE;
            fx += dx;
        }
    } else {
        let mut fy = i64::from(fy);
        let dy = i64::from(dy);
        for p in dst {
            let xx = pin(fx);
            let yy = pin(fy);
            *p = entries[index((xx * xx + yy * yy) as u32) + toggle];
            toggle ^= C::DITHER_STRIDE;
            fx += dx;
            fy += dy;
        }
    }
}

#[inline]
fn pin(v: i64) -> i64 {
    bound(-PIN_LIMIT, v, PIN_LIMIT)
}

/// Checks that every pixel is outside of the unit square and moves away from it.
///
/// Conservative: a span that passes is outside of the unit circle as well.
fn completely_pinned(fx: FDot16, dx: FDot16, fy: FDot16, dy: FDot16) -> bool {
    let x_pinned = (fx >= fdot16::HALF && dx >= 0) || (fx <= -fdot16::HALF && dx <= 0);
    let y_pinned = (fy >= fdot16::HALF && dy >= 0) || (fy <= -fdot16::HALF && dy <= 0);
    x_pinned || y_pinned
}

/// Checks that both span ends are inside of the unit circle.
///
/// A segment between two points inside a circle stays inside.
fn no_need_for_pin(fx: FDot16, dx: FDot16, fy: FDot16, dy: FDot16, count: usize) -> bool {
    debug_assert!(count > 0);

    let inside = |x: i64, y: i64| {
        let limit = PIN_LIMIT as u64;
        x.unsigned_abs() <= limit
            && y.unsigned_abs() <= limit
            && x * x + y * y <= PIN_LIMIT * PIN_LIMIT
    };

    let n = count as i64 - 1;
    let (fx, fy) = (i64::from(fx), i64::from(fy));
    let last_x = fx.saturating_add(n.saturating_mul(i64::from(dx)));
    let last_y = fy.saturating_add(n.saturating_mul(i64::from(dy)));
    inside(fx, fy) && inside(last_x, last_y)
}

/// Uses an exact fixed point length.
fn shade_tiled<C: SpanCache, T: TileProc>(
    cache: &C,
    span: Span,
    dst: &mut [C::Pixel],
    mut toggle: usize,
) {
    let entries = cache.entries();
    let mut fx = i64::from(span.fx);
    let mut fy = i64::from(span.fy);
    let dx = i64::from(span.dx);
    let dy = i64::from(span.dy);
    for p in dst {
        let dist = fdot16::length(fdot16::saturate(fx), fdot16::saturate(fy));
        *p = entries[(T::tile(dist) >> C::SHIFT) as usize + toggle];
        toggle ^= C::DITHER_STRIDE;
        fx += dx;
        fy += dy;
    }
}

fn shade_perspective<C: SpanCache, T: TileProc>(
    ts: &Transform,
    cache: &C,
    dst_x: f32,
    dst_y: f32,
    dst: &mut [C::Pixel],
    mut toggle: usize,
) {
    let entries = cache.entries();
    for (i, p) in dst.iter_mut().enumerate() {
        let pt = ts.map_xy(dst_x + i as f32, dst_y);
        let dist = fdot16::from_f32(pt.length());
        *p = entries[(T::tile(dist) >> C::SHIFT) as usize + toggle];
        toggle ^= C::DITHER_STRIDE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorU8;
    use alloc::vec;
    use alloc::vec::Vec;

    fn gradient(mode: TileMode) -> Gradient {
        let colors = [
            ColorU8::from_rgba(0, 0, 0, 255),
            ColorU8::from_rgba(255, 255, 255, 255),
        ];
        let stops = StopTable::evenly_spaced(&colors).unwrap();
        let unit_ts = rad_to_unit_ts(Point::from_xy(0.0, 0.0), 64.0);
        Gradient::new(stops, mode, None, Transform::identity(), unit_ts, false).unwrap()
    }

    fn index_of(cache: &Cache32, c: PremultipliedColorU8) -> usize {
        // A black to white ramp: red is enough.
        cache
            .entries()
            .iter()
            .position(|e| e.red() == c.red())
            .unwrap()
    }

    #[test]
    fn unit_ts() {
        let ts = rad_to_unit_ts(Point::from_xy(50.0, 30.0), 16.0);
        assert_eq!(ts.map_xy(50.0, 30.0), Point::from_xy(0.0, 0.0));
        assert_eq!(ts.map_xy(66.0, 30.0), Point::from_xy(1.0, 0.0));
        assert_eq!(ts.map_xy(50.0, 14.0), Point::from_xy(0.0, -1.0));
    }

    // The sqrt table is coarse near the center, so only the outer part is checked.
    #[test]
    fn clamp_is_close_to_exact_length() {
        let mut g = gradient(TileMode::Clamp);
        let ctx = g.span_context();
        let cache = g.cache32();

        let mut buf = vec![PremultipliedColorU8::TRANSPARENT; 50];
        let y = 40;
        shade::<Cache32>(&ctx, cache, 0, y, &mut buf);

        for (x, c) in buf.iter().enumerate() {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let d = (px * px + py * py).sqrt() / 64.0;
            let expected = ((d * 256.0) as usize).min(255);
            let actual = index_of(cache, *c);
            assert!(
                (actual as i32 - expected as i32).abs() <= 2,
                "{}: {} != {}",
                x,
                actual,
                expected
            );
        }
    }

    #[test]
    fn pinned_span() {
        let mut g = gradient(TileMode::Clamp);
        let ctx = g.span_context();
        let cache = g.cache32();
        let last = cache.entries()[255];

        let mut buf = vec![PremultipliedColorU8::TRANSPARENT; 10];
        shade::<Cache32>(&ctx, cache, 70, 0, &mut buf);
        assert!(buf.iter().all(|c| *c == last));

        // Leaves the circle halfway.
        let mut buf = vec![PremultipliedColorU8::TRANSPARENT; 100];
        shade::<Cache32>(&ctx, cache, 0, 0, &mut buf);
        assert!(buf[64..].iter().all(|c| *c == last));
        assert!(buf[..60].iter().all(|c| *c != last));
    }

    // Short spans use the pinning loop, long ones don't.
    #[test]
    fn pin_paths_agree() {
        let mut g = gradient(TileMode::Clamp);
        let cache = g.cache32();

        let span = Span {
            fx: 0x2000,
            fy: 0x3000,
            dx: 0x800,
            dy: -0x400,
        };

        let mut short = vec![PremultipliedColorU8::TRANSPARENT; 4];
        shade_clamp(cache, span, &mut short, 0);

        let mut long = vec![PremultipliedColorU8::TRANSPARENT; 8];
        shade_clamp(cache, span, &mut long, 0);
        assert_eq!(short[..], long[..4]);

        let flat = Span { dy: 0, ..span };
        shade_clamp(cache, flat, &mut short, 0);
        shade_clamp(cache, flat, &mut long, 0);
        assert_eq!(short[..], long[..4]);
    }

    #[test]
    fn repeat_and_mirror() {
        for &mode in &[TileMode::Repeat, TileMode::Mirror] {
            let mut g = gradient(mode);
            let cache = g.cache32();
            let span = Span {
                fx: 0,
                fy: 0,
                dx: 0x1000,
                dy: 0,
            };

            let mut buf = vec![PremultipliedColorU8::TRANSPARENT; 64];
            match mode {
                TileMode::Repeat => shade_tiled::<Cache32, RepeatTile>(cache, span, &mut buf, 0),
                _ => shade_tiled::<Cache32, MirrorTile>(cache, span, &mut buf, 0),
            }

            let indices: Vec<_> = buf.iter().map(|c| index_of(cache, *c)).collect();
            for i in 0..16 {
                if mode == TileMode::Repeat {
                    assert_eq!(indices[i], indices[i + 16]);
                } else {
                    assert_eq!(indices[i], indices[32 - i]);
                }
            }
        }
    }

    #[test]
    fn extremes() {
        let span = |fx, fy, dx, dy| Span { fx, fy, dx, dy };
        let spans = [
            span(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            span(i32::MIN, i32::MIN, i32::MIN, i32::MIN),
            span(i32::MIN, 0, i32::MAX, 0),
            span(0, i32::MAX, 1, i32::MIN),
        ];

        let mut g = gradient(TileMode::Clamp);
        let cache = g.cache16();
        for span in spans.iter() {
            for &count in &[1, 4, 5, 100] {
                let mut buf = vec![0u16; count];
                shade_clamp(cache, *span, &mut buf, 0);
                shade_tiled::<Cache16, RepeatTile>(cache, *span, &mut buf, 64);
                shade_tiled::<Cache16, MirrorTile>(cache, *span, &mut buf, 0);
            }
        }
    }
}

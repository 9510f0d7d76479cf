// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::sync::Arc;

use tiny_gradient_geom::{MatrixClass, Point, Scalar, Transform};

use crate::color::PremultipliedColorU8;
use crate::fixed_point::{fdot16, FDot16};

use super::cache::{fill_index, start_toggle, Cache16, Cache32, SpanCache};
use super::clamp_range::ClampRange;
use super::gradient::{Gradient, SpanContext, DEGENERATE_THRESHOLD};
use super::tile::{ClampTile, MirrorTile, RepeatTile, TileProc};
use super::{Shader, StopTable, TileMode, UnitMapper};

/// A linear gradient shader.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub(crate) base: Gradient,
}

impl LinearGradient {
    /// Creates a new linear gradient shader.
    ///
    /// The first stop is at `start` and the last one is at `end`.
    /// Colors are constant along lines perpendicular to the `start`-`end` axis.
    ///
    /// Unlike Skia, doesn't return an empty or solid color shader on error.
    ///
    /// Returns `None` when:
    ///
    /// - `start` == `end` (within a small tolerance)
    /// - the distance between `start` and `end` is not finite
    /// - `transform` is not invertible
    pub fn new(
        start: Point,
        end: Point,
        stops: StopTable,
        mode: TileMode,
        mapper: Option<Arc<dyn UnitMapper>>,
        transform: Transform,
    ) -> Option<Shader> {
        let length = (end - start).length();
        if !length.is_finite() {
            log::debug!("a linear gradient length is not finite");
            return None;
        }

        if length.is_nearly_zero_within_tolerance(DEGENERATE_THRESHOLD) {
            // The gradient direction is undefined.
            log::debug!("a linear gradient with coincident points");
            return None;
        }

        transform.invert()?;

        let unit_ts = points_to_unit_ts(start, end);
        Some(Shader::LinearGradient(LinearGradient {
            base: Gradient::new(stops, mode, mapper, transform, unit_ts, true)?,
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

/// Maps `start` to (0, 0) and `end` to (1, 0).
fn points_to_unit_ts(start: Point, end: Point) -> Transform {
    let mut vec = end - start;
    let mag = vec.length();
    let inv = if mag != 0.0 { mag.invert() } else { 0.0 };

    vec.scale(inv);

    Transform::from_sin_cos_at(-vec.y, vec.x, start.x, start.y)
        .post_translate(-start.x, -start.y)
        .post_scale(inv, inv)
}

fn shade<C: SpanCache>(ctx: &SpanContext, cache: &C, x: i32, y: i32, dst: &mut [C::Pixel]) {
    let toggle = start_toggle::<C>(x, y);
    let ts = &ctx.dst_to_index;
    let dst_x = x as f32 + 0.5;
    let dst_y = y as f32 + 0.5;

    let dx = match ctx.class {
        MatrixClass::Linear => Some(fdot16::from_f32(ts.sx)),
        MatrixClass::FixedStepInX => ts
            .fixed_step_in_x(dst_y)
            .map(|step| fdot16::from_f32(step.x)),
        MatrixClass::Perspective => None,
    };

    let dx = match dx {
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

    let fx = fdot16::from_f32(ts.map_xy(dst_x, dst_y).x);

    if fdot16::nearly_zero(dx) {
        // Vertical gradient: the whole span is one color.
        let index = (ctx.tile_mode.apply(fx) >> C::SHIFT) as usize;
        fill_index(cache, dst, index, toggle);
        return;
    }

    match ctx.tile_mode {
        TileMode::Clamp => shade_clamp(cache, fx, dx, dst, toggle),
        TileMode::Repeat => shade_tiled::<C, RepeatTile>(cache, fx, dx, dst, toggle),
        TileMode::Mirror => shade_tiled::<C, MirrorTile>(cache, fx, dx, dst, toggle),
    }
}

fn shade_clamp<C: SpanCache>(
    cache: &C,
    fx: FDot16,
    dx: FDot16,
    dst: &mut [C::Pixel],
    mut toggle: usize,
) {
    let range = ClampRange::new(fx, dx, dst.len());
    let (v0, v1) = if range.reversed {
        (C::last_index(), 0)
    } else {
        (0, C::last_index())
    };

    let (head, rest) = dst.split_at_mut(range.count0);
    let (middle, tail) = rest.split_at_mut(range.count1);

    toggle = fill_index(cache, head, v0, toggle);

    let entries = cache.entries();
    let mut fx = range.fx;
    for p in middle {
        debug_assert!((0..=0xFFFF).contains(&fx));
        *p = entries[(fx as u32 >> C::SHIFT) as usize + toggle];
        toggle ^= C::DITHER_STRIDE;
        fx = fx.wrapping_add(range.dx);
    }

    fill_index(cache, tail, v1, toggle);
}

fn shade_tiled<C: SpanCache, T: TileProc>(
    cache: &C,
    mut fx: FDot16,
    dx: FDot16,
    dst: &mut [C::Pixel],
    mut toggle: usize,
) {
    // Both tiles are periodic in a power of two, so wrapping doesn't affect them.
    let entries = cache.entries();
    for p in dst {
        *p = entries[(T::tile(fx) >> C::SHIFT) as usize + toggle];
        toggle ^= C::DITHER_STRIDE;
        fx = fx.wrapping_add(dx);
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
        let fx = fdot16::from_f32(pt.x);
        *p = entries[(T::tile(fx) >> C::SHIFT) as usize + toggle];
        toggle ^= C::DITHER_STRIDE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorU8;
    use alloc::vec;

    fn gradient(mode: TileMode) -> Gradient {
        let colors = [
            ColorU8::from_rgba(255, 0, 0, 255),
            ColorU8::from_rgba(0, 255, 0, 255),
            ColorU8::from_rgba(0, 0, 255, 255),
        ];
        let stops = StopTable::new(&colors, Some(&[0.0, 0.3, 1.0])).unwrap();
        let unit_ts = points_to_unit_ts(Point::from_xy(0.0, 0.0), Point::from_xy(64.0, 0.0));
        Gradient::new(stops, mode, None, Transform::identity(), unit_ts, true).unwrap()
    }

    #[test]
    fn unit_ts() {
        let ts = points_to_unit_ts(Point::from_xy(10.0, 20.0), Point::from_xy(10.0, 60.0));
        let p = ts.map_xy(10.0, 20.0);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        let p = ts.map_xy(10.0, 60.0);
        assert!((p.x - 1.0).abs() < 1e-6 && p.y.abs() < 1e-6);
        let p = ts.map_xy(0.0, 40.0);
        assert!((p.x - 0.5).abs() < 1e-6);
    }

    // With exact power of two steps, stepping must match per-pixel mapping.
    #[test]
    fn stepping_matches_mapping() {
        for &mode in &[TileMode::Clamp, TileMode::Repeat, TileMode::Mirror] {
            let mut g = gradient(mode);
            g.bind(
                crate::PixelFormat::Rgba8888,
                &crate::Paint::default(),
                Transform::from_row(0.5, 0.0, 0.0, 1.0, -40.0, 0.0),
                true,
            )
            .unwrap();

            let ctx = g.span_context();
            let cache = g.cache32();
            let mut fast = vec![PremultipliedColorU8::TRANSPARENT; 300];
            shade::<Cache32>(&ctx, cache, -20, 3, &mut fast);

            let mut slow = vec![PremultipliedColorU8::TRANSPARENT; 300];
            let ts = &ctx.dst_to_index;
            match mode {
                TileMode::Clamp => {
                    shade_perspective::<Cache32, ClampTile>(ts, cache, -19.5, 3.5, &mut slow, 0)
                }
                TileMode::Repeat => {
                    shade_perspective::<Cache32, RepeatTile>(ts, cache, -19.5, 3.5, &mut slow, 0)
                }
                TileMode::Mirror => {
                    shade_perspective::<Cache32, MirrorTile>(ts, cache, -19.5, 3.5, &mut slow, 0)
                }
            }

            assert_eq!(fast, slow, "{:?}", mode);
        }
    }

    #[test]
    fn clamp_runs() {
        let mut g = gradient(TileMode::Clamp);
        let ctx = g.span_context();
        let cache = g.cache32();
        let first = cache.entries()[0];
        let last = cache.entries()[255];

        let mut buf = vec![PremultipliedColorU8::TRANSPARENT; 100];
        shade::<Cache32>(&ctx, cache, -10, 0, &mut buf);
        assert!(buf[..10].iter().all(|c| *c == first));
        assert!(buf[74..].iter().all(|c| *c == last));
    }

    #[test]
    fn vertical_fill_is_dithered() {
        let mut g = gradient(TileMode::Clamp);
        // Rotate by 90 degrees, so X doesn't affect the position.
        g.bind(
            crate::PixelFormat::Rgb565,
            &crate::Paint::default(),
            Transform::from_row(0.0, 1.0, -1.0, 0.0, 0.0, 0.0),
            true,
        )
        .unwrap();

        let ctx = g.span_context();
        let cache = g.cache16();
        let mut buf = vec![0u16; 7];
        shade::<Cache16>(&ctx, cache, 0, 20, &mut buf);

        let index = (ClampTile::tile(fdot16::from_f32(20.5 / 64.0)) >> 10) as usize;
        for (i, c) in buf.iter().enumerate() {
            let expected = if i % 2 == 0 {
                cache.plain()[index]
            } else {
                cache.dithered()[index]
            };
            assert_eq!(*c, expected);
        }
    }
}

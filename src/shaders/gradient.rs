// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use tiny_gradient_geom::{MatrixClass, Transform};

use crate::color::{dither_pack_rgb16, reduce_to_rgb16};
use crate::color::{premultiply_argb, AlphaU8, PremultipliedColorU8, ALPHA_U8_OPAQUE};
use crate::fixed_point::{fdot16, FDot16};
use crate::math::bound;

use super::cache::{Cache16, Cache32};
use super::{Paint, PixelFormat, ShaderFlags, StopTable, TileMode, UnitMapper};

// The default SCALAR_NEARLY_ZERO threshold of .0024 is too big
// for gradients defined in small units.
pub const DEGENERATE_THRESHOLD: f32 = 1.0 / (1 << 15) as f32;

/// Everything a span loop needs besides the color cache.
#[derive(Copy, Clone, Debug)]
pub struct SpanContext {
    pub dst_to_index: Transform,
    pub class: MatrixClass,
    pub tile_mode: TileMode,
}

/// The shape-independent part of a gradient shader.
#[derive(Clone, Debug)]
pub struct Gradient {
    stops: StopTable,
    tile_mode: TileMode,
    mapper: Option<Arc<dyn UnitMapper>>,
    transform: Transform,
    points_to_unit: Transform,
    colors_are_opaque: bool,

    // Refreshed by each bind.
    dst_to_index: Transform,
    dst_to_index_class: MatrixClass,
    flags: ShaderFlags,

    // Depends only on the paint alpha.
    cache_alpha: AlphaU8,
    premul: Vec<PremultipliedColorU8>,
    solid: Option<PremultipliedColorU8>,
    solid16: Option<(u16, u16)>,
    cache16: Option<Box<Cache16>>,
    cache32: Option<Box<Cache32>>,
    cache_builds: u32,
}

impl Gradient {
    /// Creates a gradient bound to an identity transform and a default paint.
    ///
    /// `is_linear` has the same meaning as in [`Gradient::bind`].
    ///
    /// Returns `None` when the local transform is not invertible.
    pub fn new(
        stops: StopTable,
        tile_mode: TileMode,
        mapper: Option<Arc<dyn UnitMapper>>,
        transform: Transform,
        points_to_unit: Transform,
        is_linear: bool,
    ) -> Option<Self> {
        let colors_are_opaque = stops.colors_are_opaque();

        let solid16 = {
            let c0 = stops.colors()[0];
            let same_rgb = stops.colors().iter().all(|c| {
                c.red() == c0.red() && c.green() == c0.green() && c.blue() == c0.blue()
            });

            if same_rgb {
                Some((
                    reduce_to_rgb16(c0.red(), c0.green(), c0.blue()),
                    dither_pack_rgb16(c0.red(), c0.green(), c0.blue()),
                ))
            } else {
                None
            }
        };

        let mut gradient = Gradient {
            stops,
            tile_mode,
            mapper,
            transform,
            points_to_unit,
            colors_are_opaque,
            dst_to_index: points_to_unit,
            dst_to_index_class: MatrixClass::Linear,
            flags: ShaderFlags::default(),
            cache_alpha: ALPHA_U8_OPAQUE,
            premul: Vec::new(),
            solid: None,
            solid16,
            cache16: None,
            cache32: None,
            cache_builds: 0,
        };

        gradient.update_premul();

        gradient.bind(
            PixelFormat::Rgba8888,
            &Paint::default(),
            Transform::identity(),
            is_linear,
        )?;

        Some(gradient)
    }

    pub fn colors_are_opaque(&self) -> bool {
        self.colors_are_opaque
    }

    pub fn tile_mode(&self) -> TileMode {
        self.tile_mode
    }

    pub fn flags(&self) -> ShaderFlags {
        self.flags
    }

    pub fn cache_builds(&self) -> u32 {
        self.cache_builds
    }

    pub fn solid_color(&self) -> Option<PremultipliedColorU8> {
        self.solid
    }

    pub fn solid_color16(&self) -> Option<(u16, u16)> {
        self.solid16
    }

    pub fn bind(
        &mut self,
        format: PixelFormat,
        paint: &Paint,
        ts: Transform,
        is_linear: bool,
    ) -> Option<()> {
        let total = ts.pre_concat(self.transform);
        let inv = match total.invert() {
            Some(v) => v,
            None => {
                log::warn!("failed to invert a gradient transform. Nothing will be rendered");
                return None;
            }
        };

        let dst_to_index = inv.post_concat(self.points_to_unit);
        if !dst_to_index.is_finite() {
            log::warn!("a gradient transform is not finite. Nothing will be rendered");
            return None;
        }

        self.dst_to_index = dst_to_index;
        self.dst_to_index_class = dst_to_index.classify();

        let has_span16 = self.colors_are_opaque;
        let const_in_y32 = is_linear && dst_to_index.is_scale_translate();
        self.flags = ShaderFlags {
            opaque_alpha: self.colors_are_opaque && paint.alpha == ALPHA_U8_OPAQUE,
            has_span16,
            const_in_y32,
            const_in_y16: const_in_y32 && has_span16 && !paint.dither,
        };

        if format == PixelFormat::Rgb565 && !has_span16 {
            log::debug!("a gradient with translucent stops can't be shaded into RGB565 correctly");
        }

        self.set_cache_alpha(paint.alpha);

        Some(())
    }

    fn set_cache_alpha(&mut self, alpha: AlphaU8) {
        if alpha == self.cache_alpha {
            return;
        }

        self.cache_alpha = alpha;
        // The 16-bit cache doesn't depend on alpha,
        // but both are invalidated together.
        self.cache16 = None;
        self.cache32 = None;
        self.update_premul();
    }

    fn update_premul(&mut self) {
        let alpha = self.cache_alpha;
        self.premul.clear();
        self.premul.extend(
            self.stops
                .colors()
                .iter()
                .map(|c| c.fold_alpha(alpha).premultiply()),
        );

        let c0 = self.premul[0];
        self.solid = if self.premul.iter().all(|c| *c == c0) {
            Some(c0)
        } else {
            None
        };
    }

    pub fn span_context(&self) -> SpanContext {
        SpanContext {
            dst_to_index: self.dst_to_index,
            class: self.dst_to_index_class,
            tile_mode: self.tile_mode,
        }
    }

    pub fn cache16(&mut self) -> &Cache16 {
        let stops = &self.stops;
        let mapper = self.mapper.as_deref();
        let builds = &mut self.cache_builds;
        self.cache16.get_or_insert_with(|| {
            *builds += 1;
            log::trace!("building a 16-bit gradient cache");
            Cache16::build(stops, mapper)
        })
    }

    pub fn cache32(&mut self) -> &Cache32 {
        let stops = &self.stops;
        let mapper = self.mapper.as_deref();
        let alpha = self.cache_alpha;
        let builds = &mut self.cache_builds;
        self.cache32.get_or_insert_with(|| {
            *builds += 1;
            log::trace!("building a 32-bit gradient cache with alpha {}", alpha);
            Cache32::build(stops, mapper, alpha)
        })
    }

    /// Evaluates the gradient at `t` without a cache.
    ///
    /// `t` is clamped to `0..=ONE`. The unit mapper is ignored.
    pub fn interpolate(&self, t: FDot16) -> PremultipliedColorU8 {
        let t = bound(0, t, fdot16::ONE);
        let recs = self.stops.recs();
        let colors = self.stops.colors();

        let mut i = 1;
        while i + 1 < recs.len() && (t > recs[i].pos || recs[i].scale == 0) {
            i += 1;
        }

        let prev = recs[i - 1].pos;
        let frac = (i64::from(t - prev) * i64::from(recs[i].scale)) >> 8;
        let frac = bound(0, frac, i64::from(fdot16::ONE)) as i32;

        let c0 = colors[i - 1].fold_alpha(self.cache_alpha);
        let c1 = colors[i].fold_alpha(self.cache_alpha);
        let lerp = |a: u8, b: u8| {
            let d = i32::from(b) - i32::from(a);
            (i32::from(a) + ((d * frac + fdot16::HALF) >> 16)) as u8
        };

        premultiply_argb(
            lerp(c0.alpha(), c1.alpha()),
            lerp(c0.red(), c1.red()),
            lerp(c0.green(), c1.green()),
            lerp(c0.blue(), c1.blue()),
        )
    }
}

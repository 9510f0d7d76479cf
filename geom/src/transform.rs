// Copyright 2006 The Android Open Source Project
// Copyright 2020 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::Point;

use crate::scalar::{Scalar, SCALAR_NEARLY_ZERO};

#[cfg(all(not(feature = "std"), feature = "no-std-float"))]
use crate::NoStdFloat;

// Perspective components are much more sensitive than the affine ones.
const PERSP_NEARLY_ZERO: f32 = 1.0 / (1 << 26) as f32;

/// A transform class, as seen by a span shader.
///
/// Tells how the mapped position changes while walking a horizontal span.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum MatrixClass {
    /// No perspective. Every pixel step in X adds the same `(sx, ky)` delta.
    Linear,
    /// Perspective that is constant along a row.
    /// The per-pixel delta is fixed, but has to be recomputed for each row.
    FixedStepInX,
    /// A general perspective transform. Every pixel has to be mapped separately.
    Perspective,
}

/// A 3x3 transformation matrix.
///
/// Stores scale, skew, translate and perspective components.
///
/// ```text
/// | sx kx tx |
/// | ky sy ty |
/// | px py pw |
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform {
    pub sx: f32,
    pub kx: f32,
    pub ky: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
    pub px: f32,
    pub py: f32,
    pub pw: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            sx: 1.0,
            kx: 0.0,
            ky: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
            px: 0.0,
            py: 0.0,
            pw: 1.0,
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    pub fn identity() -> Self {
        Transform::default()
    }

    /// Creates a new affine `Transform`.
    ///
    /// We are using column-major-column-vector matrix notation, therefore it's ky-kx, not kx-ky.
    pub fn from_row(sx: f32, ky: f32, kx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Transform {
            sx,
            ky,
            kx,
            sy,
            tx,
            ty,
            ..Transform::default()
        }
    }

    /// Creates a new `Transform` with a perspective part.
    pub fn from_row_persp(
        sx: f32,
        ky: f32,
        kx: f32,
        sy: f32,
        tx: f32,
        ty: f32,
        px: f32,
        py: f32,
        pw: f32,
    ) -> Self {
        Transform {
            sx,
            ky,
            kx,
            sy,
            tx,
            ty,
            px,
            py,
            pw,
        }
    }

    /// Creates a new translating `Transform`.
    pub fn from_translate(tx: f32, ty: f32) -> Self {
        Transform::from_row(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a new scaling `Transform`.
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Transform::from_row(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Creates a new skewing `Transform`.
    pub fn from_skew(kx: f32, ky: f32) -> Self {
        Transform::from_row(1.0, ky, kx, 1.0, 0.0, 0.0)
    }

    /// Creates a new rotating `Transform`.
    ///
    /// `angle` in degrees.
    pub fn from_rotate(angle: f32) -> Self {
        let v = angle.to_radians();
        let a = v.cos();
        let b = v.sin();
        let c = -b;
        let d = a;
        Transform::from_row(a, b, c, d, 0.0, 0.0)
    }

    /// Creates a rotation by the given sine and cosine around the `(px, py)` pivot.
    pub fn from_sin_cos_at(sin: f32, cos: f32, px: f32, py: f32) -> Self {
        let cos_inv = 1.0 - cos;
        Transform::from_row(
            cos,
            sin,
            -sin,
            cos,
            sdot(sin, py, cos_inv, px),
            sdot(-sin, px, cos_inv, py),
        )
    }

    /// Checks that all components are finite.
    pub fn is_finite(&self) -> bool {
        self.sx.is_finite()
            && self.ky.is_finite()
            && self.kx.is_finite()
            && self.sy.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
            && self.px.is_finite()
            && self.py.is_finite()
            && self.pw.is_finite()
    }

    /// Checks that transform is identity.
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }

    /// Checks that transform contains only scale and translate parts.
    ///
    /// Identity is a scale-translate transform as well.
    pub fn is_scale_translate(&self) -> bool {
        !self.has_skew() && !self.has_perspective()
    }

    /// Checks that transform contains a scale part.
    pub fn has_scale(&self) -> bool {
        self.sx != 1.0 || self.sy != 1.0
    }

    /// Checks that transform contains a skew part.
    pub fn has_skew(&self) -> bool {
        self.kx != 0.0 || self.ky != 0.0
    }

    /// Checks that transform contains a translate part.
    pub fn has_translate(&self) -> bool {
        self.tx != 0.0 || self.ty != 0.0
    }

    /// Checks that transform contains a perspective part.
    pub fn has_perspective(&self) -> bool {
        self.px != 0.0 || self.py != 0.0 || self.pw != 1.0
    }

    /// Pre-scales the current transform.
    #[must_use]
    pub fn pre_scale(&self, sx: f32, sy: f32) -> Self {
        self.pre_concat(Transform::from_scale(sx, sy))
    }

    /// Post-scales the current transform.
    #[must_use]
    pub fn post_scale(&self, sx: f32, sy: f32) -> Self {
        self.post_concat(Transform::from_scale(sx, sy))
    }

    /// Pre-translates the current transform.
    #[must_use]
    pub fn pre_translate(&self, tx: f32, ty: f32) -> Self {
        self.pre_concat(Transform::from_translate(tx, ty))
    }

    /// Post-translates the current transform.
    #[must_use]
    pub fn post_translate(&self, tx: f32, ty: f32) -> Self {
        self.post_concat(Transform::from_translate(tx, ty))
    }

    /// Pre-concats the current transform.
    ///
    /// `other` is applied first.
    #[must_use]
    pub fn pre_concat(&self, other: Self) -> Self {
        concat(*self, other)
    }

    /// Post-concats the current transform.
    ///
    /// `other` is applied last.
    #[must_use]
    pub fn post_concat(&self, other: Self) -> Self {
        concat(other, *self)
    }

    /// Maps a single point.
    ///
    /// A point that lands on the `w = 0` plane is mapped to the origin.
    pub fn map_xy(&self, x: f32, y: f32) -> Point {
        let nx = x * self.sx + y * self.kx + self.tx;
        let ny = x * self.ky + y * self.sy + self.ty;
        if !self.has_perspective() {
            return Point::from_xy(nx, ny);
        }

        let mut z = x * self.px + y * self.py + self.pw;
        if z != 0.0 {
            z = z.invert();
        }

        Point::from_xy(nx * z, ny * z)
    }

    /// Returns the mapped distance between two horizontally adjacent points on row `y`.
    ///
    /// Returns `None` when the step is not constant along the row,
    /// i.e. the transform depends on X through its perspective part.
    pub fn fixed_step_in_x(&self, y: f32) -> Option<Point> {
        if !self.px.is_nearly_zero_within_tolerance(PERSP_NEARLY_ZERO) {
            return None;
        }

        if self.py.is_nearly_zero_within_tolerance(PERSP_NEARLY_ZERO)
            && (self.pw - 1.0).is_nearly_zero_within_tolerance(PERSP_NEARLY_ZERO)
        {
            Some(Point::from_xy(self.sx, self.ky))
        } else {
            let z = y * self.py + self.pw;
            Some(Point::from_xy(self.sx / z, self.ky / z))
        }
    }

    /// Classifies the transform for span shading.
    pub fn classify(&self) -> MatrixClass {
        if !self.has_perspective() {
            MatrixClass::Linear
        } else if self.fixed_step_in_x(0.0).is_some() {
            MatrixClass::FixedStepInX
        } else {
            MatrixClass::Perspective
        }
    }

    /// Returns an inverted transform.
    ///
    /// Returns `None` when the transform is degenerate or the result is not finite.
    pub fn invert(&self) -> Option<Self> {
        // Allow the trivial case to be inlined.
        if self.is_identity() {
            return Some(*self);
        }

        invert(self)
    }
}

fn invert(ts: &Transform) -> Option<Transform> {
    debug_assert!(!ts.is_identity());

    if ts.has_perspective() {
        return invert_perspective(ts);
    }

    if !ts.has_scale() && !ts.has_skew() {
        // translate only
        return Some(Transform::from_translate(-ts.tx, -ts.ty));
    }

    let inv_det = inv_determinant(ts)?;
    let inv_ts = compute_inv(ts, inv_det);

    if inv_ts.is_finite() {
        Some(inv_ts)
    } else {
        None
    }
}

fn inv_determinant(ts: &Transform) -> Option<f64> {
    let det = dcross(ts.sx as f64, ts.sy as f64, ts.kx as f64, ts.ky as f64);

    // Since the determinant is on the order of the cube of the matrix members,
    // compare to the cube of the default nearly-zero constant (although an
    // estimate of the condition number would be better if it wasn't so expensive).
    let tolerance = SCALAR_NEARLY_ZERO * SCALAR_NEARLY_ZERO * SCALAR_NEARLY_ZERO;
    if (det as f32).is_nearly_zero_within_tolerance(tolerance) {
        None
    } else {
        Some(1.0 / det)
    }
}

fn compute_inv(ts: &Transform, inv_det: f64) -> Transform {
    Transform::from_row(
        (ts.sy as f64 * inv_det) as f32,
        (-ts.ky as f64 * inv_det) as f32,
        (-ts.kx as f64 * inv_det) as f32,
        (ts.sx as f64 * inv_det) as f32,
        dcross_dscale(ts.kx, ts.ty, ts.sy, ts.tx, inv_det),
        dcross_dscale(ts.ky, ts.tx, ts.sx, ts.ty, inv_det),
    )
}

fn invert_perspective(ts: &Transform) -> Option<Transform> {
    let (a, b, c) = (ts.sx as f64, ts.kx as f64, ts.tx as f64);
    let (d, e, f) = (ts.ky as f64, ts.sy as f64, ts.ty as f64);
    let (g, h, i) = (ts.px as f64, ts.py as f64, ts.pw as f64);

    let det = a * dcross(e, i, f, h) - b * dcross(d, i, f, g) + c * dcross(d, h, e, g);
    let tolerance = SCALAR_NEARLY_ZERO * SCALAR_NEARLY_ZERO * SCALAR_NEARLY_ZERO;
    if (det as f32).is_nearly_zero_within_tolerance(tolerance) {
        return None;
    }

    let inv_det = 1.0 / det;
    let inv_ts = Transform::from_row_persp(
        (dcross(e, i, f, h) * inv_det) as f32,
        (dcross(f, g, d, i) * inv_det) as f32,
        (dcross(c, h, b, i) * inv_det) as f32,
        (dcross(a, i, c, g) * inv_det) as f32,
        (dcross(b, f, c, e) * inv_det) as f32,
        (dcross(c, d, a, f) * inv_det) as f32,
        (dcross(d, h, e, g) * inv_det) as f32,
        (dcross(b, g, a, h) * inv_det) as f32,
        (dcross(a, e, b, d) * inv_det) as f32,
    );

    if inv_ts.is_finite() {
        Some(inv_ts)
    } else {
        None
    }
}

fn dcross(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * b - c * d
}

fn dcross_dscale(a: f32, b: f32, c: f32, d: f32, scale: f64) -> f32 {
    (dcross(a as f64, b as f64, c as f64, d as f64) * scale) as f32
}

fn sdot(a: f32, b: f32, c: f32, d: f32) -> f32 {
    a * b + c * d
}

fn concat(a: Transform, b: Transform) -> Transform {
    if a.is_identity() {
        b
    } else if b.is_identity() {
        a
    } else if a.has_perspective() || b.has_perspective() {
        Transform::from_row_persp(
            dot3(a.sx, b.sx, a.kx, b.ky, a.tx, b.px),
            dot3(a.ky, b.sx, a.sy, b.ky, a.ty, b.px),
            dot3(a.sx, b.kx, a.kx, b.sy, a.tx, b.py),
            dot3(a.ky, b.kx, a.sy, b.sy, a.ty, b.py),
            dot3(a.sx, b.tx, a.kx, b.ty, a.tx, b.pw),
            dot3(a.ky, b.tx, a.sy, b.ty, a.ty, b.pw),
            dot3(a.px, b.sx, a.py, b.ky, a.pw, b.px),
            dot3(a.px, b.kx, a.py, b.sy, a.pw, b.py),
            dot3(a.px, b.tx, a.py, b.ty, a.pw, b.pw),
        )
    } else if !a.has_skew() && !b.has_skew() {
        // just scale and translate
        Transform::from_row(
            a.sx * b.sx,
            0.0,
            0.0,
            a.sy * b.sy,
            a.sx * b.tx + a.tx,
            a.sy * b.ty + a.ty,
        )
    } else {
        Transform::from_row(
            mul_add_mul(a.sx, b.sx, a.kx, b.ky),
            mul_add_mul(a.ky, b.sx, a.sy, b.ky),
            mul_add_mul(a.sx, b.kx, a.kx, b.sy),
            mul_add_mul(a.ky, b.kx, a.sy, b.sy),
            mul_add_mul(a.sx, b.tx, a.kx, b.ty) + a.tx,
            mul_add_mul(a.ky, b.tx, a.sy, b.ty) + a.ty,
        )
    }
}

fn mul_add_mul(a: f32, b: f32, c: f32, d: f32) -> f32 {
    (f64::from(a) * f64::from(b) + f64::from(c) * f64::from(d)) as f32
}

fn dot3(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> f32 {
    (f64::from(a) * f64::from(b) + f64::from(c) * f64::from(d) + f64::from(e) * f64::from(f))
        as f32
}

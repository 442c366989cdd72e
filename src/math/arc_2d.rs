/// SVG elliptical arc math.
///
/// Arcs are given in endpoint form (`rx ry x-axis-rotation large-arc sweep x y`)
/// and converted to center form, then approximated by cubic Beziers of at
/// most 90° each.
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::{Point2, TOLERANCE};

/// Unit-circle handle length for a 90° cubic arc.
pub const KAPPA_90: f64 = 0.551_785;

/// Largest number of cubic pieces per quarter turn.
pub const MAX_ARC_ACCURACY: u32 = 64;

/// Center parameterization of an SVG arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    /// Ellipse center.
    pub center: Point2,
    /// Radius along the rotated x axis, scaled up if too small for the chord.
    pub rx: f64,
    /// Radius along the rotated y axis, scaled up if too small for the chord.
    pub ry: f64,
    /// Rotation of the ellipse x axis, in radians.
    pub phi: f64,
    /// Start angle in the ellipse's local frame.
    pub start_angle: f64,
    /// Signed angular span; positive for `sweep = 1`.
    pub sweep: f64,
}

/// Converts an endpoint-form arc to center form.
///
/// Returns `None` for a zero radius or coincident endpoints, where SVG draws
/// no arc.
#[must_use]
#[allow(clippy::too_many_arguments, clippy::similar_names)]
pub fn endpoint_to_center(
    start: Point2,
    end: Point2,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ArcCenter> {
    if rx == 0.0 || ry == 0.0 {
        return None;
    }

    let phi = rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Midpoint distance in the ellipse frame.
    let hx = (start.x - end.x) / 2.0;
    let hy = (start.y - end.y) / 2.0;
    let pxp = cos_phi * hx + sin_phi * hy;
    let pyp = -sin_phi * hx + cos_phi * hy;
    if pxp == 0.0 && pyp == 0.0 {
        return None;
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    let lambda = (pxp * pxp) / (rx * rx) + (pyp * pyp) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rxsq = rx * rx;
    let rysq = ry * ry;
    let pxpsq = pxp * pxp;
    let pypsq = pyp * pyp;

    let mut radicant = rxsq * rysq - rxsq * pypsq - rysq * pxpsq;
    if radicant <= 0.0 {
        radicant = 0.0;
    } else {
        radicant /= rxsq * pypsq + rysq * pxpsq;
        radicant = radicant.sqrt() * if large_arc == sweep { -1.0 } else { 1.0 };
    }

    let cxp = radicant * rx / ry * pyp;
    let cyp = radicant * -ry / rx * pxp;
    let center = Point2::new(
        cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0,
        sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0,
    );

    let vx1 = (pxp - cxp) / rx;
    let vy1 = (pyp - cyp) / ry;
    let vx2 = (-pxp - cxp) / rx;
    let vy2 = (-pyp - cyp) / ry;

    let start_angle = vector_angle(1.0, 0.0, vx1, vy1);
    let mut delta = vector_angle(vx1, vy1, vx2, vy2);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    Some(ArcCenter {
        center,
        rx,
        ry,
        phi,
        start_angle,
        sweep: delta,
    })
}

/// Signed angle from `u` to `v`.
///
/// The dot product is rounded to 9 places so exactly opposite or equal unit
/// vectors resolve to `π` / `0` instead of drifting through `acos`.
fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = super::round_to(ux * vx + uy * vy, 9);
    if dot >= 1.0 {
        return 0.0;
    }
    if dot <= -1.0 {
        return PI;
    }
    let sign = if ux * vy - uy * vx < 0.0 { -1.0 } else { 1.0 };
    sign * dot.acos()
}

/// Number of cubic pieces for an arc spanning `sweep` radians.
///
/// One piece per started quarter turn, multiplied by `accuracy`, which is
/// clamped to `1..=MAX_ARC_ACCURACY`.
#[must_use]
pub fn arc_piece_count(sweep: f64, accuracy: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quarters = ((sweep.abs() / FRAC_PI_2) - 1e-9).ceil().clamp(1.0, 4.0) as u32;
    quarters.saturating_mul(accuracy.clamp(1, MAX_ARC_ACCURACY))
}

/// Approximates an SVG arc with cubic Beziers.
///
/// Each returned item is `[control1, control2, end]`; the first piece starts
/// at `start`. The final end point is snapped to `end` exactly. Returns an
/// empty vector when [`endpoint_to_center`] finds no arc.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn arc_to_cubics(
    start: Point2,
    end: Point2,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    accuracy: u32,
) -> Vec<[Point2; 3]> {
    let Some(arc) = endpoint_to_center(start, end, rx, ry, rotation_deg, large_arc, sweep) else {
        return Vec::new();
    };

    let pieces = arc_piece_count(arc.sweep, accuracy);
    let step = arc.sweep / f64::from(pieces);
    let handle = if (step - FRAC_PI_2).abs() < TOLERANCE {
        KAPPA_90
    } else if (step + FRAC_PI_2).abs() < TOLERANCE {
        -KAPPA_90
    } else {
        4.0 / 3.0 * (step / 4.0).tan()
    };

    let (sin_phi, cos_phi) = arc.phi.sin_cos();
    let to_path = |ux: f64, uy: f64| {
        let x = ux * arc.rx;
        let y = uy * arc.ry;
        Point2::new(
            cos_phi * x - sin_phi * y + arc.center.x,
            sin_phi * x + cos_phi * y + arc.center.y,
        )
    };

    let mut angle = arc.start_angle;
    let mut out = Vec::with_capacity(pieces as usize);
    for _ in 0..pieces {
        let (y1, x1) = angle.sin_cos();
        let (y2, x2) = (angle + step).sin_cos();
        out.push([
            to_path(x1 - y1 * handle, y1 + x1 * handle),
            to_path(x2 + y2 * handle, y2 - x2 * handle),
            to_path(x2, y2),
        ]);
        angle += step;
    }
    if let Some(last) = out.last_mut() {
        last[2] = end;
    }
    out
}

/// Bezier segment evaluation and arc-length estimation.
///
/// Lines, quadratics and cubics share one [`ControlPoints`] type so callers
/// can re-evaluate a segment without caring about its degree.
use super::bbox_2d::BoundingBox;
use super::{Point2, Vector2, TOLERANCE};

/// Gauss–Legendre `(weight, abscissa)` pairs for the 6-point rule.
/// Each pair is used at `±abscissa`.
const GAUSS_LEGENDRE_6: [(f64, f64); 3] = [
    (0.467_913_934_572_689_5, 0.238_619_186_083_196_9),
    (0.360_761_573_048_138_6, 0.661_209_386_466_264_6),
    (0.171_324_492_379_162_34, 0.932_469_514_203_152),
];

/// Gauss–Legendre `(weight, abscissa)` pairs for the 12-point rule.
const GAUSS_LEGENDRE_12: [(f64, f64); 6] = [
    (0.249_147_045_813_402_88, 0.125_233_408_511_468_94),
    (0.233_492_536_538_354_58, 0.367_831_498_998_180_2),
    (0.203_167_426_723_065_84, 0.587_317_954_286_617_5),
    (0.160_078_328_543_346_33, 0.769_902_674_194_304_7),
    (0.106_939_325_995_318_18, 0.904_117_256_370_474_8),
    (0.047_175_336_386_508_46, 0.981_560_634_246_719_2),
];

/// Quadrature rule used for numerically integrated segment lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quadrature {
    /// 6-point Gauss–Legendre; plenty for sampling resolution.
    #[default]
    SixPoint,
    /// 12-point Gauss–Legendre.
    TwelvePoint,
}

impl Quadrature {
    fn table(self) -> &'static [(f64, f64)] {
        match self {
            Self::SixPoint => &GAUSS_LEGENDRE_6,
            Self::TwelvePoint => &GAUSS_LEGENDRE_12,
        }
    }

    /// Integrates `speed` over `[0, t]`.
    fn integrate(self, t: f64, speed: impl Fn(f64) -> f64) -> f64 {
        let half = t / 2.0;
        let sum: f64 = self
            .table()
            .iter()
            .map(|&(w, a)| {
                let offset = half * a;
                w * speed(half - offset) + w * speed(half + offset)
            })
            .sum();
        half * sum
    }
}

/// Control points of one drawable path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPoints {
    /// `[start, end]`; also used for close-path segments.
    Line([Point2; 2]),
    /// `[start, control, end]`.
    Quadratic([Point2; 3]),
    /// `[start, control1, control2, end]`.
    Cubic([Point2; 4]),
}

impl ControlPoints {
    /// Returns the control points as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Point2] {
        match self {
            Self::Line(p) => p,
            Self::Quadratic(p) => p,
            Self::Cubic(p) => p,
        }
    }

    /// First control point (segment start).
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.as_slice()[0]
    }

    /// Last control point (segment end).
    #[must_use]
    pub fn end(&self) -> Point2 {
        let pts = self.as_slice();
        pts[pts.len() - 1]
    }

    /// Returns `true` for line segments.
    #[must_use]
    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    /// Returns `true` when every control point coincides.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let start = self.start();
        self.as_slice()
            .iter()
            .all(|p| (p - start).norm() < TOLERANCE)
    }

    /// Axis-aligned box over the control points.
    ///
    /// This is looser than the tight curve box; the pruning steps rely on it
    /// being cheap, not tight.
    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        let start = self.start();
        BoundingBox::from_points(self.as_slice())
            .unwrap_or_else(|| BoundingBox::new(start.x, start.y, start.x, start.y))
    }

    /// Evaluates the segment at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        match self {
            Self::Line([p0, p1]) => p0 + (p1 - p0) * t,
            Self::Quadratic([p0, c, p1]) => Point2::from(
                p0.coords * (mt * mt) + c.coords * (2.0 * mt * t) + p1.coords * (t * t),
            ),
            Self::Cubic([p0, c1, c2, p1]) => Point2::from(
                p0.coords * (mt * mt * mt)
                    + c1.coords * (3.0 * mt * mt * t)
                    + c2.coords * (3.0 * mt * t * t)
                    + p1.coords * (t * t * t),
            ),
        }
    }

    /// First derivative of the segment at parameter `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        match self {
            Self::Line([p0, p1]) => p1 - p0,
            Self::Quadratic([p0, c, p1]) => (c - p0) * (2.0 * mt) + (p1 - c) * (2.0 * t),
            Self::Cubic([p0, c1, c2, p1]) => {
                (c1 - p0) * (3.0 * mt * mt) + (c2 - c1) * (6.0 * mt * t) + (p1 - c2) * (3.0 * t * t)
            }
        }
    }

    /// Estimates the full segment length.
    #[must_use]
    pub fn length(&self, quadrature: Quadrature) -> f64 {
        self.length_to(1.0, quadrature)
    }

    /// Estimates the length of the segment from `0` to `t` (clamped to `[0, 1]`).
    ///
    /// Cubics are integrated with `quadrature`, quadratics use the closed-form
    /// antiderivative of their speed, lines use the chord.
    #[must_use]
    pub fn length_to(&self, t: f64, quadrature: Quadrature) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        match self {
            Self::Line([p0, p1]) => (p1 - p0).norm() * t,
            Self::Quadratic([p0, c, p1]) => quadratic_length(p0, c, p1, t)
                .unwrap_or_else(|| quadrature.integrate(t, |s| self.derivative_at(s).norm())),
            Self::Cubic(_) => quadrature.integrate(t, |s| self.derivative_at(s).norm()),
        }
    }
}

/// Evaluates a segment at parameter `t`.
#[must_use]
pub fn point_at_parameter(control_points: &ControlPoints, t: f64) -> Point2 {
    control_points.point_at(t)
}

/// Closed-form quadratic Bezier length from `0` to `t`.
///
/// Returns `None` when the control polygon is collinear with the control point
/// outside the chord, where the formula degenerates.
#[allow(clippy::many_single_char_names)]
fn quadratic_length(p0: &Point2, c: &Point2, p1: &Point2, t: f64) -> Option<f64> {
    // Flat: control point on the chord.
    let polygon = (c - p0).norm() + (p1 - c).norm();
    let chord = (p1 - p0).norm();
    if (polygon - chord).abs() <= TOLERANCE * (1.0 + chord) {
        return Some(chord * t);
    }

    // |B'(t)|^2 = a t^2 + b t + c
    let d = p0.coords - c.coords * 2.0 + p1.coords;
    let e = (c - p0) * 2.0;
    let a = 4.0 * d.dot(&d);
    let b = 4.0 * d.dot(&e);
    let cc = e.dot(&e);
    if a < TOLERANCE {
        return Some(cc.sqrt() * t);
    }

    let bt = b / (2.0 * a);
    let k = cc / a - bt * bt;
    if k <= TOLERANCE {
        return None;
    }
    let ut = t + bt;
    let root_u = (ut * ut + k).sqrt();
    let root_b = (bt * bt + k).sqrt();
    let len = (a.sqrt() / 2.0)
        * (ut * root_u - bt * root_b + k * ((ut + root_u) / (bt + root_b)).ln());
    len.is_finite().then_some(len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn quarter_circle() -> ControlPoints {
        // Cubic approximation of a unit quarter circle.
        let k = 0.551_785;
        ControlPoints::Cubic([
            Point2::new(1.0, 0.0),
            Point2::new(1.0, k),
            Point2::new(k, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn line_point_and_length() {
        let line = ControlPoints::Line([Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)]);
        let mid = point_at_parameter(&line, 0.5);
        assert_relative_eq!(mid.x, 1.5);
        assert_relative_eq!(mid.y, 2.0);
        assert_relative_eq!(line.length(Quadrature::SixPoint), 5.0);
    }

    #[test]
    fn cubic_endpoints_are_exact() {
        let c = quarter_circle();
        assert_relative_eq!(c.point_at(0.0).x, 1.0);
        assert_relative_eq!(c.point_at(1.0).y, 1.0);
        assert_relative_eq!(c.point_at(1.0).x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cubic_quarter_circle_length() {
        let expected = std::f64::consts::FRAC_PI_2;
        let six = quarter_circle().length(Quadrature::SixPoint);
        let twelve = quarter_circle().length(Quadrature::TwelvePoint);
        assert!((six - expected).abs() < 1e-3, "six={six}");
        assert!((twelve - expected).abs() < 1e-3, "twelve={twelve}");
    }

    #[test]
    fn straight_cubic_length_matches_chord() {
        let c = ControlPoints::Cubic([
            Point2::new(0.0, 0.0),
            Point2::new(10.0 / 3.0, 0.0),
            Point2::new(20.0 / 3.0, 0.0),
            Point2::new(10.0, 0.0),
        ]);
        assert_relative_eq!(c.length(Quadrature::SixPoint), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn quadratic_closed_form_matches_quadrature() {
        let q = ControlPoints::Quadratic([
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(10.0, 0.0),
        ]);
        let closed = q.length(Quadrature::SixPoint);
        let numeric = Quadrature::TwelvePoint.integrate(1.0, |s| q.derivative_at(s).norm());
        assert_relative_eq!(closed, numeric, epsilon = 1e-6);
        // Symmetric curve: half the parameter range is half the length.
        assert_relative_eq!(q.length_to(0.5, Quadrature::SixPoint), closed / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_quadratic_is_chord() {
        let q = ControlPoints::Quadratic([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(10.0, 0.0),
        ]);
        assert_relative_eq!(q.length(Quadrature::SixPoint), 10.0);
    }

    #[test]
    fn overshooting_collinear_quadratic_is_finite() {
        // Control point beyond the end: the curve doubles back.
        let q = ControlPoints::Quadratic([
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(10.0, 0.0),
        ]);
        let len = q.length(Quadrature::TwelvePoint);
        assert!(len.is_finite());
        assert!(len > 10.0);
    }

    #[test]
    fn zero_parameter_length_is_zero() {
        assert_relative_eq!(quarter_circle().length_to(0.0, Quadrature::SixPoint), 0.0);
    }

    #[test]
    fn bbox_uses_control_points() {
        let bb = quarter_circle().bbox();
        assert_relative_eq!(bb.x, 0.0);
        assert_relative_eq!(bb.right, 1.0);
        assert_relative_eq!(bb.bottom, 1.0);

        let line = ControlPoints::Line([Point2::new(4.0, -1.0), Point2::new(-2.0, 3.0)]);
        assert_eq!(line.bbox(), BoundingBox::new(-2.0, -1.0, 4.0, 3.0));
    }

    #[test]
    fn degenerate_detection() {
        let p = Point2::new(2.0, 2.0);
        assert!(ControlPoints::Cubic([p, p, p, p]).is_degenerate());
        assert!(!quarter_circle().is_degenerate());
    }
}

use super::{round_to, Point2};

/// Distance (in y) within which the second edge's end point counts as lying
/// on the first edge's line.
pub const SNAP_TOLERANCE: f64 = 0.1;

/// Outcome of testing two polyline edges against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeTest {
    /// The edges' boxes are disjoint; nothing was computed.
    Disjoint,
    /// The supporting lines are parallel (zero determinant).
    Parallel,
    /// The lines cross outside at least one edge.
    Outside,
    /// The edges meet at this point.
    Hit(Point2),
}

impl EdgeTest {
    /// Returns the intersection point, if any.
    #[must_use]
    pub fn point(self) -> Option<Point2> {
        match self {
            Self::Hit(p) => Some(p),
            _ => None,
        }
    }
}

/// Intersects edge `a0 → a1` with edge `b0 → b1`.
///
/// The candidate comes from the line-line determinant formula and is accepted
/// when, rounded to two decimals, it lies inside both edges' boxes. When
/// `b1` lies on the infinite line through `a0 → a1` (within
/// [`SNAP_TOLERANCE`]) and inside `a`'s x-range, `b1` itself is returned; this
/// catches crossings exactly at shared polyline vertices. That branch does not
/// re-check `b1` against `a`'s y-range.
#[must_use]
pub fn edge_edge_intersect_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> EdgeTest {
    if a0.x.max(a1.x) < b0.x.min(b1.x)
        || a0.x.min(a1.x) > b0.x.max(b1.x)
        || a0.y.max(a1.y) < b0.y.min(b1.y)
        || a0.y.min(a1.y) > b0.y.max(b1.y)
    {
        return EdgeTest::Disjoint;
    }

    let cross_a = a0.x * a1.y - a0.y * a1.x;
    let cross_b = b0.x * b1.y - b0.y * b1.x;
    let nx = cross_a * (b0.x - b1.x) - (a0.x - a1.x) * cross_b;
    let ny = cross_a * (b0.y - b1.y) - (a0.y - a1.y) * cross_b;
    let denominator = (a0.x - a1.x) * (b0.y - b1.y) - (a0.y - a1.y) * (b0.x - b1.x);
    if denominator == 0.0 {
        return EdgeTest::Parallel;
    }

    if lies_on_line(a0, a1, b1, SNAP_TOLERANCE) {
        return EdgeTest::Hit(*b1);
    }

    let px = nx / denominator;
    let py = ny / denominator;
    let rx = round_to(px, 2);
    let ry = round_to(py, 2);
    let within = |v: f64, lo: f64, hi: f64| v >= round_to(lo, 2) && v <= round_to(hi, 2);
    if within(rx, a0.x.min(a1.x), a0.x.max(a1.x))
        && within(rx, b0.x.min(b1.x), b0.x.max(b1.x))
        && within(ry, a0.y.min(a1.y), a0.y.max(a1.y))
        && within(ry, b0.y.min(b1.y), b0.y.max(b1.y))
    {
        EdgeTest::Hit(Point2::new(px, py))
    } else {
        EdgeTest::Outside
    }
}

/// Checks whether `p` lies on the line through `l0 → l1` within `tolerance`
/// (measured in y) and inside the segment's x-range. Vertical lines never
/// match.
fn lies_on_line(l0: &Point2, l1: &Point2, p: &Point2, tolerance: f64) -> bool {
    let dx = l1.x - l0.x;
    if dx == 0.0 {
        return false;
    }
    let y_on_line = (l1.y - l0.y) / dx * (p.x - l0.x) + l0.y;
    (y_on_line - p.y).abs() < tolerance && p.x >= l0.x.min(l1.x) && p.x <= l0.x.max(l1.x)
}

/// Fractional position of `p` between `e0` and `e1`, measured along the axis
/// in which the edge spans more. Zero-length edges map to `0`.
#[must_use]
pub fn fraction_along(e0: &Point2, e1: &Point2, p: &Point2) -> f64 {
    let dx = e1.x - e0.x;
    let dy = e1.y - e0.y;
    if dx.abs() >= dy.abs() {
        if dx == 0.0 {
            return 0.0;
        }
        ((p.x - e0.x) / dx).abs()
    } else {
        ((p.y - e0.y) / dy).abs()
    }
}

use super::Point2;

/// An axis-aligned bounding box in path coordinates.
///
/// `y` is the top edge and `bottom` the bottom edge in SVG's y-down frame;
/// nothing here depends on the orientation, only on `y <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum x.
    pub x: f64,
    /// Minimum y.
    pub y: f64,
    /// Maximum x.
    pub right: f64,
    /// Maximum y.
    pub bottom: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its edges.
    #[must_use]
    pub fn new(x: f64, y: f64, right: f64, bottom: f64) -> Self {
        Self {
            x,
            y,
            right,
            bottom,
        }
    }

    /// Computes the box enclosing all `points`, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bb = Self::new(first.x, first.y, first.x, first.y);
        for p in rest {
            bb.x = bb.x.min(p.x);
            bb.y = bb.y.min(p.y);
            bb.right = bb.right.max(p.x);
            bb.bottom = bb.bottom.max(p.y);
        }
        Some(bb)
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Edge-inclusive overlap test: boxes that merely touch overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x <= other.right
            && self.y <= other.bottom
            && self.bottom >= other.y
            && self.right >= other.x
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_points_spans_all() {
        let bb = BoundingBox::from_points(&[
            Point2::new(3.0, -1.0),
            Point2::new(-2.0, 4.0),
            Point2::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(bb, BoundingBox::new(-2.0, -1.0, 3.0, 4.0));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn touching_edges_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn separated_boxes_do_not_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BoundingBox::new(10.1, 0.0, 20.0, 10.0);
        let below = BoundingBox::new(0.0, 10.1, 10.0, 20.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn degenerate_boxes_overlap_when_crossing() {
        // A horizontal and a vertical zero-thickness box.
        let h = BoundingBox::new(0.0, 5.0, 10.0, 5.0);
        let v = BoundingBox::new(5.0, 0.0, 5.0, 10.0);
        assert!(h.overlaps(&v));
    }

    #[test]
    fn union_grows() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(-1.0, 0.5, 0.5, 3.0);
        assert_eq!(a.union(&b), BoundingBox::new(-1.0, 0.0, 1.0, 3.0));
    }
}

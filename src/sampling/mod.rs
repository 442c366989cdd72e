//! Polyline sampling of normalized path commands.

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::bbox_2d::BoundingBox;
use crate::math::bezier::{ControlPoints, Quadrature};
use crate::math::Point2;
use crate::path::{Command, CommandKind, PathData};

/// Minimum number of subdivisions for a curved segment.
pub const MIN_CURVE_SPLITS: usize = 24;

/// Maximum number of subdivisions for any segment.
pub const MAX_SPLITS: usize = 100_000;

/// Parameters controlling sampling density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    /// Target spacing between consecutive sample points. Very small values
    /// are bounded by [`MAX_SPLITS`] per segment.
    pub sample_distance: f64,
    /// Quadrature rule for cubic lengths.
    pub quadrature: Quadrature,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            sample_distance: 10.0,
            quadrature: Quadrature::SixPoint,
        }
    }
}

impl SampleParams {
    /// Checks that `sample_distance` is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.sample_distance.is_finite() && self.sample_distance > 0.0 {
            Ok(())
        } else {
            Err(GeometryError::ParameterOutOfRange {
                parameter: "sample_distance",
                value: self.sample_distance,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            }
            .into())
        }
    }
}

/// A polyline vertex tagged with its curve parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl SamplePoint {
    /// The vertex position.
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Sampled geometry of one drawable command.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInfo {
    /// Index of the command in its [`PathData`].
    pub index: usize,
    pub control_points: ControlPoints,
    /// Arc-length estimate.
    pub length: f64,
    /// Number of polyline edges; `samples.len() == splits + 1`.
    pub splits: usize,
    /// Box over the control points.
    pub bbox: BoundingBox,
    /// Polyline vertices at `t = i / splits`.
    pub samples: Vec<SamplePoint>,
}

impl SegmentInfo {
    /// Samples one segment.
    #[must_use]
    pub fn new(index: usize, control_points: ControlPoints, params: &SampleParams) -> Self {
        let length = control_points.length(params.quadrature);
        let splits = split_count(&control_points, length, params.sample_distance);
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..=splits)
            .map(|i| {
                let t = i as f64 / splits as f64;
                let p = control_points.point_at(t);
                SamplePoint { x: p.x, y: p.y, t }
            })
            .collect();
        Self {
            index,
            control_points,
            length,
            splits,
            bbox: control_points.bbox(),
            samples,
        }
    }

    /// Consecutive sample pairs (the polyline's edges).
    pub fn edges(&self) -> impl Iterator<Item = (&SamplePoint, &SamplePoint)> + '_ {
        self.samples.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// Number of polyline edges for a segment of the given length.
///
/// Lines get one edge. Curves get `ceil(length / sample_distance)` edges
/// clamped to `MIN_CURVE_SPLITS..=MAX_SPLITS`; curves collapsed to a point
/// get one.
fn split_count(control_points: &ControlPoints, length: f64, sample_distance: f64) -> usize {
    if control_points.is_line() || control_points.is_degenerate() {
        return 1;
    }
    let div = (length / sample_distance).ceil();
    if div.is_nan() {
        return MIN_CURVE_SPLITS;
    }
    #[allow(clippy::cast_precision_loss)]
    let max = MAX_SPLITS as f64;
    if div > max {
        trace!(length, sample_distance, "split count capped");
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let div = div.min(max) as usize;
    div.max(MIN_CURVE_SPLITS)
}

/// Control points for `command` drawn from `current`.
///
/// Returns `None` for move-to commands, which draw nothing. Kinds that
/// normalization would have expanded (`H V S T A`) are read as a straight
/// chord to their end point.
#[must_use]
pub fn control_points(command: &Command, current: Point2, subpath_start: Point2) -> Option<ControlPoints> {
    let v = &command.values;
    let end = command.end_point(current, subpath_start);
    let pt = |i: usize| Point2::new(v[i], v[i + 1]);
    let cpts = match command.kind {
        CommandKind::MoveTo => return None,
        CommandKind::CubicTo if v.len() >= 6 => ControlPoints::Cubic([current, pt(0), pt(2), end]),
        CommandKind::QuadTo if v.len() >= 4 => ControlPoints::Quadratic([current, pt(0), end]),
        _ => ControlPoints::Line([current, end]),
    };
    Some(cpts)
}

/// Samples every drawable command of `path`.
///
/// # Errors
///
/// Returns an error if `params` fails [`SampleParams::validate`].
pub fn sample_path(path: &PathData, params: &SampleParams) -> Result<Vec<SegmentInfo>> {
    params.validate()?;

    let mut segments = Vec::with_capacity(path.len());
    let mut current = Point2::origin();
    let mut subpath_start = Point2::origin();
    for (index, command) in path.iter().enumerate() {
        if let Some(cpts) = control_points(command, current, subpath_start) {
            let segment = SegmentInfo::new(index, cpts, params);
            trace!(index, splits = segment.splits, length = segment.length, "sampled segment");
            segments.push(segment);
        }
        current = command.end_point(current, subpath_start);
        if command.kind == CommandKind::MoveTo {
            subpath_start = current;
        }
    }
    Ok(segments)
}

/// Union of all segment boxes, or `None` if nothing is drawn.
#[must_use]
pub fn path_bbox(segments: &[SegmentInfo]) -> Option<BoundingBox> {
    segments
        .iter()
        .map(|s| s.bbox)
        .reduce(|acc, bb| acc.union(&bb))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample(d: &str) -> Vec<SegmentInfo> {
        let path: PathData = d.parse().unwrap();
        sample_path(&path, &SampleParams::default()).unwrap()
    }

    #[test]
    fn lines_have_one_split() {
        let segs = sample("M0 0 L100 0 L100 100 Z");
        assert_eq!(segs.len(), 3);
        for s in &segs {
            assert_eq!(s.splits, 1);
            assert_eq!(s.samples.len(), 2);
        }
        // Close returns to the move-to point.
        assert_eq!(segs[2].control_points.end(), Point2::new(0.0, 0.0));
        assert_relative_eq!(segs[2].length, 100.0 * 2f64.sqrt());
    }

    #[test]
    fn segment_indices_follow_commands() {
        let segs = sample("M0 0 L10 0 M20 20 L30 30");
        let indices: Vec<usize> = segs.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(segs[1].control_points.start(), Point2::new(20.0, 20.0));
    }

    #[test]
    fn short_curves_get_minimum_splits() {
        let segs = sample("M0 0 Q5 5 10 0");
        assert_eq!(segs[0].splits, MIN_CURVE_SPLITS);
        assert_eq!(segs[0].samples.len(), MIN_CURVE_SPLITS + 1);
    }

    #[test]
    fn long_curves_split_by_distance() {
        let segs = sample("M0 0 C0 0 1005 0 1005 0");
        let s = &segs[0];
        assert_relative_eq!(s.length, 1005.0, epsilon = 1e-6);
        assert_eq!(s.splits, 101);
    }

    #[test]
    fn samples_span_unit_interval() {
        let segs = sample("M0 0 C0 50 100 50 100 0");
        let s = &segs[0];
        assert_relative_eq!(s.samples[0].t, 0.0);
        assert_relative_eq!(s.samples[s.splits].t, 1.0);
        assert!(s.samples.windows(2).all(|w| w[0].t <= w[1].t));
        assert_eq!(s.samples[0].point(), Point2::new(0.0, 0.0));
        assert_relative_eq!(s.samples[s.splits].x, 100.0);
        assert_relative_eq!(s.samples[s.splits].y, 0.0);
        assert_eq!(s.edges().count(), s.splits);
    }

    #[test]
    fn bbox_is_over_control_points() {
        let segs = sample("M0 0 C0 50 100 50 100 0");
        // The curve peaks at y = 37.5 but the control box reaches 50.
        assert_relative_eq!(segs[0].bbox.bottom, 50.0);
    }

    #[test]
    fn tiny_sample_distance_is_capped() {
        let path: PathData = "M0 0 Q50 100 100 0".parse().unwrap();
        let params = SampleParams {
            sample_distance: 1e-9,
            ..SampleParams::default()
        };
        let segs = sample_path(&path, &params).unwrap();
        assert_eq!(segs[0].splits, MAX_SPLITS);
        assert_eq!(segs[0].samples.len(), MAX_SPLITS + 1);
    }

    #[test]
    fn degenerate_curve_has_one_split() {
        let segs = sample("M5 5 C5 5 5 5 5 5");
        assert_eq!(segs[0].splits, 1);
    }

    #[test]
    fn arc_path_ends_at_arc_endpoint() {
        let segs = sample("M0,0 A5,5 0 0,1 10,0");
        let last = segs.last().unwrap().samples.last().unwrap();
        assert_relative_eq!(last.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(last.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn path_bbox_unions_segments() {
        let segs = sample("M0 0 L10 5 M-3 20 L4 -1");
        let bb = path_bbox(&segs).unwrap();
        assert_eq!(bb, BoundingBox::new(-3.0, -1.0, 10.0, 20.0));
        assert!(path_bbox(&sample("M1 1")).is_none());
    }

    #[test]
    fn unexpanded_shorthand_is_chord() {
        let h = Command::new(CommandKind::Horizontal, vec![7.0]);
        let cpts = control_points(&h, Point2::new(1.0, 2.0), Point2::origin()).unwrap();
        assert_eq!(cpts, ControlPoints::Line([Point2::new(1.0, 2.0), Point2::new(7.0, 2.0)]));
    }

    #[test]
    fn invalid_sample_distance_is_rejected() {
        let path: PathData = "M0 0 L1 1".parse().unwrap();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = SampleParams {
                sample_distance: bad,
                ..SampleParams::default()
            };
            assert!(sample_path(&path, &params).is_err());
        }
    }
}

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::math::bezier::{ControlPoints, Quadrature};
use crate::math::intersect_2d::{edge_edge_intersect_2d, fraction_along};
use crate::math::Point2;
use crate::path::{parse_and_normalize, ParseOptions, PathData};
use crate::sampling::{path_bbox, sample_path, SampleParams, SamplePoint, SegmentInfo};

/// Sample distance used by [`check_intersection`].
pub const CHECK_SAMPLE_DISTANCE: f64 = 20.0;

/// Parameters for an intersection query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionParams {
    /// Stop after the first accepted intersection.
    pub stop_at_first: bool,
    /// Target spacing of polyline samples; smaller is more accurate. Cost
    /// grows with the product of both paths' sample counts, and each segment
    /// is capped at [`MAX_SPLITS`](crate::sampling::MAX_SPLITS) edges.
    pub sample_distance: f64,
    /// Quadrature rule for cubic lengths.
    pub quadrature: Quadrature,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            stop_at_first: false,
            sample_distance: 10.0,
            quadrature: Quadrature::SixPoint,
        }
    }
}

/// One intersection between segment `segment1` of the first path and
/// segment `segment2` of the second.
///
/// `t1`/`t2` locate the point on each segment's own curve. The control
/// points are carried along so the exact curve points can be re-evaluated
/// at a precision finer than the sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRecord {
    pub x: f64,
    pub y: f64,
    pub t1: f64,
    pub t2: f64,
    pub segment1: usize,
    pub segment2: usize,
    pub cpts1: ControlPoints,
    pub cpts2: ControlPoints,
}

impl IntersectionRecord {
    /// The intersection point found on the polylines.
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Points on the true curves at `t1` and `t2`.
    #[must_use]
    pub fn exact_points(&self) -> (Point2, Point2) {
        (self.cpts1.point_at(self.t1), self.cpts2.point_at(self.t2))
    }
}

/// Counters describing how much work a query did.
///
/// Lets callers tell pairs rejected by bounding boxes apart from pairs that
/// were tested and found not to cross.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// The whole-path boxes overlapped and segments were examined.
    pub paths_overlap: bool,
    /// Segment pairs visited.
    pub segment_pairs: usize,
    /// Segment pairs skipped because their boxes are disjoint.
    pub pairs_pruned: usize,
    /// Segment pairs whose polylines were tested.
    pub pairs_tested: usize,
    /// Polyline edge pairs tested.
    pub edge_tests: usize,
    /// Edge pairs that produced a raw intersection point.
    pub edge_hits: usize,
    /// The query ended at its first record.
    pub stopped_early: bool,
}

/// Records plus the work counters of the query that found them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionReport {
    pub records: Vec<IntersectionRecord>,
    pub stats: SolverStats,
}

/// Finds the intersections between two normalized paths.
///
/// # Algorithm
///
/// 1. Reject if the paths' control-point boxes are disjoint
/// 2. Skip segment pairs whose boxes are disjoint
/// 3. Intersect every polyline edge of one segment with every edge of the other
/// 4. Map each hit to `t` on both curves and keep it if both lie in `[0, 1]`
/// 5. Drop hits whose coordinates round (to 0.1) onto an earlier record
#[derive(Debug)]
pub struct FindIntersections<'a> {
    path1: &'a PathData,
    path2: &'a PathData,
    params: IntersectionParams,
}

impl<'a> FindIntersections<'a> {
    /// Creates a new query with default parameters.
    #[must_use]
    pub fn new(path1: &'a PathData, path2: &'a PathData) -> Self {
        Self {
            path1,
            path2,
            params: IntersectionParams::default(),
        }
    }

    /// Replaces all parameters.
    #[must_use]
    pub fn with_params(mut self, params: IntersectionParams) -> Self {
        self.params = params;
        self
    }

    /// Sets whether to stop at the first intersection.
    #[must_use]
    pub fn stop_at_first(mut self, stop: bool) -> Self {
        self.params.stop_at_first = stop;
        self
    }

    /// Sets the sample distance.
    #[must_use]
    pub fn sample_distance(mut self, distance: f64) -> Self {
        self.params.sample_distance = distance;
        self
    }

    /// Executes the query, returning the intersection records.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample distance is not finite and positive.
    pub fn execute(&self) -> Result<Vec<IntersectionRecord>> {
        Ok(self.execute_report()?.records)
    }

    /// Executes the query, returning records and work counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample distance is not finite and positive.
    pub fn execute_report(&self) -> Result<IntersectionReport> {
        let sample = SampleParams {
            sample_distance: self.params.sample_distance,
            quadrature: self.params.quadrature,
        };
        let segments1 = sample_path(self.path1, &sample)?;
        let segments2 = sample_path(self.path2, &sample)?;

        let mut report = IntersectionReport::default();
        let (Some(bb1), Some(bb2)) = (path_bbox(&segments1), path_bbox(&segments2)) else {
            debug!("a path draws no segments");
            return Ok(report);
        };
        if !bb1.overlaps(&bb2) {
            debug!("path bounding boxes are disjoint");
            return Ok(report);
        }
        report.stats.paths_overlap = true;

        let stop_at_first = self.params.stop_at_first;
        let mut seen = HashSet::new();
        'segments: for s1 in &segments1 {
            for s2 in &segments2 {
                report.stats.segment_pairs += 1;
                if !s1.bbox.overlaps(&s2.bbox) {
                    report.stats.pairs_pruned += 1;
                    continue;
                }
                report.stats.pairs_tested += 1;

                let before = report.records.len();
                segment_intersections(s1, s2, stop_at_first, &mut seen, &mut report);
                if stop_at_first && report.records.len() > before {
                    report.stats.stopped_early = true;
                    break 'segments;
                }
            }
        }

        debug!(
            found = report.records.len(),
            pairs_tested = report.stats.pairs_tested,
            pairs_pruned = report.stats.pairs_pruned,
            edge_tests = report.stats.edge_tests,
            stopped_early = report.stats.stopped_early,
            "intersection query finished"
        );
        Ok(report)
    }
}

/// Dedup key: coordinates rounded to one decimal.
#[allow(clippy::cast_possible_truncation)]
fn dedup_key(p: &Point2) -> (i64, i64) {
    ((p.x * 10.0).round() as i64, (p.y * 10.0).round() as i64)
}

/// Curve parameter of `p` on the edge `e0 → e1`.
fn edge_parameter(e0: &SamplePoint, e1: &SamplePoint, p: &Point2) -> f64 {
    e0.t + fraction_along(&e0.point(), &e1.point(), p) * (e1.t - e0.t)
}

/// Tests the polylines of two segments against each other, appending new
/// records to `report`.
fn segment_intersections(
    s1: &SegmentInfo,
    s2: &SegmentInfo,
    stop_at_first: bool,
    seen: &mut HashSet<(i64, i64)>,
    report: &mut IntersectionReport,
) {
    for (a0, a1) in s1.edges() {
        for (b0, b1) in s2.edges() {
            report.stats.edge_tests += 1;
            let test = edge_edge_intersect_2d(&a0.point(), &a1.point(), &b0.point(), &b1.point());
            let Some(p) = test.point() else {
                continue;
            };
            report.stats.edge_hits += 1;

            let key = dedup_key(&p);
            if seen.contains(&key) {
                continue;
            }
            let t1 = edge_parameter(a0, a1, &p);
            let t2 = edge_parameter(b0, b1, &p);
            if !((0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2)) {
                continue;
            }
            seen.insert(key);
            report.records.push(IntersectionRecord {
                x: p.x,
                y: p.y,
                t1,
                t2,
                segment1: s1.index,
                segment2: s2.index,
                cpts1: s1.control_points,
                cpts2: s2.control_points,
            });
            if stop_at_first {
                return;
            }
        }
    }
}

/// Finds the intersections between two already-normalized paths.
///
/// # Errors
///
/// Returns an error if the sample distance is not finite and positive.
pub fn find_normalized_intersections(
    path1: &PathData,
    path2: &PathData,
    params: &IntersectionParams,
) -> Result<Vec<IntersectionRecord>> {
    FindIntersections::new(path1, path2)
        .with_params(*params)
        .execute()
}

/// Parses two path description strings and finds their intersections.
///
/// # Errors
///
/// Returns an error if either string fails to parse or the sample distance
/// is not finite and positive.
pub fn find_intersections(d1: &str, d2: &str, params: &IntersectionParams) -> Result<Vec<IntersectionRecord>> {
    let options = ParseOptions::default();
    let path1 = parse_and_normalize(d1, &options)?;
    let path2 = parse_and_normalize(d2, &options)?;
    find_normalized_intersections(&path1, &path2, params)
}

/// Returns whether two paths intersect at all.
///
/// Stops at the first hit and samples coarsely ([`CHECK_SAMPLE_DISTANCE`]),
/// which suits collision tests.
///
/// # Errors
///
/// Returns an error if either string fails to parse.
pub fn check_intersection(d1: &str, d2: &str) -> Result<bool> {
    let params = IntersectionParams {
        stop_at_first: true,
        sample_distance: CHECK_SAMPLE_DISTANCE,
        ..IntersectionParams::default()
    };
    Ok(!find_intersections(d1, d2, &params)?.is_empty())
}

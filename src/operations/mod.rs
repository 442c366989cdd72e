mod intersect;

pub use intersect::{
    check_intersection, find_intersections, find_normalized_intersections, FindIntersections,
    IntersectionParams, IntersectionRecord, IntersectionReport, SolverStats, CHECK_SAMPLE_DISTANCE,
};

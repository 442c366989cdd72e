pub mod error;
pub mod math;
pub mod operations;
pub mod path;
pub mod sampling;

pub use error::{GeometryError, ParseError, PathError, Result};
pub use math::bezier::{point_at_parameter, ControlPoints, Quadrature};
pub use operations::{
    check_intersection, find_intersections, find_normalized_intersections, FindIntersections,
    IntersectionParams, IntersectionRecord, IntersectionReport, SolverStats,
};
pub use path::{parse_and_normalize, Command, CommandKind, ParseOptions, PathData};

use thiserror::Error;

/// Top-level error type for path parsing and intersection queries.
#[derive(Debug, Error)]
pub enum PathError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised while reading a path description string.
///
/// Parsing is best-effort: arity shortfalls are kept as underspecified
/// commands rather than reported here.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("path data contains no commands")]
    Empty,

    #[error("path data must start with a move-to command, found '{0}'")]
    MissingMoveTo(char),

    #[error("invalid number '{token}' in '{command}' command")]
    InvalidNumber { token: String, command: char },

    #[error("invalid parse option: {0}")]
    InvalidOption(String),
}

/// Errors related to sampling and intersection parameters.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Convenience type alias for results using [`PathError`].
pub type Result<T> = std::result::Result<T, PathError>;

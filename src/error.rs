use thiserror::Error;

/// Top-level error type for skyclip.
#[derive(Debug, Error)]
pub enum SkyclipError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Polygon(#[from] PolygonError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Errors raised by the point and arc primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("malformed arc: {0}")]
    MalformedArc(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while constructing a polygon loop.
#[derive(Debug, Error)]
pub enum PolygonError {
    #[error("loop has {count} distinct vertices, at least 3 are required")]
    TooFewVertices { count: usize },

    #[error("vertex {index} repeats its predecessor")]
    DuplicateVertex { index: usize },

    #[error("inside point lies on the loop boundary")]
    InsidePointOnBoundary,

    #[error("loop orientation cannot be determined")]
    AmbiguousOrientation,
}

/// Errors raised by boolean operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("boundary walk exceeded {bound} steps (reached {steps})")]
    ClipNonTermination { steps: usize, bound: usize },

    #[error("sub-arc classification is inconsistent between its end nodes")]
    InconsistentClassification,

    #[error("boundary walk reached a vertex with no outgoing edge")]
    OpenBoundary,

    #[error("no inside point found for a result loop")]
    InsidePointNotFound,

    #[error("result contains a hole and cannot be represented")]
    NonSimpleResult,

    #[error("union covers the whole sphere")]
    CoversSphere,

    #[error("intersection of complementary loops is an annulus")]
    Annulus,
}

/// Errors raised while decoding regression fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid hex digit at position {position}")]
    InvalidHex { position: usize },

    #[error("record of {len} bytes is not a whole number of 24-byte triples")]
    TruncatedRecord { len: usize },

    #[error("fixture ends with an incomplete case ({records} trailing records)")]
    IncompleteCase { records: usize },

    #[error("inside-point record holds {triples} triples, expected 1")]
    InsideRecord { triples: usize },
}

/// Convenience type alias for results using [`SkyclipError`].
pub type Result<T> = std::result::Result<T, SkyclipError>;

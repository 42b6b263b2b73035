use thiserror::Error;

/// Errors raised by [`Point`](crate::Point) and the trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two points, or a point and a tree, disagree on dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension the operation required.
        expected: usize,
        /// Dimension that was supplied.
        found: usize,
    },

    /// Points without coordinates cannot be indexed.
    #[error("points must have at least one dimension")]
    ZeroDimension,

    /// A quadtree node would need more than `2^max` child slots.
    #[error("dimension {dimension} exceeds the quadtree limit of {max}")]
    DimensionTooLarge {
        /// Dimension of the rejected point.
        dimension: usize,
        /// Largest supported dimension.
        max: usize,
    },

    /// A coordinate is NaN or infinite, so the point could never be found again.
    #[error("point {0} has a non-finite coordinate")]
    NonFinite(String),

    /// The point to delete is not stored in the tree.
    #[error("point {0} does not exist")]
    NotFound(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for grid construction and generator setup.

/// Errors raised when a grid buffer does not describe a valid map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    /// The buffer length does not match `width * height`.
    #[error("a {width}x{height} grid needs {expected} cells, got {found}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors surfaced at the generator API boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A grid could not be constructed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Two grids that must describe the same map have different sizes.
    #[error("grid size mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A configuration record holds values no generator can work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TerrainError {
    pub(crate) fn check_same_shape<A, B>(
        expected: &crate::Grid<A>,
        found: &crate::Grid<B>,
    ) -> Result<(), TerrainError> {
        if expected.same_shape(found) {
            Ok(())
        } else {
            Err(TerrainError::DimensionMismatch {
                expected: (expected.width(), expected.height()),
                found: (found.width(), found.height()),
            })
        }
    }
}

//! All kinds of errors in this crate.

use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Width and height should be positive, and the grid should fit in memory.
    #[error("Invalid grid dimensions {width}x{height}.")]
    InvalidDimension { width: i64, height: i64 },
    /// The matrix does not have the declared shape.
    #[error("Matrix shape {found:?} does not match the declared shape {expected:?}.")]
    ShapeMismatch {
        /// `(height, width)` of the grid.
        expected: (usize, usize),
        /// `(rows, columns)` of the supplied matrix.
        found: (usize, usize),
    },
    /// The coordinate lies outside the grid.
    #[error("Cell ({x}, {y}) is out of bounds.")]
    OutOfBounds { x: i64, y: i64 },
    /// Cells can only hold 0 or 1.
    #[error("Invalid cell value {0}: cells can only be 0 or 1.")]
    InvalidValue(u8),
    /// The playback rate should be a positive number.
    #[error("Invalid playback rate {0}: generations per second should be positive.")]
    InvalidRate(f64),
}

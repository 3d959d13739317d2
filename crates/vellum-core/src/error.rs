//! Error types for vellum-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vellum-core
#[derive(Debug, Error)]
pub enum Error {
    /// Text that does not have the `<letters><number>` coordinate shape
    #[error("malformed coordinate '{0}': expected column letters followed by a 1-based row number")]
    MalformedCoordinate(String),

    /// A structurally valid coordinate outside the grid bounds
    #[error("coordinate '{coordinate}' is outside the {rows}x{columns} grid")]
    OutOfBounds {
        coordinate: String,
        rows: u32,
        columns: u16,
    },

    /// A layout whose dimensions exceed the grid caps (or are zero)
    #[error("layout of {rows} rows x {columns} columns is invalid: must be between 1x1 and {max_rows}x{max_columns}")]
    LayoutTooLarge {
        rows: u32,
        columns: u16,
        max_rows: u32,
        max_columns: u16,
    },
}

impl Error {
    /// Build an [`Error::OutOfBounds`] for a coordinate against the given bounds
    pub fn out_of_bounds(coordinate: impl ToString, rows: u32, columns: u16) -> Self {
        Error::OutOfBounds {
            coordinate: coordinate.to_string(),
            rows,
            columns,
        }
    }
}

//! Error types for the engine facade

use thiserror::Error;
use vellum_core::Coordinate;
use vellum_formula::FormulaError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine
///
/// Every failure mode of a write or a load is structured enough for a front
/// end to render an actionable message without the engine formatting prose.
#[derive(Debug, Error)]
pub enum Error {
    /// Coordinate or layout errors from the core layer
    #[error(transparent)]
    Core(#[from] vellum_core::Error),

    /// Parse or evaluation errors from the formula layer
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// A write that would make the written cell a member of a cycle
    #[error("cyclic dependency: writing {cell} would close the reference chain {}", format_chain(.chain))]
    CyclicDependency {
        cell: Coordinate,
        chain: Vec<Coordinate>,
    },

    /// Version index outside the 1-based history range
    #[error("version {requested} not found; the history holds {available} version(s)")]
    VersionNotFound { requested: usize, available: usize },

    /// Operation that needs a sheet before any was loaded
    #[error("no sheet loaded")]
    NoSheetLoaded,

    /// File access failure during load, save, or restore
    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A grid description or state file that is not valid JSON for its schema
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

fn format_chain(chain: &[Coordinate]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

//! Convenience re-exports
//!
//! ```rust
//! use vellum::prelude::*;
//! ```

pub use crate::cell::Cell;
pub use crate::engine::{Engine, VersionSummary};
pub use crate::error::{Error, Result};
pub use crate::loader::{CellDescription, GridDescription, LayoutDescription};
pub use crate::sheet::{Sheet, WriteSummary};
pub use vellum_core::{CellValue, Coordinate, Layout, ValueKind};
pub use vellum_formula::{Expr, Operation};

//! # vellum
//!
//! A single-table calculation engine: a grid of addressable cells whose
//! contents are literal values or `{OP, ...}` formulas referencing other
//! cells, evaluated into typed results, with transactional writes and an
//! append-only version history.
//!
//! This crate is the facade: it owns the grid model ([`Cell`], [`Sheet`]),
//! the dependency bookkeeping, the [`VersionManager`], and the [`Engine`]
//! surface front ends talk to. Parsing and evaluation live in
//! `vellum-formula`; the leaf data types live in `vellum-core`.
//!
//! ## Example
//!
//! ```rust
//! use vellum::prelude::*;
//!
//! let description = GridDescription::from_json(r#"{
//!     "name": "budget",
//!     "layout": { "rows": 10, "columns": 4 },
//!     "cells": [
//!         { "coordinate": "A1", "value": "100" },
//!         { "coordinate": "B1", "value": "{TIMES,{REF,A1},2}" }
//!     ]
//! }"#).unwrap();
//!
//! let mut engine = Engine::new();
//! engine.load(description).unwrap();
//!
//! engine.set_cell("A1", "150").unwrap();
//! let b1 = engine.cell("B1").unwrap().unwrap();
//! assert_eq!(b1.effective_value(), &CellValue::Number(300.0));
//! assert_eq!(engine.sheet().unwrap().version(), 2);
//! ```

pub mod cell;
mod dependency;
pub mod engine;
pub mod error;
pub mod loader;
mod persist;
pub mod prelude;
pub mod sheet;
pub mod version;

// Re-exports for convenience
pub use cell::Cell;
pub use engine::{Engine, VersionSummary};
pub use error::{Error, Result};
pub use loader::{CellDescription, GridDescription, LayoutDescription};
pub use sheet::{Sheet, WriteSummary};
pub use version::VersionManager;

// The lower layers' primary types
pub use vellum_core::{CellValue, Coordinate, Layout, ValueKind, MAX_COLUMNS, MAX_ROWS};
pub use vellum_formula::{
    evaluate, parse_cell_text, Expr, FormulaError, Operation, ParsedFormula, ValueLookup,
};

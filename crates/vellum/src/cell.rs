//! Cells
//!
//! One record per occupied coordinate. Cells never mutate themselves or each
//! other; the owning [`Sheet`](crate::Sheet) is the sole mutator.

use std::collections::BTreeSet;
use vellum_core::{CellValue, Coordinate};
use vellum_formula::Expr;

/// One occupied cell of the grid
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) coordinate: Coordinate,
    pub(crate) raw_text: String,
    pub(crate) expression: Expr,
    pub(crate) effective_value: CellValue,
    pub(crate) version: u32,
    pub(crate) influence_from: BTreeSet<Coordinate>,
    pub(crate) influence_on: BTreeSet<Coordinate>,
}

impl Cell {
    /// An empty cell, materialized for a coordinate that is referenced (or
    /// cleared) before any content is written to it
    pub(crate) fn placeholder(coordinate: Coordinate, version: u32) -> Self {
        Self {
            coordinate,
            raw_text: String::new(),
            expression: Expr::Literal(CellValue::Empty),
            effective_value: CellValue::Empty,
            version,
            influence_from: BTreeSet::new(),
            influence_on: BTreeSet::new(),
        }
    }

    /// The cell's coordinate
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// The text as typed by the user
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The parsed form of the raw text
    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// The last evaluation result
    pub fn effective_value(&self) -> &CellValue {
        &self.effective_value
    }

    /// The sheet version at which this cell was last written
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Coordinates this cell's expression reads
    pub fn influence_from(&self) -> &BTreeSet<Coordinate> {
        &self.influence_from
    }

    /// Coordinates whose expressions read this cell
    pub fn influence_on(&self) -> &BTreeSet<Coordinate> {
        &self.influence_on
    }
}

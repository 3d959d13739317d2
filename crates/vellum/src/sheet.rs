//! The sheet
//!
//! A named grid of cells plus the update protocol for a single edit:
//! parse, validate, cycle-check, then re-evaluate the written cell and its
//! transitive dependents into a scratch copy of the cell map, and only swap
//! the scratch in once the whole write has evaluated cleanly. A failed
//! write of any kind leaves the live sheet bit-for-bit unchanged.

use vellum_core::{CellValue, Coordinate, Layout};
use vellum_formula::{evaluate, parse_cell_text, ParsedFormula, ValueLookup};

use crate::cell::Cell;
use crate::dependency::{self, CellMap};
use crate::error::{Error, Result};

/// A named, versioned grid of cells
///
/// The sheet is the sole mutator of its cells. The version counter starts
/// at 1 on load and advances by exactly one per committed write.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub(crate) name: String,
    pub(crate) layout: Layout,
    pub(crate) version: u32,
    pub(crate) cells: CellMap,
    pub(crate) changed_cells: usize,
}

/// Outcome of a committed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// The sheet version the write was stamped with
    pub version: u32,
    /// How many cells' effective values actually changed
    pub changed_cells: usize,
}

/// Effective-value lookup over a cell map
///
/// During propagation this reads the scratch map, so a dependent sees its
/// precedents' freshly re-evaluated values.
struct MapValues<'a>(&'a CellMap);

impl ValueLookup for MapValues<'_> {
    fn effective_value(&self, coordinate: Coordinate) -> Option<CellValue> {
        self.0.get(&coordinate).map(|c| c.effective_value.clone())
    }
}

impl Sheet {
    /// Create an empty sheet at version 1
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            version: 1,
            cells: CellMap::default(),
            changed_cells: 0,
        }
    }

    /// The sheet's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sheet's layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The current version number
    pub fn version(&self) -> u32 {
        self.version
    }

    /// How many cells changed in the most recent write
    pub fn changed_cells(&self) -> usize {
        self.changed_cells
    }

    /// The cell at a coordinate, if occupied
    pub fn cell(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.cells.get(&coordinate)
    }

    /// Iterate over all occupied cells (unordered)
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The effective value at a coordinate; unoccupied reads as `Empty`
    pub fn effective_value(&self, coordinate: Coordinate) -> CellValue {
        self.cells
            .get(&coordinate)
            .map(|c| c.effective_value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Write raw text to a coordinate
    ///
    /// On success the sheet version advances by exactly one and every
    /// re-evaluated cell carries the new stamp. On any failure the sheet is
    /// unchanged.
    pub fn set_cell(&mut self, coordinate: Coordinate, raw_text: &str) -> Result<WriteSummary> {
        self.write_cell(coordinate, raw_text, true)
    }

    /// Initial-load write: same machinery, version pinned at 1
    pub(crate) fn populate(&mut self, coordinate: Coordinate, raw_text: &str) -> Result<()> {
        self.write_cell(coordinate, raw_text, false)?;
        Ok(())
    }

    pub(crate) fn set_changed_cells(&mut self, changed: usize) {
        self.changed_cells = changed;
    }

    fn write_cell(
        &mut self,
        coordinate: Coordinate,
        raw_text: &str,
        advance_version: bool,
    ) -> Result<WriteSummary> {
        if !self.layout.contains(coordinate) {
            return Err(self.bounds_error(coordinate));
        }

        let trimmed = raw_text.trim();
        let ParsedFormula { expr, references } = parse_cell_text(trimmed)?;

        for &reference in &references {
            if !self.layout.contains(reference) {
                return Err(self.bounds_error(reference));
            }
        }

        if let Some(chain) = dependency::find_cycle(&self.cells, coordinate, &references) {
            return Err(Error::CyclicDependency {
                cell: coordinate,
                chain,
            });
        }

        let next_version = if advance_version {
            self.version + 1
        } else {
            self.version
        };

        // Build the candidate state in a scratch copy; the live map stays
        // untouched until the whole write has evaluated.
        let mut scratch = self.cells.clone();

        let target = scratch
            .entry(coordinate)
            .or_insert_with(|| Cell::placeholder(coordinate, self.version));
        let old_references = std::mem::replace(&mut target.influence_from, references.clone());
        target.raw_text = trimmed.to_string();
        target.expression = expr;

        // Rewire the reverse edges to keep influence symmetry
        for stale in old_references.difference(&references) {
            if let Some(cell) = scratch.get_mut(stale) {
                cell.influence_on.remove(&coordinate);
            }
        }
        for &added in references.difference(&old_references) {
            scratch
                .entry(added)
                .or_insert_with(|| Cell::placeholder(added, self.version))
                .influence_on
                .insert(coordinate);
        }

        // Re-evaluate the written cell and every transitive dependent,
        // precedents before dependents
        let order = dependency::propagation_order(&scratch, coordinate);
        let mut changed = 0usize;
        for &current in &order {
            let Some(expression) = scratch.get(&current).map(|c| c.expression.clone()) else {
                continue;
            };
            let value = evaluate(&expression, &MapValues(&scratch))?;
            if let Some(cell) = scratch.get_mut(&current) {
                if cell.effective_value != value {
                    changed += 1;
                }
                cell.effective_value = value;
                cell.version = next_version;
            }
        }

        // Commit
        self.cells = scratch;
        self.version = next_version;
        self.changed_cells = changed;
        log::debug!(
            "sheet '{}': wrote {} = '{}' at version {} ({} re-evaluated, {} changed)",
            self.name,
            coordinate,
            trimmed,
            next_version,
            order.len(),
            changed
        );

        Ok(WriteSummary {
            version: next_version,
            changed_cells: changed,
        })
    }

    fn bounds_error(&self, coordinate: Coordinate) -> Error {
        vellum_core::Error::out_of_bounds(coordinate, self.layout.rows(), self.layout.columns())
            .into()
    }
}

//! Grid descriptions
//!
//! The structured document a sheet is loaded from: name, layout, and an
//! initial raw-text value per pre-populated coordinate, as JSON. Validation
//! is strictly load-wholesale-or-nothing: an oversized layout or a bad cell
//! rejects the whole description before it replaces anything.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use vellum_core::{Coordinate, Layout};

use crate::error::{Error, Result};
use crate::sheet::Sheet;

/// A complete initial grid description
#[derive(Debug, Clone, Deserialize)]
pub struct GridDescription {
    /// Sheet name
    pub name: String,
    /// Grid dimensions and display sizing
    pub layout: LayoutDescription,
    /// Initial raw-text values, one per pre-populated coordinate
    #[serde(default)]
    pub cells: Vec<CellDescription>,
}

/// Layout section of a grid description
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LayoutDescription {
    pub rows: u32,
    pub columns: u16,
    #[serde(default = "default_column_width")]
    pub column_width: u16,
    #[serde(default = "default_row_height")]
    pub row_height: u16,
}

fn default_column_width() -> u16 {
    10
}

fn default_row_height() -> u16 {
    1
}

/// One pre-populated cell: coordinate text plus raw cell text
#[derive(Debug, Clone, Deserialize)]
pub struct CellDescription {
    pub coordinate: String,
    pub value: String,
}

impl GridDescription {
    /// Parse a description from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a description file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Build a fresh sheet from a description
///
/// The layout is validated before any cell is touched. Cells are applied
/// in list order through the normal write machinery with the version
/// pinned at 1. A reference to a coordinate that appears later in the list
/// reads `Empty` when first applied and is re-evaluated when the later
/// cell arrives; an operation that cannot accept `Empty` should order its
/// operands before its readers. Duplicate coordinates apply in order (the
/// last one wins).
pub(crate) fn build_sheet(description: GridDescription) -> Result<Sheet> {
    let layout = Layout::new(
        description.layout.rows,
        description.layout.columns,
        description.layout.column_width,
        description.layout.row_height,
    )?;

    let mut sheet = Sheet::new(description.name, layout);
    let mut applied: BTreeSet<Coordinate> = BTreeSet::new();
    for cell in &description.cells {
        let coordinate = Coordinate::parse(&cell.coordinate)?;
        sheet.populate(coordinate, &cell.value)?;
        applied.insert(coordinate);
    }
    sheet.set_changed_cells(applied.len());

    Ok(sheet)
}

//! The engine facade
//!
//! Owns the live sheet and its version history, and exposes the whole
//! caller surface: load, read, write, version queries, and state
//! persistence. Every operation is synchronous and either fully commits or
//! fully fails with state unchanged; a failed load keeps the previously
//! active sheet (if any) in place.

use std::path::Path;
use vellum_core::Coordinate;

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::loader::{self, GridDescription};
use crate::persist::{self, EngineState, SheetState};
use crate::sheet::{Sheet, WriteSummary};
use crate::version::VersionManager;

/// The calculation engine: one live sheet plus its snapshot history
#[derive(Debug, Default)]
pub struct Engine {
    sheet: Option<Sheet>,
    versions: VersionManager,
}

/// One line of the version listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSummary {
    /// The snapshot's version number (also its 1-based history index)
    pub version: u32,
    /// How many cells changed in the write that produced it
    pub changed_cells: usize,
}

impl Engine {
    /// Create an engine with no sheet loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live sheet with one built from a grid description
    ///
    /// The history is cleared and re-seeded with the version-1 snapshot.
    /// On any failure the previous sheet and history remain active.
    pub fn load(&mut self, description: GridDescription) -> Result<()> {
        let sheet = loader::build_sheet(description)?;
        log::info!(
            "loaded sheet '{}' ({}x{}, {} cells)",
            sheet.name(),
            sheet.layout().rows(),
            sheet.layout().columns(),
            sheet.cell_count()
        );

        self.versions.clear_versions();
        self.versions.add_version(&sheet);
        self.sheet = Some(sheet);
        Ok(())
    }

    /// Load a grid description file (JSON)
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let description = GridDescription::from_path(path)?;
        self.load(description)
    }

    /// The live sheet, read-only
    pub fn sheet(&self) -> Result<&Sheet> {
        self.sheet.as_ref().ok_or(Error::NoSheetLoaded)
    }

    /// The cell at a coordinate given in text form, if occupied
    pub fn cell(&self, name: &str) -> Result<Option<&Cell>> {
        let coordinate = Coordinate::parse(name)?;
        Ok(self.sheet()?.cell(coordinate))
    }

    /// Write raw text to a coordinate given in text form
    ///
    /// On success the history gains one snapshot stamped with the new
    /// version number.
    pub fn set_cell(&mut self, name: &str, raw_text: &str) -> Result<WriteSummary> {
        let coordinate = Coordinate::parse(name)?;
        let sheet = self.sheet.as_mut().ok_or(Error::NoSheetLoaded)?;
        let summary = sheet.set_cell(coordinate, raw_text)?;
        self.versions.add_version(sheet);
        Ok(summary)
    }

    /// Ordered (version, changed-cell count) summaries of the history
    pub fn list_versions(&self) -> Vec<VersionSummary> {
        self.versions
            .versions()
            .iter()
            .map(|sheet| VersionSummary {
                version: sheet.version(),
                changed_cells: sheet.changed_cells(),
            })
            .collect()
    }

    /// The snapshot at 1-based history index `number`
    pub fn version(&self, number: usize) -> Result<&Sheet> {
        self.versions.version(number)
    }

    /// Write the whole engine state (live sheet + history) to a JSON file
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let sheet = self.sheet()?;
        let state = EngineState {
            sheet: SheetState::capture(sheet),
            versions: self
                .versions
                .versions()
                .iter()
                .map(SheetState::capture)
                .collect(),
        };

        let path = path.as_ref();
        let text = persist::to_json(&state)?;
        std::fs::write(path, text).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("saved engine state to '{}'", path.display());
        Ok(())
    }

    /// Replace the engine state from a JSON state file
    ///
    /// Everything is rebuilt and validated before anything is replaced; a
    /// bad file leaves the current state untouched.
    pub fn restore_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;

        let state = persist::from_json(&text)?;
        let sheet = state.sheet.rebuild()?;
        let snapshots = state
            .versions
            .into_iter()
            .map(SheetState::rebuild)
            .collect::<Result<Vec<Sheet>>>()?;

        self.versions = VersionManager::from_snapshots(snapshots);
        self.sheet = Some(sheet);
        log::info!("restored engine state from '{}'", path.display());
        Ok(())
    }
}

//! Version history behavior: listing, bounds, snapshot independence, and
//! history lifecycle across loads.

use pretty_assertions::assert_eq;
use vellum::prelude::*;

fn description(rows: u32, columns: u16, cells: &[(&str, &str)]) -> GridDescription {
    GridDescription {
        name: "test".into(),
        layout: LayoutDescription {
            rows,
            columns,
            column_width: 8,
            row_height: 1,
        },
        cells: cells
            .iter()
            .map(|(coordinate, value)| CellDescription {
                coordinate: (*coordinate).into(),
                value: (*value).into(),
            })
            .collect(),
    }
}

#[test]
fn listing_tracks_version_numbers_and_change_counts() {
    let mut engine = Engine::new();
    engine
        .load(description(10, 5, &[("A1", "1"), ("B1", "2")]))
        .unwrap();

    engine.set_cell("A1", "5").unwrap();
    engine.set_cell("C1", "{PLUS,{REF,A1},{REF,B1}}").unwrap();

    let listing = engine.list_versions();
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0], VersionSummary { version: 1, changed_cells: 2 });
    assert_eq!(listing[1], VersionSummary { version: 2, changed_cells: 1 });
    assert_eq!(listing[2], VersionSummary { version: 3, changed_cells: 1 });
}

#[test]
fn version_access_is_one_based_and_bounded() {
    let mut engine = Engine::new();
    engine.load(description(5, 5, &[("A1", "1")])).unwrap();
    engine.set_cell("A1", "2").unwrap();

    assert!(engine.version(1).is_ok());
    assert!(engine.version(2).is_ok());
    assert!(matches!(
        engine.version(0),
        Err(Error::VersionNotFound {
            requested: 0,
            available: 2
        })
    ));
    assert!(matches!(
        engine.version(3),
        Err(Error::VersionNotFound {
            requested: 3,
            available: 2
        })
    ));
}

#[test]
fn snapshots_are_independent_of_later_mutation() {
    let mut engine = Engine::new();
    engine.load(description(5, 5, &[("A1", "1")])).unwrap();
    engine.set_cell("A1", "2").unwrap();

    let a1 = Coordinate::parse("A1").unwrap();
    assert_eq!(
        engine.version(1).unwrap().effective_value(a1),
        CellValue::Number(1.0)
    );
    assert_eq!(
        engine.version(2).unwrap().effective_value(a1),
        CellValue::Number(2.0)
    );

    // Mutating the live sheet further leaves both snapshots alone
    engine.set_cell("A1", "99").unwrap();
    assert_eq!(
        engine.version(1).unwrap().effective_value(a1),
        CellValue::Number(1.0)
    );
    assert_eq!(
        engine.version(2).unwrap().effective_value(a1),
        CellValue::Number(2.0)
    );
}

#[test]
fn snapshot_versions_match_their_indices() {
    let mut engine = Engine::new();
    engine.load(description(5, 5, &[])).unwrap();
    engine.set_cell("A1", "1").unwrap();
    engine.set_cell("A2", "2").unwrap();

    for number in 1..=3usize {
        assert_eq!(engine.version(number).unwrap().version() as usize, number);
    }
}

#[test]
fn reload_resets_the_history() {
    let mut engine = Engine::new();
    engine.load(description(5, 5, &[("A1", "1")])).unwrap();
    engine.set_cell("A1", "2").unwrap();
    assert_eq!(engine.list_versions().len(), 2);

    engine.load(description(5, 5, &[("B1", "3")])).unwrap();
    let listing = engine.list_versions();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].version, 1);
}

#[test]
fn failed_load_keeps_sheet_and_history() {
    let mut engine = Engine::new();
    engine.load(description(5, 5, &[("A1", "1")])).unwrap();
    engine.set_cell("A1", "2").unwrap();

    // 51 rows exceeds the cap; 21 columns likewise
    assert!(engine.load(description(51, 5, &[])).is_err());
    assert!(engine.load(description(5, 21, &[])).is_err());

    // The previous sheet is still the active one, history intact
    let a1 = Coordinate::parse("A1").unwrap();
    assert_eq!(
        engine.sheet().unwrap().effective_value(a1),
        CellValue::Number(2.0)
    );
    assert_eq!(engine.list_versions().len(), 2);
}

#[test]
fn oversized_load_on_fresh_engine_leaves_no_sheet() {
    let mut engine = Engine::new();
    assert!(matches!(
        engine.load(description(51, 5, &[])),
        Err(Error::Core(vellum_core::Error::LayoutTooLarge { .. }))
    ));
    assert!(matches!(engine.sheet(), Err(Error::NoSheetLoaded)));
}

#[test]
fn operations_before_any_load_fail_cleanly() {
    let mut engine = Engine::new();
    assert!(matches!(engine.sheet(), Err(Error::NoSheetLoaded)));
    assert!(matches!(
        engine.set_cell("A1", "1"),
        Err(Error::NoSheetLoaded)
    ));
    assert!(matches!(
        engine.cell("A1"),
        Err(Error::NoSheetLoaded)
    ));
    assert!(matches!(
        engine.version(1),
        Err(Error::VersionNotFound {
            requested: 1,
            available: 0
        })
    ));
}

//! Load a small grid, edit a cell, and inspect the version history.
//!
//! Run with: cargo run --example quickstart -p vellum

use vellum::prelude::*;

fn main() -> Result<()> {
    let description = GridDescription::from_json(
        r#"{
            "name": "budget",
            "layout": { "rows": 10, "columns": 4 },
            "cells": [
                { "coordinate": "A1", "value": "100" },
                { "coordinate": "A2", "value": "250" },
                { "coordinate": "B1", "value": "{PLUS,{REF,A1},{REF,A2}}" },
                { "coordinate": "B2", "value": "{CONCAT,total: ,{REF,B1}}" }
            ]
        }"#,
    )?;

    let mut engine = Engine::new();
    engine.load(description)?;

    let sheet = engine.sheet()?;
    println!("Loaded '{}' at version {}", sheet.name(), sheet.version());
    println!("B2 = {}", sheet.effective_value(Coordinate::parse("B2")?));

    let summary = engine.set_cell("A1", "175")?;
    println!(
        "Updated A1: version {} ({} cells changed)",
        summary.version, summary.changed_cells
    );
    println!(
        "B2 = {}",
        engine.sheet()?.effective_value(Coordinate::parse("B2")?)
    );

    println!("History:");
    for entry in engine.list_versions() {
        println!(
            "  version {} - {} cell(s) changed",
            entry.version, entry.changed_cells
        );
    }

    Ok(())
}

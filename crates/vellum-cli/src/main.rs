//! vellum console - interactive front end for the calculation engine

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use vellum::prelude::*;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(author, version, about = "Interactive console for the vellum calculation engine")]
struct Cli {
    /// Grid description file (JSON) to load at startup
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut engine = Engine::new();
    if let Some(path) = &cli.file {
        engine
            .load_from_path(path)
            .with_context(|| format!("failed to load '{}'", path.display()))?;
        println!("Loaded sheet '{}'.", engine.sheet()?.name());
    }

    print_help();
    repl(&mut engine)
}

fn repl(engine: &mut Engine) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command.to_ascii_lowercase().as_str() {
            "load" => report(engine.load_from_path(rest.trim()).map(|_| {
                println!("Loaded.");
            })),
            "sheet" => match engine.sheet() {
                Ok(sheet) => print_sheet(sheet),
                Err(e) => println!("{e}"),
            },
            "cell" => match engine.cell(rest.trim()) {
                Ok(Some(cell)) => print_cell(cell),
                Ok(None) => println!("Cell {} is empty.", rest.trim().to_uppercase()),
                Err(e) => println!("{e}"),
            },
            "set" => {
                let (coordinate, value) = rest.trim_start().split_once(' ').unwrap_or((rest, ""));
                report(engine.set_cell(coordinate, value).map(|summary| {
                    println!(
                        "Cell {} updated: version {} ({} cell(s) changed).",
                        coordinate.trim().to_uppercase(),
                        summary.version,
                        summary.changed_cells
                    );
                }));
            }
            "versions" => match engine.sheet() {
                Ok(_) => print_versions(engine),
                Err(e) => println!("{e}"),
            },
            "version" => match rest.trim().parse::<usize>() {
                Ok(number) => match engine.version(number) {
                    Ok(sheet) => print_sheet(sheet),
                    Err(e) => println!("{e}"),
                },
                Err(_) => println!("Expected a version number, e.g. 'version 2'."),
            },
            "save" => report(engine.save_to_path(rest.trim()).map(|_| {
                println!("Saved.");
            })),
            "restore" => report(engine.restore_from_path(rest.trim()).map(|_| {
                println!("Restored.");
            })),
            "help" => print_help(),
            "exit" | "quit" => return Ok(()),
            other => println!("Unknown command '{other}'; type 'help' for the command list."),
        }
    }
}

fn report(result: vellum::Result<()>) {
    if let Err(e) = result {
        println!("{e}");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  load <path>          load a grid description file (JSON)");
    println!("  sheet                show the current sheet");
    println!("  cell <coordinate>    show one cell's full status");
    println!("  set <coordinate> <value>   write raw text to a cell");
    println!("  versions             list the version history");
    println!("  version <n>          show the sheet as of version n");
    println!("  save <path>          save the engine state to a file");
    println!("  restore <path>       restore the engine state from a file");
    println!("  help                 show this list");
    println!("  exit                 leave the console");
}

fn print_sheet(sheet: &Sheet) {
    let layout = sheet.layout();
    let width = layout.column_width() as usize;
    let height = layout.row_height() as usize;

    println!("Sheet Name: {}", sheet.name());
    println!("Version: {}", sheet.version());

    // Column headers
    let mut header = String::from("   |");
    for col in 0..layout.columns() {
        header.push_str(&pad_both_sides(&Coordinate::column_to_letters(col), width));
        header.push('|');
    }
    println!("{header}");

    // Each row occupies `height` lines, value centered vertically
    for row in 0..layout.rows() {
        for line in 0..height.max(1) {
            let mut out = if line == 0 {
                format!("{:02} |", row + 1)
            } else {
                String::from("   |")
            };
            for col in 0..layout.columns() {
                let value = if line == height / 2 {
                    let text = Coordinate::new(row, col)
                        .map(|coordinate| sheet.effective_value(coordinate).to_string())
                        .unwrap_or_default();
                    text.chars().take(width).collect()
                } else {
                    String::new()
                };
                out.push_str(&pad_both_sides(&value, width));
                out.push('|');
            }
            println!("{out}");
        }
    }
}

fn pad_both_sides(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let total = width.saturating_sub(len);
    let left = total / 2;
    let right = total - left;
    format!("{}{}{}", " ".repeat(left), value, " ".repeat(right))
}

fn print_cell(cell: &Cell) {
    println!("Cell: {}", cell.coordinate());
    println!("Original value: {}", cell.raw_text());
    println!("Effective value: {}", cell.effective_value());
    println!("Last modified at version: {}", cell.version());
    println!("Depends on: {}", coordinate_list(cell.influence_from()));
    println!("Feeds into: {}", coordinate_list(cell.influence_on()));
}

fn coordinate_list(coordinates: &std::collections::BTreeSet<Coordinate>) -> String {
    if coordinates.is_empty() {
        return "none".to_string();
    }
    coordinates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_versions(engine: &Engine) {
    println!("Version | Cells Changed");
    for entry in engine.list_versions() {
        println!("{:>7} | {}", entry.version, entry.changed_cells);
    }
}

//! Example: Classify and summarize a CSV file.
//!
//! Usage:
//!   cargo run --example describe -- <csv_path>
//!
//! The types document is written next to the CSV file as `<stem>.types.yaml`.

use std::env;
use std::path::Path;

use eda::{CsvExplorer, Severity};

fn main() -> eda::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example describe -- <csv_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }
    let types_path = path.with_extension("types.yaml");

    let prediction = CsvExplorer::new().predict(path, &types_path)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("File: {}", prediction.source.file);
    println!(
        "Rows: {}  Columns: {}  Delimiter: {:?}",
        prediction.source.row_count, prediction.source.column_count, prediction.source.delimiter
    );
    println!("{}", separator);
    println!();

    println!("## Column Types");
    for record in &prediction.document.columns {
        println!(
            "  {:<24} {:<12} {}",
            record.name,
            record.column_type.as_deref().unwrap_or("-"),
            record.dtype.as_deref().unwrap_or("-")
        );
    }
    println!();

    println!("{}", prediction.summary);

    if !prediction.summary.diagnostics.is_empty() {
        println!("## Diagnostics");
        for diagnostic in &prediction.summary.diagnostics {
            let icon = match diagnostic.severity {
                Severity::Warning => "⚠",
                Severity::Info => "ℹ",
            };
            println!("  {} {}", icon, diagnostic.description);
        }
    }

    println!();
    println!(
        "{} types document: {}",
        if prediction.created { "Created" } else { "Updated" },
        types_path.display()
    );

    Ok(())
}

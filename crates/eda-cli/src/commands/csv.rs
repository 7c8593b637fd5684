//! CSV predict command - classify columns and describe the file.

use std::path::PathBuf;

use colored::Colorize;
use eda::input::ParserConfig;
use eda::{CsvExplorer, ExplorerConfig, Severity};

pub fn run(
    csv_path: PathBuf,
    types: PathBuf,
    nrows: Option<usize>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !csv_path.is_file() {
        return Err(format!("Could not find '{}'.", csv_path.display()).into());
    }

    let config = ExplorerConfig {
        parser: ParserConfig {
            max_rows: nrows,
            ..ParserConfig::default()
        },
        ..ExplorerConfig::default()
    };
    let prediction = CsvExplorer::with_config(config).predict(&csv_path, &types)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&prediction.summary.column_types())?
        );
        return Ok(());
    }

    print!("{}", prediction.summary);
    if verbose && !prediction.summary.diagnostics.is_empty() {
        println!("\n{}", "Diagnostics:".yellow().bold());
        for diagnostic in &prediction.summary.diagnostics {
            let label = match diagnostic.severity {
                Severity::Info => "info".blue(),
                Severity::Warning => "warning".yellow(),
            };
            println!("  [{}] {}", label, diagnostic.description);
        }
    }

    let action = if prediction.created { "Created" } else { "Updated" };
    eprintln!(
        "\n{} {} ({} columns)",
        format!("{} types document:", action).green().bold(),
        types.display().to_string().white(),
        prediction.document.columns.len()
    );

    Ok(())
}

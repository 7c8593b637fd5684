//! eda CLI - exploratory data analysis for CSV, PDF and image files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, CsvCommands, ImagesCommands, PdfCommands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Csv {
            command:
                CsvCommands::Predict {
                    csv_path,
                    types,
                    nrows,
                    json,
                },
        } => commands::csv::run(csv_path, types, nrows, json, cli.verbose),

        Commands::Pdf {
            command:
                PdfCommands::Find {
                    path,
                    output,
                    watermark,
                },
        } => commands::pdf::run(path, output, watermark),

        Commands::Images {
            command: ImagesCommands::Find { path, output },
        } => commands::images::run(path, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

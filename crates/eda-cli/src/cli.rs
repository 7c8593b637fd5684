//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// eda: exploratory data analysis for CSV, PDF and image files
#[derive(Parser)]
#[command(name = "eda")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze CSV files
    Csv {
        #[command(subcommand)]
        command: CsvCommands,
    },

    /// Analyze PDF files
    Pdf {
        #[command(subcommand)]
        command: PdfCommands,
    },

    /// Analyze image files
    Images {
        #[command(subcommand)]
        command: ImagesCommands,
    },
}

#[derive(Subcommand)]
pub enum CsvCommands {
    /// Predict column types and describe the CSV
    Predict {
        /// CSV file to read
        #[arg(long = "csv-path", alias = "csv_path", value_name = "FILE")]
        csv_path: PathBuf,

        /// YAML types document to read / write
        #[arg(long, value_name = "YAML")]
        types: PathBuf,

        /// Number of rows to read (default: all)
        #[arg(long)]
        nrows: Option<usize>,

        /// Print the column types as JSON instead of the report
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PdfCommands {
    /// Find all PDF files in a directory and collect their metadata
    Find {
        /// Directory in which all PDF files are analyzed
        #[arg(long, value_name = "DIR")]
        path: PathBuf,

        /// CSV file to write
        #[arg(long, value_name = "CSV")]
        output: PathBuf,

        /// Also search each document for a watermark
        #[arg(long)]
        watermark: bool,
    },
}

#[derive(Subcommand)]
pub enum ImagesCommands {
    /// Find all image files in a directory and collect their metadata
    Find {
        /// Directory in which all image files are analyzed
        #[arg(long, value_name = "DIR")]
        path: PathBuf,

        /// CSV file to write
        #[arg(long, value_name = "CSV")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "eda", "csv", "predict", "--csv-path", "a.csv", "--types", "a.yaml", "--nrows", "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Csv {
                command: CsvCommands::Predict { csv_path, nrows, json, .. },
            } => {
                assert_eq!(csv_path, PathBuf::from("a.csv"));
                assert_eq!(nrows, Some(10));
                assert!(!json);
            }
            _ => panic!("expected csv predict"),
        }
    }

    #[test]
    fn test_parse_pdf_find() {
        let cli =
            Cli::try_parse_from(["eda", "-v", "pdf", "find", "--path", ".", "--output", "o.csv"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Pdf {
                command: PdfCommands::Find { watermark: false, .. }
            }
        ));
    }
}

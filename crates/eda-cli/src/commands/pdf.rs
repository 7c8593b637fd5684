//! PDF find command - collect metadata of every PDF below a directory.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;
use eda::collect::{collect_pdfs, write_records, PdfOptions};
use eda::CollectorConfig;

pub fn run(
    path: PathBuf,
    output: PathBuf,
    watermark: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Path not found: {}", path.display()).into());
    }

    let config = CollectorConfig::load_or_init()?;
    let options = PdfOptions {
        config: config.pdf,
        watermark,
    };

    let records = collect_pdfs(&path, &options);
    let file = File::create(&output)?;
    write_records(&records, BufWriter::new(file))?;

    let failed = records.iter().filter(|r| r.is_errornous).count();
    eprintln!(
        "{} {} PDF files ({} unreadable) to {}",
        "Wrote".green().bold(),
        records.len(),
        failed.to_string().red(),
        output.display().to_string().white()
    );

    Ok(())
}

//! Images find command - collect metadata of every image below a directory.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;
use eda::collect::{collect_images, write_records};
use eda::CollectorConfig;

pub fn run(path: PathBuf, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Path not found: {}", path.display()).into());
    }

    let config = CollectorConfig::load_or_init()?;

    let records = collect_images(&path, &config.images);
    let file = File::create(&output)?;
    write_records(&records, BufWriter::new(file))?;

    eprintln!(
        "{} {} images to {}",
        "Wrote".green().bold(),
        records.len(),
        output.display().to_string().white()
    );

    Ok(())
}

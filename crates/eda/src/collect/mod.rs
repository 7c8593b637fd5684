//! Metadata collectors for directories of PDF and image files.
//!
//! Each collector walks a directory tree, turns every matching file into a
//! [`Record`] and writes all records as one `;`-delimited CSV file.

pub mod images;
pub mod pdf;
mod tools;

use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;

pub use images::{collect_images, ImageInfo};
pub use pdf::{collect_pdfs, longest_common_substring, PdfInfo, PdfOptions};
pub use tools::run_tool;

/// Delimiter of the collector output files.
pub const OUTPUT_DELIMITER: u8 = b';';

/// A flat row of named cells in output column order.
pub trait Record {
    fn to_row(&self) -> IndexMap<String, String>;
}

/// Every regular file below `root` that satisfies `matches`, sorted by path.
///
/// Unreadable directory entries are logged and skipped.
pub fn find_files(root: &Path, matches: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && matches(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    debug!(root = %root.display(), count = files.len(), "found files");
    files
}

/// Write records as CSV. The header comes from the first record; nothing is
/// written for an empty slice.
pub fn write_records<R: Record>(records: &[R], writer: impl Write) -> Result<()> {
    let Some(first) = records.first() else {
        warn!("no files found, nothing to write");
        return Ok(());
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .from_writer(writer);

    let header: Vec<String> = first.to_row().into_keys().collect();
    csv_writer.write_record(&header)?;

    for record in records {
        let row = record.to_row();
        let cells = header
            .iter()
            .map(|key| row.get(key).map(String::as_str).unwrap_or(""));
        csv_writer.write_record(cells)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

//! PDF metadata collection through the poppler command-line tools.
//!
//! `pdfinfo` supplies the document info dictionary, page count and
//! encryption flag; `pdftotext` supplies the text used for the character
//! count and the optional watermark search.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use crate::config::PdfConfig;
use crate::error::EdaError;

use super::tools::run_tool;
use super::{find_files, Record};

const PDFINFO: &str = "pdfinfo";
const PDFTOTEXT: &str = "pdftotext";

/// Options for a PDF collection run.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub config: PdfConfig,
    /// Also search every document for a watermark.
    pub watermark: bool,
}

/// Metadata of one PDF file.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfInfo {
    pub path: PathBuf,
    /// Configured info keys; `None` when the document does not have the key.
    pub keys: IndexMap<String, Option<String>>,
    pub is_errornous: bool,
    pub is_encrypted: bool,
    /// `-1` when unknown.
    pub nb_pages: i64,
    /// Top-level outline entries; `pdfinfo` does not report outlines, so
    /// this stays `-1`.
    pub nb_toc_top_level: i64,
    pub nb_characters: usize,
    /// Present only when watermark search was requested.
    pub watermark: Option<Option<String>>,
}

impl PdfInfo {
    fn new(path: PathBuf, config: &PdfConfig) -> Self {
        Self {
            path,
            keys: config.keys.iter().map(|k| (k.clone(), None)).collect(),
            is_errornous: false,
            is_encrypted: false,
            nb_pages: -1,
            nb_toc_top_level: -1,
            nb_characters: 0,
            watermark: None,
        }
    }
}

impl Record for PdfInfo {
    fn to_row(&self) -> IndexMap<String, String> {
        let mut row = IndexMap::new();
        row.insert("path".to_string(), self.path.display().to_string());
        for (key, value) in &self.keys {
            row.insert(key.clone(), value.clone().unwrap_or_default());
        }
        row.insert("is_errornous".to_string(), u8::from(self.is_errornous).to_string());
        row.insert("is_encrypted".to_string(), u8::from(self.is_encrypted).to_string());
        row.insert("nb_pages".to_string(), self.nb_pages.to_string());
        row.insert("nb_toc_top_level".to_string(), self.nb_toc_top_level.to_string());
        row.insert("nb_characters".to_string(), self.nb_characters.to_string());
        if let Some(watermark) = &self.watermark {
            row.insert("watermark".to_string(), watermark.clone().unwrap_or_default());
        }
        row
    }
}

/// Case-insensitive `.pdf` check.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Collect metadata for every PDF below `root`.
pub fn collect_pdfs(root: &Path, options: &PdfOptions) -> Vec<PdfInfo> {
    let files = find_files(root, is_pdf);
    info!(count = files.len(), root = %root.display(), "analyzing PDF files");

    files
        .into_iter()
        .map(|path| {
            let path = path.canonicalize().unwrap_or(path);
            get_pdf_info(&path, options)
        })
        .collect()
}

/// Metadata of a single PDF. Tool failures are recorded on the result.
pub fn get_pdf_info(path: &Path, options: &PdfOptions) -> PdfInfo {
    let config = &options.config;
    let timeout = Duration::from_secs(config.tool_timeout_secs);
    let mut pdf = PdfInfo::new(path.to_path_buf(), config);
    if options.watermark {
        pdf.watermark = Some(None);
    }

    let output = match run_tool(PDFINFO, &[&path_arg(path)], path, timeout) {
        Ok(output) => output,
        Err(EdaError::ExternalTool { message, .. }) if is_password_error(&message) => {
            pdf.is_encrypted = true;
            return pdf;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read PDF");
            pdf.is_errornous = true;
            return pdf;
        }
    };

    let document_info = parse_pdfinfo(&output);
    if let Some(pages) = document_info.get("Pages").and_then(|p| p.parse().ok()) {
        pdf.nb_pages = pages;
    }
    pdf.is_encrypted = document_info
        .get("Encrypted")
        .is_some_and(|v| v.starts_with("yes"));

    for (key, value) in &document_info {
        let known = config.keys.contains(key) || config.ignore_keys.contains(key);
        if !known && !key.starts_with("FL#") && !key.starts_with("/FL#") {
            error!(key = %key, value = %value, path = %path.display(), "unknown PDF info key");
        }
    }
    for (key, slot) in pdf.keys.iter_mut() {
        *slot = document_info.get(key).cloned();
    }

    match extract_text(path, None, timeout) {
        Ok(text) => pdf.nb_characters = text.chars().count(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not extract text");
            pdf.is_errornous = true;
        }
    }

    if options.watermark && pdf.nb_pages > 1 {
        pdf.watermark = Some(find_watermark(path, pdf.nb_pages as usize, timeout));
    }

    pdf
}

/// Key/value pairs from `pdfinfo` output, in output order.
pub fn parse_pdfinfo(output: &str) -> IndexMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn is_password_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("password") || lower.contains("encrypted")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Text of the document, or of a single 1-based page.
fn extract_text(path: &Path, page: Option<usize>, timeout: Duration) -> crate::Result<String> {
    let file = path_arg(path);
    match page {
        None => run_tool(PDFTOTEXT, &["-q", &file, "-"], path, timeout),
        Some(page) => {
            let page = page.to_string();
            run_tool(
                PDFTOTEXT,
                &["-q", "-f", &page, "-l", &page, &file, "-"],
                path,
                timeout,
            )
        }
    }
}

/// Text shared by all pages, found by intersecting consecutive pages.
///
/// Returns `None` when a page cannot be extracted and `Some("")` when the
/// pages share nothing consistent.
fn find_watermark(path: &Path, nb_pages: usize, timeout: Duration) -> Option<String> {
    let mut pages = Vec::with_capacity(nb_pages);
    for page in 1..=nb_pages {
        match extract_text(path, Some(page), timeout) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!(path = %path.display(), page, error = %e, "could not extract page");
                return None;
            }
        }
    }
    let watermark = watermark_of(&pages);
    debug!(path = %path.display(), watermark = ?watermark, "watermark search finished");
    watermark
}

/// Watermark candidate of page texts in order.
///
/// Each pair of consecutive pages proposes its longest common substring. The
/// candidate shrinks to a proposal contained in it and collapses to `""` as
/// soon as a proposal is not. `None` for fewer than two pages.
pub fn watermark_of(pages: &[String]) -> Option<String> {
    let mut watermark: Option<String> = None;
    for pair in pages.windows(2) {
        let candidate = longest_common_substring(&pair[1], &pair[0]);
        watermark = Some(match watermark {
            None => candidate,
            Some(current) if current.contains(&candidate) => candidate,
            Some(_) => String::new(),
        });
    }
    watermark
}

/// Longest run of characters shared by `a` and `b`; the earliest in `a` wins
/// among equally long runs.
pub fn longest_common_substring(a: &str, b: &str) -> String {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return String::new();
    }

    // Rolling row of suffix match lengths.
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    let (mut best_len, mut best_end) = (0, 0);

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            current[j] = if a[i - 1] == b[j - 1] {
                previous[j - 1] + 1
            } else {
                0
            };
            if current[j] > best_len {
                best_len = current[j];
                best_end = i;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    a[best_end - best_len..best_end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pdfinfo() {
        let output = "Title:          Annual Report\nAuthor:         Jane\nPages:          12\nEncrypted:      no\nPage size:      595 x 842 pts (A4)\n";
        let info = parse_pdfinfo(output);

        assert_eq!(info.get("Title").map(String::as_str), Some("Annual Report"));
        assert_eq!(info.get("Pages").map(String::as_str), Some("12"));
        assert_eq!(info.get("Page size").map(String::as_str), Some("595 x 842 pts (A4)"));
        assert_eq!(info.keys().next().map(String::as_str), Some("Title"));
    }

    #[test]
    fn test_parse_pdfinfo_keeps_colons_in_values() {
        let info = parse_pdfinfo("CreationDate:   Mon Jan  1 10:00:00 2018 CET\n");
        assert_eq!(
            info.get("CreationDate").map(String::as_str),
            Some("Mon Jan  1 10:00:00 2018 CET")
        );
    }

    #[test]
    fn test_longest_common_substring() {
        assert_eq!(longest_common_substring("xxCONFIDENTIALyy", "aCONFIDENTIALb"), "CONFIDENTIAL");
        assert_eq!(longest_common_substring("abc", "xyz"), "");
        assert_eq!(longest_common_substring("", "abc"), "");
        assert_eq!(longest_common_substring("äöü-draft", "draft-äöü"), "draft");
    }

    #[test]
    fn test_watermark_of() {
        let pages: Vec<String> = ["page one DRAFT", "DRAFT page two", "three DRAFT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(watermark_of(&pages), Some("DRAFT".to_string()));

        assert_eq!(watermark_of(&pages[..1]), None);
    }

    #[test]
    fn test_watermark_collapses_when_pages_disagree() {
        let pages: Vec<String> = ["HEADER one", "HEADER two", "FOOTER two"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(watermark_of(&pages), Some(String::new()));
    }

    #[test]
    fn test_row_layout() {
        let config = PdfConfig {
            keys: vec!["Title".to_string(), "Author".to_string()],
            ignore_keys: Vec::new(),
            tool_timeout_secs: 1,
        };
        let mut pdf = PdfInfo::new(PathBuf::from("/tmp/a.pdf"), &config);
        pdf.keys.insert("Title".to_string(), Some("Report".to_string()));
        pdf.is_encrypted = true;

        let row = pdf.to_row();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "path",
                "Title",
                "Author",
                "is_errornous",
                "is_encrypted",
                "nb_pages",
                "nb_toc_top_level",
                "nb_characters"
            ]
        );
        assert_eq!(row["nb_toc_top_level"], "-1");
        assert_eq!(row["is_encrypted"], "1");
        assert_eq!(row["is_errornous"], "0");
        assert_eq!(row["Author"], "");
        assert_eq!(row["nb_pages"], "-1");
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a/b.PDF")));
        assert!(!is_pdf(Path::new("a/pdf")));
    }

    #[test]
    fn test_unreadable_file_is_errornous() {
        let options = PdfOptions {
            config: PdfConfig {
                keys: Vec::new(),
                ignore_keys: Vec::new(),
                tool_timeout_secs: 5,
            },
            watermark: false,
        };
        let info = get_pdf_info(Path::new("/nonexistent/file.pdf"), &options);

        assert!(info.is_errornous || info.is_encrypted);
        assert_eq!(info.nb_pages, -1);
    }
}

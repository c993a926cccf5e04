use crate::{Error, ImagePresence, PageRecord, Result};
use lopdf::Document;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Width of the `=` rule under each page heading in the text report.
pub const SEPARATOR_WIDTH: usize = 40;

// ── TextExtractor ─────────────────────────────────────────────────────────────

/// Text pass over one parsed PDF.
///
/// This is a separate parse from the image pass; [`TextExtractor::aggregate`]
/// refuses to pair the two when their page counts differ.
pub struct TextExtractor {
    document: Document,
}

impl TextExtractor {
    /// Load a PDF from the file system.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            document: Document::load(path)?,
        })
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            document: Document::load_mem(data)?,
        })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Best-effort plain text of the page with 1-based `page_number`.
    pub fn page_text(&self, page_number: u32) -> Result<String> {
        self.document
            .extract_text(&[page_number])
            .map_err(|e| Error::TextExtraction {
                page: page_number,
                reason: e.to_string(),
            })
    }

    /// Text of every page, in document order.
    pub fn extract_pages(&self) -> Result<Vec<String>> {
        self.page_numbers()
            .into_iter()
            .map(|n| self.page_text(n))
            .collect()
    }

    /// Build one [`PageRecord`] per page, pairing each page's text with the
    /// image flag at the same index, and append each page to `report` as it
    /// is produced.
    ///
    /// Fails with [`Error::PageCountMismatch`] before touching the report if
    /// `flags` does not have exactly one entry per page.
    pub fn aggregate(
        &self,
        flags: &[ImagePresence],
        report: &TextReportWriter,
    ) -> Result<Vec<PageRecord>> {
        let page_numbers = self.page_numbers();
        if page_numbers.len() != flags.len() {
            return Err(Error::PageCountMismatch {
                images: flags.len(),
                text: page_numbers.len(),
            });
        }

        let mut records = Vec::with_capacity(page_numbers.len());
        for (page_index, (page_number, flag)) in page_numbers.into_iter().zip(flags).enumerate() {
            let text = self.page_text(page_number)?;
            debug!("Page {} yielded {} bytes of text", page_index + 1, text.len());

            let record = PageRecord::new(page_index, text, *flag);
            report.append_page(&record)?;
            records.push(record);
        }

        info!("Extracted text from {} page(s)", records.len());
        Ok(records)
    }

    /// lopdf page numbers in document order. These are the keys of the page
    /// map, so they line up with the image pass's zero-based positions.
    fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().into_keys().collect()
    }
}

// ── TextReportWriter ──────────────────────────────────────────────────────────

/// Appends human-readable page blocks to a text file.
///
/// The file is opened in append mode for every page and never truncated, so
/// repeated runs accumulate.
#[derive(Debug, Clone)]
pub struct TextReportWriter {
    path: PathBuf,
}

impl TextReportWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one page block.
    pub fn append_page(&self, record: &PageRecord) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_page_block(record).as_bytes())
    }
}

/// Render a page as `Page {n}`, a rule of `=`, the text and a blank line.
///
/// ```
/// use pdf2table::{ImagePresence, PageRecord};
/// use pdf2table::text::format_page_block;
///
/// let record = PageRecord::new(0, "Hello".into(), ImagePresence::No);
/// let block = format_page_block(&record);
/// assert_eq!(block, format!("Page 1\n{}\nHello\n\n", "=".repeat(40)));
/// ```
pub fn format_page_block(record: &PageRecord) -> String {
    format!(
        "Page {}\n{}\n{}\n\n",
        record.page_number(),
        "=".repeat(SEPARATOR_WIDTH),
        record.text()
    )
}

//! # pdf2table
//!
//! Extracts per-page text and embedded images from a PDF document and stores
//! every page as one row of a relational table.
//!
//! ## What this crate does
//!
//! 1. **Prepare the table**: creates the destination table if it is missing.
//! 2. **Extract images**: walks every page's resources, writes each embedded
//!    image verbatim to `image{page}_{ordinal}.{ext}` and records whether the
//!    page carries any image at all.
//! 3. **Extract text**: renders each page to plain text, appends a
//!    human-readable block per page to a report file and pairs the text with
//!    the page's image flag.
//! 4. **Persist**: inserts one row per page, in page order. A failing row is
//!    reported and skipped; the remaining rows are still written.
//!
//! ## Quick example
//!
//! ```no_run
//! use pdf2table::{pipeline, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     pdf_path: "report.pdf".into(),
//!     ..Default::default()
//! };
//!
//! let report = pipeline::run(&config)?;
//! println!("{} pages, {} rows stored", report.pages, report.persisted.inserted);
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod images;
mod pdf_utils;
pub mod pipeline;
mod record;
pub mod store;
pub mod text;

pub use images::{ImageExtractor, PageImage};
pub use pipeline::RunReport;
pub use record::{ImagePresence, ImagePresenceList, PageRecord};
pub use store::{PageStore, PersistFailure, PersistReport, TableRow};
pub use text::{TextExtractor, TextReportWriter};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for a full extraction run.
///
/// Every field has a default, so a TOML file only needs to name what it
/// changes:
///
/// ```
/// use pdf2table::Config;
///
/// let cfg = Config::from_toml_str(r#"
///     pdf_path = "scan.pdf"
///
///     [database]
///     table = "scan_pages"
/// "#).unwrap();
///
/// assert_eq!(cfg.pdf_path.to_str(), Some("scan.pdf"));
/// assert_eq!(cfg.database.table, "scan_pages");
/// assert_eq!(cfg.text_output_path.to_str(), Some("extracted_text.txt"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The PDF to read. It is parsed twice: once for images, once for text.
    pub pdf_path: PathBuf,

    /// Text report that every run appends to. Never truncated.
    pub text_output_path: PathBuf,

    /// Folder receiving extracted images; created when missing.
    pub images_output_folder: PathBuf,

    /// Destination table settings.
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("sample2.pdf"),
            text_output_path: PathBuf::from("extracted_text.txt"),
            images_output_folder: PathBuf::from("extracted_images"),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.database.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Where page rows are written and how connections are managed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. Created on first use.
    pub path: PathBuf,

    /// Destination table. Must be a plain SQL identifier.
    pub table: String,

    /// Connection lifecycle used by the persistence step.
    pub connection: ConnectionMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("pdfdata.db"),
            table: "pdfdata".into(),
            connection: ConnectionMode::PerRow,
        }
    }
}

impl DatabaseConfig {
    /// Reject table names that cannot be spliced into SQL as a bare identifier.
    ///
    /// ```
    /// use pdf2table::DatabaseConfig;
    ///
    /// let mut db = DatabaseConfig::default();
    /// assert!(db.validate().is_ok());
    ///
    /// db.table = "pages; DROP TABLE pages".into();
    /// assert!(db.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.table.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };

        if valid {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "table name '{}' is not a plain identifier",
                self.table
            )))
        }
    }
}

/// Connection lifecycle for inserting page rows.
///
/// Both modes give every row an independent outcome: one failed insert never
/// prevents the others from being stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionMode {
    /// Open, insert and close a fresh connection for every page.
    #[default]
    PerRow,

    /// One connection and one transaction for the whole run, with a savepoint
    /// around each row so a failure only rolls back that row.
    Shared,
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem I/O error occurred (reading the PDF, writing images or the
    /// text report).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    /// The input parsed but is not usable as a paged document.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// An image object was found but its stream could not be read.
    #[error("Failed to extract image {ordinal} on page {page}: {reason}")]
    ImageExtraction {
        page: u32,
        ordinal: usize,
        reason: String,
    },

    /// Text could not be produced for a page.
    #[error("Failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The image pass and the text pass disagree on the number of pages.
    #[error("Page count mismatch: image pass saw {images} page(s), text pass saw {text}")]
    PageCountMismatch { images: usize, text: usize },

    /// The database driver returned an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The configuration file is not valid TOML for [`Config`].
    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

//! The end-to-end run: prepare the table, extract images, extract text, store
//! the pages.

use crate::{
    Config, ImageExtractor, ImagePresenceList, PageRecord, PageStore, PersistFailure,
    PersistReport, Result, TextExtractor, TextReportWriter,
};
use tracing::{error, info, warn};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Pages processed.
    pub pages: usize,

    /// Pages carrying at least one embedded image.
    pub pages_with_images: usize,

    /// Why the table could not be prepared, if it could not. The run carries
    /// on regardless and every insert reports its own outcome.
    pub schema_error: Option<String>,

    /// Row insert outcomes.
    pub persisted: PersistReport,
}

/// Run the whole pipeline against `config`.
///
/// Database failures (schema creation, individual inserts) are logged and
/// returned in the [`RunReport`]. Extraction and filesystem failures abort
/// the run with `Err`.
pub fn run(config: &Config) -> Result<RunReport> {
    let store = PageStore::new(config.database.clone())?;

    let schema_error = match store.ensure_schema() {
        Ok(()) => None,
        Err(e) => {
            warn!("Error while creating the table: {e}");
            Some(e.to_string())
        }
    };

    let (flags, records) = extract(config)?;

    let persisted = match store.persist_all(&records) {
        Ok(report) => report,
        Err(e) => {
            error!("Shared connection failed, no rows were stored: {e}");
            PersistReport {
                inserted: 0,
                failures: records
                    .iter()
                    .map(|r| PersistFailure {
                        page_number: r.page_number(),
                        reason: e.to_string(),
                    })
                    .collect(),
            }
        }
    };

    Ok(RunReport {
        pages: records.len(),
        pages_with_images: flags.iter().filter(|f| f.is_yes()).count(),
        schema_error,
        persisted,
    })
}

/// The extraction half of a run: write images, append the text report and
/// return the per-page flags with the records built from them.
pub fn extract(config: &Config) -> Result<(ImagePresenceList, Vec<PageRecord>)> {
    info!("Extracting images from {}", config.pdf_path.display());
    let flags = ImageExtractor::from_path(&config.pdf_path)?
        .extract_to_folder(&config.images_output_folder)?;

    info!("Extracting text from {}", config.pdf_path.display());
    let report = TextReportWriter::new(config.text_output_path.clone());
    let records = TextExtractor::from_path(&config.pdf_path)?.aggregate(&flags, &report)?;

    Ok((flags, records))
}

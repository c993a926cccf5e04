//! Command-line entry point: extract a PDF's pages and store them as rows.
//!
//! With no arguments it reads `sample2.pdf`, appends to `extracted_text.txt`,
//! writes images to `extracted_images/` and stores rows in `pdfdata.db`.

use clap::Parser;
use pdf2table::{pipeline, Config, ConnectionMode, Result, RunReport};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2table",
    version,
    about = "Extract per-page text and images from a PDF into a database table"
)]
struct Cli {
    /// TOML configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input PDF path.
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Text report to append to.
    #[arg(long)]
    text_out: Option<PathBuf>,

    /// Folder for extracted images.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Destination table name.
    #[arg(long)]
    table: Option<String>,

    /// Insert all rows over one connection instead of one connection per row.
    #[arg(long)]
    shared_connection: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(pdf) = self.pdf {
            config.pdf_path = pdf;
        }
        if let Some(text_out) = self.text_out {
            config.text_output_path = text_out;
        }
        if let Some(images_dir) = self.images_dir {
            config.images_output_folder = images_dir;
        }
        if let Some(database) = self.database {
            config.database.path = database;
        }
        if let Some(table) = self.table {
            config.database.table = table;
        }
        if self.shared_connection {
            config.database.connection = ConnectionMode::Shared;
        }

        config.database.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdf2table=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&config) {
        Ok(report) => {
            print_summary(&config, &report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &Config, report: &RunReport) {
    println!("{}", "─".repeat(60));
    println!("📄 PDF            : {}", config.pdf_path.display());
    println!(
        "📑 Pages          : {} ({} with images)",
        report.pages, report.pages_with_images
    );
    println!("📁 Images folder  : {}", config.images_output_folder.display());
    println!("📝 Text report    : {}", config.text_output_path.display());
    println!(
        "🗄️  Rows stored    : {} of {} in {}",
        report.persisted.inserted,
        report.pages,
        config.database.path.display()
    );

    if let Some(ref schema_error) = report.schema_error {
        println!("⚠️  Table setup failed: {schema_error}");
    }
    for failure in &report.persisted.failures {
        println!("⚠️  Page {} not stored: {}", failure.page_number, failure.reason);
    }
}

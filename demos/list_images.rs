//! Lists the embedded images on every page without writing anything.
//!
//! Usage:
//!   cargo run --example list_images -- report.pdf
//!   cargo run --example list_images -- report.pdf ./images   (also save them)

use pdf2table::ImageExtractor;
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_dir]", args[0]);
        process::exit(1);
    }

    let pdf_path = &args[1];
    let output_dir = args.get(2).map(String::as_str);

    let extractor = ImageExtractor::from_path(pdf_path).unwrap_or_else(|e| {
        eprintln!("Error loading PDF: {e}");
        process::exit(1);
    });

    println!("Analysing: {pdf_path} ({} pages)", extractor.page_count());

    let mut total = 0;
    for page_index in 0..extractor.page_count() {
        let images = extractor.page_images(page_index).unwrap_or_else(|e| {
            eprintln!("Extraction error: {e}");
            process::exit(1);
        });

        if images.is_empty() {
            println!("\n  Page {}: no images", page_index + 1);
            continue;
        }

        println!("\n  Page {}: {} image(s)", page_index + 1, images.len());
        for image in &images {
            println!(
                "    {} : {} bytes (object {} {})",
                image.file_name(),
                image.data.len(),
                image.object_id.0,
                image.object_id.1
            );
            if let Some(dir) = output_dir {
                match image.save_to_disk(dir) {
                    Ok(dest) => println!("    ✓ Saved to {}", dest.display()),
                    Err(e) => eprintln!("    ✗ Save failed: {e}"),
                }
            }
        }
        total += images.len();
    }

    println!("\n✓ {total} image(s) in total");
}

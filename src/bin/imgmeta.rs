// imgmeta - image metadata inspector
// Prints the normalized metadata report for one or more image files

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use imgmeta::probe::{inspect_file, InspectOptions};
use imgmeta::ImageReport;

#[derive(Parser)]
#[command(name = "imgmeta", version, about = "Image metadata inspector")]
struct Args {
    /// Image files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print reports as a JSON array
    #[arg(long)]
    json: bool,

    /// Skip EXIF parsing
    #[arg(long)]
    no_exif: bool,

    /// Bit depth label when nothing is known
    #[arg(long, default_value = imgmeta::UNKNOWN)]
    unknown_label: String,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let options = InspectOptions {
        read_exif: !args.no_exif,
        unknown_label: args.unknown_label.clone(),
    };

    let mut reports = Vec::new();
    let mut failures = 0usize;

    for path in &args.files {
        match inspect_file(path, &options) {
            Ok(report) => {
                info!("Inspected {}", path.display());
                reports.push((path.clone(), report));
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if args.json {
        let values: Vec<&ImageReport> = reports.iter().map(|(_, r)| r).collect();
        let json = serde_json::to_string_pretty(&values)
            .context("Failed to serialize reports")?;
        println!("{}", json);
    } else {
        for (index, (path, report)) in reports.iter().enumerate() {
            if index > 0 {
                println!();
            }
            print_report(path, report);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files could not be inspected", failures, args.files.len());
    }
    Ok(())
}

/// One `Label: value` line per known field
fn print_report(path: &std::path::Path, report: &ImageReport) {
    println!("{}", path.display());

    match report.dimensions {
        Some(d) => {
            let ratio = d.aspect_ratio().unwrap_or_default();
            println!("  Dimensions: {} x {} ({:.1} MP, {})", d.width, d.height, d.megapixels(), ratio);
        }
        None => println!("  Dimensions: unavailable"),
    }
    if let Some(format) = &report.format {
        println!("  Format: {}", format.to_uppercase());
    }
    if let Some(mime) = &report.mime_type {
        println!("  MIME Type: {}", mime);
    }
    println!("  File Size: {}", report.file_size);
    if let Some(modified) = &report.modified {
        println!("  Modified: {}", modified);
    }
    println!("  Transparency: {}", report.color.supports_transparency);
    if let Some(depth) = &report.color.color_depth {
        println!("  Color Depth: {}", depth);
    }
    println!("  Bit Depth: {}", report.bit_depth);

    match &report.exif {
        Some(exif) => {
            for (key, value) in exif.iter() {
                println!("  {}: {}", key.label(), value);
            }
        }
        None => println!("  EXIF: none"),
    }
}

//! File probing
//!
//! Reads an image file from disk and gathers everything [`build_report`]
//! needs. Only failing to stat the file is an error; a failed dimension probe
//! or EXIF parse degrades to an absent field.
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgmeta::probe::{inspect_file, InspectOptions};
//! use std::path::Path;
//!
//! let report = inspect_file(Path::new("photo.jpg"), &InspectOptions::default())?;
//! println!("{} ({})", report.file_size, report.bit_depth);
//! # Ok::<(), imgmeta::MetaError>(())
//! ```

use image::ImageDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

use crate::bit_depth::{bit_depth, UNKNOWN};
use crate::error::{MetaError, Result};
use crate::exif_source::read_raw_tags;
use crate::report::{build_report, ImageDimensions, ImageReport, ReportSource};
use crate::tags::RawTags;

/// Options for [`inspect_file`]
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Parse the EXIF block
    pub read_exif: bool,
    /// Bit depth shown when nothing is known
    pub unknown_label: String,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            read_exif: true,
            unknown_label: UNKNOWN.to_string(),
        }
    }
}

/// What the image decoder reports without decoding pixels
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderProbe {
    pub format: Option<String>,
    pub dimensions: Option<ImageDimensions>,
    pub bit_depth: Option<String>,
}

/// Inspect an image file
pub fn inspect_file(path: &Path, options: &InspectOptions) -> Result<ImageReport> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(MetaError::InvalidInput(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let modified = metadata
        .modified()
        .ok()
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339());

    let probe = probe_decoder(path);
    let format = probe.format.clone().or_else(|| format_from_extension(path));

    let tags = if options.read_exif {
        read_exif_tags(path)
    } else {
        None
    };

    let mut report = build_report(ReportSource {
        dimensions: probe.dimensions,
        format,
        mime_type: Some(detect_mime(path)),
        file_size: metadata.len(),
        modified,
        decoder_bit_depth: probe.bit_depth,
        tags,
    });

    if report.bit_depth == UNKNOWN {
        report.bit_depth = options.unknown_label.clone();
    }

    debug!(
        "Inspected {}: {:?} {:?}",
        path.display(),
        report.format,
        report.dimensions
    );
    Ok(report)
}

/// Probe format, dimensions and color type through the `image` crate
pub fn probe_decoder(path: &Path) -> DecoderProbe {
    let mut probe = DecoderProbe {
        format: None,
        dimensions: None,
        bit_depth: None,
    };

    let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("Cannot open {} for probing: {}", path.display(), e);
            return probe;
        }
    };

    probe.format = reader.format().map(|f| format!("{:?}", f).to_lowercase());

    match reader.into_decoder() {
        Ok(decoder) => {
            let (width, height) = decoder.dimensions();
            probe.dimensions = Some(ImageDimensions::new(width, height));
            probe.bit_depth = Some(describe_color_type(decoder.color_type()));
        }
        Err(e) => {
            warn!("Dimension probe failed for {}: {}", path.display(), e);
        }
    }

    probe
}

/// Bit depth summary for a decoder color type, e.g. Rgba8 ->
/// "32 bit (8 bit per channel, 4 channels)"
pub fn describe_color_type(color: image::ColorType) -> String {
    let channels = u16::from(color.channel_count().max(1));
    let per_channel = color.bits_per_pixel() / channels;
    let bits = vec![per_channel.to_string(); channels as usize].join(" ");

    bit_depth(Some(&bits), Some(&channels.to_string()), None)
}

fn read_exif_tags(path: &Path) -> Option<RawTags> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot open {} for EXIF: {}", path.display(), e);
            return None;
        }
    };
    read_raw_tags(&mut BufReader::new(file))
}

/// Format name from the file extension, for files the decoder cannot read
pub fn format_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let format = match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "jpeg",
        "tif" | "tiff" => "tiff",
        "svg" | "svgz" => "svg",
        other => other,
    };
    Some(format.to_string())
}

/// MIME type from magic bytes, falling back to the extension
pub fn detect_mime(path: &Path) -> String {
    match infer::get_from_path(path) {
        Ok(Some(kind)) => return kind.mime_type().to_string(),
        Ok(None) => {}
        Err(e) => debug!("Magic byte sniffing failed for {}: {}", path.display(), e),
    }

    detect_mime_from_extension(path)
}

/// Detect MIME type from file extension
pub fn detect_mime_from_extension(path: &Path) -> String {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "svg" | "svgz" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" | "heif" => "image/heic",
        _ => "application/octet-stream",
    }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(detect_mime_from_extension(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(detect_mime_from_extension(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(detect_mime_from_extension(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format_from_extension(Path::new("a.JPG")), Some("jpeg".to_string()));
        assert_eq!(format_from_extension(Path::new("logo.svg")), Some("svg".to_string()));
        assert_eq!(format_from_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_describe_color_type() {
        assert_eq!(
            describe_color_type(image::ColorType::Rgba8),
            "32 bit (8 bit per channel, 4 channels)"
        );
        assert_eq!(
            describe_color_type(image::ColorType::Rgb16),
            "48 bit (16 bit per channel, 3 channels)"
        );
        assert_eq!(describe_color_type(image::ColorType::L8), "8 bit");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = inspect_file(Path::new("/nonexistent/photo.jpg"), &InspectOptions::default());
        assert!(matches!(result, Err(MetaError::Io(_))));
    }
}

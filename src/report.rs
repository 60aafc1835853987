//! Image report assembly
//!
//! Combines probed dimensions, file facts and the raw tag dictionary into a
//! single serializable record. Pure: all inputs are supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::bit_depth::bit_depth;
use crate::color::{color_info, ColorInfo};
use crate::file_size::format_file_size;
use crate::normalize::{normalize, NormalizedMetadata};
use crate::tags::{ExifTag, RawTags};

// ============================================================================
// Report Types
// ============================================================================

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn megapixels(&self) -> f64 {
        (self.width as f64 * self.height as f64) / 1_000_000.0
    }

    /// Reduced ratio such as "16:9"; `None` for a zero-sized image
    pub fn aspect_ratio(&self) -> Option<String> {
        let g = gcd(self.width, self.height);
        if g == 0 {
            return None;
        }
        Some(format!("{}:{}", self.width / g, self.height / g))
    }
}

/// Everything the report is built from
#[derive(Debug, Clone, Default)]
pub struct ReportSource {
    /// `None` when dimension probing failed
    pub dimensions: Option<ImageDimensions>,
    /// Format name such as "png" or "jpeg"
    pub format: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: u64,
    /// RFC 3339 modification time
    pub modified: Option<String>,
    /// Decoder-reported bit depth, used when EXIF has none
    pub decoder_bit_depth: Option<String>,
    /// `None` when the file has no EXIF block or it failed to parse
    pub tags: Option<RawTags>,
}

/// Presentation-ready summary of one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub dimensions: Option<ImageDimensions>,
    pub format: Option<String>,
    pub mime_type: Option<String>,
    pub file_size_bytes: u64,
    pub file_size: String,
    pub modified: Option<String>,
    pub color: ColorInfo,
    pub bit_depth: String,
    pub exif: Option<NormalizedMetadata>,
}

impl ImageReport {
    pub fn megapixels(&self) -> Option<f64> {
        self.dimensions.map(|d| d.megapixels())
    }

    pub fn aspect_ratio(&self) -> Option<String> {
        self.dimensions.and_then(|d| d.aspect_ratio())
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Build a report; never fails, missing inputs become absent fields
pub fn build_report(source: ReportSource) -> ImageReport {
    let color = color_info(source.format.as_deref());

    let (bits, samples) = match &source.tags {
        Some(tags) => (
            tags.first_resolved(&[ExifTag::BitsPerSample]),
            tags.first_resolved(&[ExifTag::SamplesPerPixel]),
        ),
        None => (None, None),
    };
    // A bare channel count says less than the decoder's summary
    let bit_depth = match (&bits, &source.decoder_bit_depth) {
        (None, Some(decoded)) => decoded.clone(),
        _ => bit_depth(
            bits.as_deref(),
            samples.as_deref(),
            source.decoder_bit_depth.as_deref(),
        ),
    };

    let exif = source.tags.as_ref().and_then(normalize);

    ImageReport {
        dimensions: source.dimensions,
        format: source.format,
        mime_type: source.mime_type,
        file_size_bytes: source.file_size,
        file_size: format_file_size(source.file_size),
        modified: source.modified,
        color,
        bit_depth,
        exif,
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_depth::UNKNOWN;
    use crate::normalize::MetadataKey;
    use crate::tags::RawTag;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(ImageDimensions::new(1920, 1080).aspect_ratio(), Some("16:9".to_string()));
        assert_eq!(ImageDimensions::new(6000, 4000).aspect_ratio(), Some("3:2".to_string()));
        assert_eq!(ImageDimensions::new(0, 0).aspect_ratio(), None);
    }

    #[test]
    fn test_megapixels() {
        assert_eq!(ImageDimensions::new(4000, 3000).megapixels(), 12.0);
    }

    #[test]
    fn test_report_without_exif() {
        let report = build_report(ReportSource {
            dimensions: Some(ImageDimensions::new(640, 480)),
            format: Some("png".to_string()),
            file_size: 2048,
            decoder_bit_depth: Some("32 bit (8 bit per channel, 4 channels)".to_string()),
            ..Default::default()
        });

        assert_eq!(report.file_size, "2 KB");
        assert_eq!(report.color.supports_transparency.as_str(), "Yes");
        assert_eq!(report.bit_depth, "32 bit (8 bit per channel, 4 channels)");
        assert_eq!(report.exif, None);
        assert_eq!(report.aspect_ratio(), Some("4:3".to_string()));
    }

    #[test]
    fn test_exif_bit_depth_wins_over_decoder() {
        let tags = RawTags::new()
            .with(ExifTag::BitsPerSample, RawTag::described("16 16 16"))
            .with(ExifTag::Make, RawTag::described("Sony"));

        let report = build_report(ReportSource {
            format: Some("tiff".to_string()),
            decoder_bit_depth: Some("24 bit".to_string()),
            tags: Some(tags),
            ..Default::default()
        });

        assert_eq!(report.bit_depth, "48 bit (16 bit per channel, 3 channels)");
        assert_eq!(report.exif.unwrap().get(MetadataKey::CameraMake), Some("Sony"));
    }

    #[test]
    fn test_decoder_wins_over_channel_count() {
        let tags = RawTags::new().with(ExifTag::SamplesPerPixel, RawTag::valued(3u32));

        let report = build_report(ReportSource {
            format: Some("jpeg".to_string()),
            decoder_bit_depth: Some("24 bit (8 bit per channel, 3 channels)".to_string()),
            tags: Some(tags.clone()),
            ..Default::default()
        });
        assert_eq!(report.bit_depth, "24 bit (8 bit per channel, 3 channels)");
        assert_eq!(report.exif.unwrap().get(MetadataKey::BitDepth), Some("3 channels"));

        let report = build_report(ReportSource {
            tags: Some(tags),
            ..Default::default()
        });
        assert_eq!(report.bit_depth, "3 channels");
    }

    #[test]
    fn test_unavailable_inputs() {
        let report = build_report(ReportSource::default());

        assert_eq!(report.dimensions, None);
        assert_eq!(report.file_size, "0 Bytes");
        assert_eq!(report.bit_depth, UNKNOWN);
        assert_eq!(report.color.color_depth, None);
        assert_eq!(report.megapixels(), None);
    }

    #[test]
    fn test_empty_exif_treated_as_absent() {
        let report = build_report(ReportSource {
            tags: Some(RawTags::new()),
            ..Default::default()
        });
        assert_eq!(report.exif, None);
    }
}

//! EXIF tag normalization
//!
//! Maps a raw tag dictionary onto a flat, presentation-ready record. Simple
//! fields are driven by [`FIELD_RULES`]: each row names the output key, the
//! source tags in priority order and a value normalizer. Compound fields
//! (GPS pair, resolution, bit depth) are resolved after the table.
//!
//! ## Example
//!
//! ```rust
//! use imgmeta::{normalize, ExifTag, MetadataKey, RawTag, RawTags};
//!
//! let tags = RawTags::new()
//!     .with(ExifTag::Make, RawTag::described("Canon"))
//!     .with(ExifTag::FNumber, RawTag::valued(2.8));
//!
//! let meta = normalize(&tags).unwrap();
//! assert_eq!(meta.get(MetadataKey::CameraMake), Some("Canon"));
//! assert_eq!(meta.get(MetadataKey::Aperture), Some("f/2.8"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

use crate::bit_depth::{bit_depth, UNKNOWN};
use crate::resolution::resolve_dpi;
use crate::tags::{ExifTag, RawTags};

// ============================================================================
// Output Keys
// ============================================================================

/// Semantic keys of the normalized record, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataKey {
    CameraMake,
    CameraModel,
    LensModel,
    DateTaken,
    ExposureTime,
    Aperture,
    Iso,
    FocalLength,
    Flash,
    WhiteBalance,
    ExposureMode,
    MeteringMode,
    ExposureBias,
    Orientation,
    ColorSpace,
    Software,
    Artist,
    Copyright,
    Description,
    GpsLatitude,
    GpsLongitude,
    GpsAltitude,
    Dpi,
    BitDepth,
}

impl MetadataKey {
    /// camelCase identifier used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKey::CameraMake => "cameraMake",
            MetadataKey::CameraModel => "cameraModel",
            MetadataKey::LensModel => "lensModel",
            MetadataKey::DateTaken => "dateTaken",
            MetadataKey::ExposureTime => "exposureTime",
            MetadataKey::Aperture => "aperture",
            MetadataKey::Iso => "iso",
            MetadataKey::FocalLength => "focalLength",
            MetadataKey::Flash => "flash",
            MetadataKey::WhiteBalance => "whiteBalance",
            MetadataKey::ExposureMode => "exposureMode",
            MetadataKey::MeteringMode => "meteringMode",
            MetadataKey::ExposureBias => "exposureBias",
            MetadataKey::Orientation => "orientation",
            MetadataKey::ColorSpace => "colorSpace",
            MetadataKey::Software => "software",
            MetadataKey::Artist => "artist",
            MetadataKey::Copyright => "copyright",
            MetadataKey::Description => "description",
            MetadataKey::GpsLatitude => "gpsLatitude",
            MetadataKey::GpsLongitude => "gpsLongitude",
            MetadataKey::GpsAltitude => "gpsAltitude",
            MetadataKey::Dpi => "dpi",
            MetadataKey::BitDepth => "bitDepth",
        }
    }

    /// English display label
    pub fn label(&self) -> &'static str {
        match self {
            MetadataKey::CameraMake => "Camera Make",
            MetadataKey::CameraModel => "Camera Model",
            MetadataKey::LensModel => "Lens",
            MetadataKey::DateTaken => "Date Taken",
            MetadataKey::ExposureTime => "Exposure Time",
            MetadataKey::Aperture => "Aperture",
            MetadataKey::Iso => "ISO",
            MetadataKey::FocalLength => "Focal Length",
            MetadataKey::Flash => "Flash",
            MetadataKey::WhiteBalance => "White Balance",
            MetadataKey::ExposureMode => "Exposure Mode",
            MetadataKey::MeteringMode => "Metering Mode",
            MetadataKey::ExposureBias => "Exposure Bias",
            MetadataKey::Orientation => "Orientation",
            MetadataKey::ColorSpace => "Color Space",
            MetadataKey::Software => "Software",
            MetadataKey::Artist => "Artist",
            MetadataKey::Copyright => "Copyright",
            MetadataKey::Description => "Description",
            MetadataKey::GpsLatitude => "GPS Latitude",
            MetadataKey::GpsLongitude => "GPS Longitude",
            MetadataKey::GpsAltitude => "GPS Altitude",
            MetadataKey::Dpi => "Resolution",
            MetadataKey::BitDepth => "Bit Depth",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Normalized Record
// ============================================================================

/// Flat record of resolved, non-empty metadata values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedMetadata {
    fields: BTreeMap<MetadataKey, String>,
}

impl NormalizedMetadata {
    pub fn get(&self, key: MetadataKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: MetadataKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Empty values are dropped so the record only holds real data
    fn set(&mut self, key: MetadataKey, value: String) {
        let value = value.trim();
        if value.is_empty() {
            trace!(key = key.as_str(), "dropping empty normalized value");
            return;
        }
        self.fields.insert(key, value.to_string());
    }
}

// ============================================================================
// Field Table
// ============================================================================

/// One row of the normalization table
pub struct FieldRule {
    pub key: MetadataKey,
    /// Source tags, first non-empty wins
    pub sources: &'static [ExifTag],
    pub normalize: fn(String) -> String,
}

fn keep(value: String) -> String {
    value
}

/// "2.8" -> "f/2.8"
pub fn normalize_aperture(value: String) -> String {
    if value.starts_with("f/") || value.starts_with("F/") {
        value
    } else {
        format!("f/{}", value)
    }
}

/// "50" -> "50mm"
pub fn normalize_focal_length(value: String) -> String {
    if value.ends_with("mm") {
        value
    } else {
        format!("{}mm", value)
    }
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule { key: MetadataKey::CameraMake, sources: &[ExifTag::Make], normalize: keep },
    FieldRule { key: MetadataKey::CameraModel, sources: &[ExifTag::Model], normalize: keep },
    FieldRule { key: MetadataKey::LensModel, sources: &[ExifTag::LensModel], normalize: keep },
    FieldRule {
        key: MetadataKey::DateTaken,
        sources: &[ExifTag::DateTimeOriginal, ExifTag::DateTime],
        normalize: keep,
    },
    FieldRule { key: MetadataKey::ExposureTime, sources: &[ExifTag::ExposureTime], normalize: keep },
    FieldRule {
        key: MetadataKey::Aperture,
        sources: &[ExifTag::FNumber, ExifTag::ApertureValue],
        normalize: normalize_aperture,
    },
    FieldRule {
        key: MetadataKey::Iso,
        sources: &[ExifTag::Iso, ExifTag::IsoSpeedRatings],
        normalize: keep,
    },
    FieldRule {
        key: MetadataKey::FocalLength,
        sources: &[ExifTag::FocalLength],
        normalize: normalize_focal_length,
    },
    FieldRule { key: MetadataKey::Flash, sources: &[ExifTag::Flash], normalize: keep },
    FieldRule { key: MetadataKey::WhiteBalance, sources: &[ExifTag::WhiteBalance], normalize: keep },
    FieldRule { key: MetadataKey::ExposureMode, sources: &[ExifTag::ExposureMode], normalize: keep },
    FieldRule { key: MetadataKey::MeteringMode, sources: &[ExifTag::MeteringMode], normalize: keep },
    FieldRule { key: MetadataKey::ExposureBias, sources: &[ExifTag::ExposureBiasValue], normalize: keep },
    FieldRule { key: MetadataKey::Orientation, sources: &[ExifTag::Orientation], normalize: keep },
    FieldRule { key: MetadataKey::ColorSpace, sources: &[ExifTag::ColorSpace], normalize: keep },
    FieldRule { key: MetadataKey::Software, sources: &[ExifTag::Software], normalize: keep },
    FieldRule { key: MetadataKey::Artist, sources: &[ExifTag::Artist], normalize: keep },
    FieldRule { key: MetadataKey::Copyright, sources: &[ExifTag::Copyright], normalize: keep },
    FieldRule { key: MetadataKey::Description, sources: &[ExifTag::ImageDescription], normalize: keep },
    FieldRule { key: MetadataKey::GpsAltitude, sources: &[ExifTag::GpsAltitude], normalize: keep },
];

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a raw tag dictionary
///
/// Returns `None` when no field resolves, so "no EXIF" and "EXIF with nothing
/// useful" look the same to callers. Never fails; unresolvable fields are
/// omitted.
pub fn normalize(tags: &RawTags) -> Option<NormalizedMetadata> {
    let mut meta = NormalizedMetadata::default();

    for rule in FIELD_RULES {
        match tags.first_resolved(rule.sources) {
            Some(value) => meta.set(rule.key, (rule.normalize)(value)),
            None => trace!(key = rule.key.as_str(), "no source tag resolved"),
        }
    }

    // GPS coordinates only make sense as a pair
    match (
        tags.first_resolved(&[ExifTag::GpsLatitude]),
        tags.first_resolved(&[ExifTag::GpsLongitude]),
    ) {
        (Some(lat), Some(lon)) => {
            meta.set(MetadataKey::GpsLatitude, lat);
            meta.set(MetadataKey::GpsLongitude, lon);
        }
        (None, None) => {}
        _ => trace!("incomplete GPS pair, omitting coordinates"),
    }

    let x = tags.first_resolved(&[ExifTag::XResolution]);
    let y = tags.first_resolved(&[ExifTag::YResolution]);
    if let Some(dpi) = resolve_dpi(x.as_deref(), y.as_deref(), tags.get(ExifTag::ResolutionUnit)) {
        meta.set(MetadataKey::Dpi, dpi);
    }

    let bits = tags.first_resolved(&[ExifTag::BitsPerSample]);
    let samples = tags.first_resolved(&[ExifTag::SamplesPerPixel]);
    if bits.is_some() || samples.is_some() {
        let depth = bit_depth(bits.as_deref(), samples.as_deref(), None);
        if depth != UNKNOWN {
            meta.set(MetadataKey::BitDepth, depth);
        }
    }

    if meta.is_empty() {
        None
    } else {
        Some(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::RawTag;

    #[test]
    fn test_empty_dictionary_is_absent() {
        assert_eq!(normalize(&RawTags::new()), None);
    }

    #[test]
    fn test_useless_dictionary_is_absent() {
        let tags = RawTags::new()
            .with(ExifTag::Make, RawTag::described("   "))
            .with(ExifTag::Model, RawTag::default())
            .with(ExifTag::BitsPerSample, RawTag::described("n/a"))
            .with(ExifTag::XResolution, RawTag::valued(72u32));
        assert_eq!(normalize(&tags), None);
    }

    #[test]
    fn test_lone_latitude_is_dropped() {
        let tags = RawTags::new()
            .with(ExifTag::GpsLatitude, RawTag::described("37.774900"))
            .with(ExifTag::Make, RawTag::described("Apple"));

        let meta = normalize(&tags).unwrap();
        assert!(!meta.contains(MetadataKey::GpsLatitude));
        assert!(!meta.contains(MetadataKey::GpsLongitude));
        assert_eq!(meta.len(), 1);

        let only_lat = RawTags::new().with(ExifTag::GpsLatitude, RawTag::described("37.7749"));
        assert_eq!(normalize(&only_lat), None);
    }

    #[test]
    fn test_gps_pair() {
        let tags = RawTags::new()
            .with(ExifTag::GpsLatitude, RawTag::described("37.774900"))
            .with(ExifTag::GpsLongitude, RawTag::valued(-122.4194));

        let meta = normalize(&tags).unwrap();
        assert_eq!(meta.get(MetadataKey::GpsLatitude), Some("37.774900"));
        assert_eq!(meta.get(MetadataKey::GpsLongitude), Some("-122.4194"));
    }

    #[test]
    fn test_aperture_prefix_is_idempotent() {
        let raw = RawTags::new().with(ExifTag::FNumber, RawTag::valued("2.8"));
        assert_eq!(normalize(&raw).unwrap().get(MetadataKey::Aperture), Some("f/2.8"));

        let prefixed = RawTags::new().with(ExifTag::FNumber, RawTag::described("f/2.8"));
        assert_eq!(normalize(&prefixed).unwrap().get(MetadataKey::Aperture), Some("f/2.8"));

        let fallback = RawTags::new().with(ExifTag::ApertureValue, RawTag::valued(4.0));
        assert_eq!(normalize(&fallback).unwrap().get(MetadataKey::Aperture), Some("f/4"));
    }

    #[test]
    fn test_focal_length_suffix() {
        let raw = RawTags::new().with(ExifTag::FocalLength, RawTag::valued(50u32));
        assert_eq!(normalize(&raw).unwrap().get(MetadataKey::FocalLength), Some("50mm"));

        let suffixed = RawTags::new().with(ExifTag::FocalLength, RawTag::described("35mm"));
        assert_eq!(normalize(&suffixed).unwrap().get(MetadataKey::FocalLength), Some("35mm"));
    }

    #[test]
    fn test_iso_source_priority() {
        let both = RawTags::new()
            .with(ExifTag::Iso, RawTag::valued(200u32))
            .with(ExifTag::IsoSpeedRatings, RawTag::valued(400u32));
        assert_eq!(normalize(&both).unwrap().get(MetadataKey::Iso), Some("200"));

        let legacy = RawTags::new().with(ExifTag::IsoSpeedRatings, RawTag::valued(400u32));
        assert_eq!(normalize(&legacy).unwrap().get(MetadataKey::Iso), Some("400"));
    }

    #[test]
    fn test_date_taken_priority() {
        let tags = RawTags::new()
            .with(ExifTag::DateTime, RawTag::described("2024:01:02 10:00:00"))
            .with(ExifTag::DateTimeOriginal, RawTag::described("2023:12:31 23:59:59"));
        assert_eq!(
            normalize(&tags).unwrap().get(MetadataKey::DateTaken),
            Some("2023:12:31 23:59:59")
        );

        let modified_only = RawTags::new().with(ExifTag::DateTime, RawTag::described("2024:01:02 10:00:00"));
        assert_eq!(
            normalize(&modified_only).unwrap().get(MetadataKey::DateTaken),
            Some("2024:01:02 10:00:00")
        );
    }

    #[test]
    fn test_dpi_field() {
        let tags = RawTags::new()
            .with(ExifTag::XResolution, RawTag::valued(72u32))
            .with(ExifTag::YResolution, RawTag::valued(72u32));
        assert_eq!(normalize(&tags).unwrap().get(MetadataKey::Dpi), Some("72 DPI"));

        let cm = RawTags::new()
            .with(ExifTag::XResolution, RawTag::described("300"))
            .with(ExifTag::YResolution, RawTag::described("300"))
            .with(ExifTag::ResolutionUnit, RawTag::described("cm").with_value(3u32));
        assert_eq!(normalize(&cm).unwrap().get(MetadataKey::Dpi), Some("300 pixels/cm"));
    }

    #[test]
    fn test_bit_depth_field() {
        let tags = RawTags::new()
            .with(ExifTag::BitsPerSample, RawTag::valued(vec![8.0, 8.0, 8.0]))
            .with(ExifTag::SamplesPerPixel, RawTag::valued(3u32));
        assert_eq!(
            normalize(&tags).unwrap().get(MetadataKey::BitDepth),
            Some("24 bit (8 bit per channel, 3 channels)")
        );

        let samples = RawTags::new().with(ExifTag::SamplesPerPixel, RawTag::valued(1u32));
        assert_eq!(normalize(&samples).unwrap().get(MetadataKey::BitDepth), Some("1 channel"));
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let tags = RawTags::new()
            .with(ExifTag::Make, RawTag::described("Nikon"))
            .with(ExifTag::FocalLength, RawTag::valued(85u32));
        let json = serde_json::to_value(normalize(&tags).unwrap()).unwrap();

        assert_eq!(json["cameraMake"], "Nikon");
        assert_eq!(json["focalLength"], "85mm");
    }

    #[test]
    fn test_iteration_follows_display_order() {
        let tags = RawTags::new()
            .with(ExifTag::Copyright, RawTag::described("(c) me"))
            .with(ExifTag::Make, RawTag::described("Fujifilm"));
        let keys: Vec<MetadataKey> = normalize(&tags).unwrap().iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec![MetadataKey::CameraMake, MetadataKey::Copyright]);
    }
}

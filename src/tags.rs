//! Raw EXIF tag model
//!
//! The tag dictionary handed over by an EXIF parser is keyed by a closed set
//! of known tag identifiers. Each entry may carry a human-readable
//! description, a raw value, or both.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Tag Identifiers
// ============================================================================

/// EXIF tags read by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExifTag {
    Make,
    Model,
    LensModel,
    DateTimeOriginal,
    DateTime,
    ExposureTime,
    FNumber,
    ApertureValue,
    /// ISOSpeed (0x8833)
    Iso,
    /// PhotographicSensitivity (0x8827), historically ISOSpeedRatings
    IsoSpeedRatings,
    FocalLength,
    Flash,
    WhiteBalance,
    ExposureMode,
    MeteringMode,
    ExposureBiasValue,
    Orientation,
    ColorSpace,
    Software,
    Artist,
    Copyright,
    ImageDescription,
    GpsLatitude,
    GpsLongitude,
    GpsAltitude,
    XResolution,
    YResolution,
    ResolutionUnit,
    BitsPerSample,
    SamplesPerPixel,
}

impl ExifTag {
    pub const ALL: [ExifTag; 30] = [
        ExifTag::Make,
        ExifTag::Model,
        ExifTag::LensModel,
        ExifTag::DateTimeOriginal,
        ExifTag::DateTime,
        ExifTag::ExposureTime,
        ExifTag::FNumber,
        ExifTag::ApertureValue,
        ExifTag::Iso,
        ExifTag::IsoSpeedRatings,
        ExifTag::FocalLength,
        ExifTag::Flash,
        ExifTag::WhiteBalance,
        ExifTag::ExposureMode,
        ExifTag::MeteringMode,
        ExifTag::ExposureBiasValue,
        ExifTag::Orientation,
        ExifTag::ColorSpace,
        ExifTag::Software,
        ExifTag::Artist,
        ExifTag::Copyright,
        ExifTag::ImageDescription,
        ExifTag::GpsLatitude,
        ExifTag::GpsLongitude,
        ExifTag::GpsAltitude,
        ExifTag::XResolution,
        ExifTag::YResolution,
        ExifTag::ResolutionUnit,
        ExifTag::BitsPerSample,
        ExifTag::SamplesPerPixel,
    ];

    /// Canonical EXIF tag name as used by common parsers
    pub fn name(&self) -> &'static str {
        match self {
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::LensModel => "LensModel",
            ExifTag::DateTimeOriginal => "DateTimeOriginal",
            ExifTag::DateTime => "DateTime",
            ExifTag::ExposureTime => "ExposureTime",
            ExifTag::FNumber => "FNumber",
            ExifTag::ApertureValue => "ApertureValue",
            ExifTag::Iso => "ISO",
            ExifTag::IsoSpeedRatings => "ISOSpeedRatings",
            ExifTag::FocalLength => "FocalLength",
            ExifTag::Flash => "Flash",
            ExifTag::WhiteBalance => "WhiteBalance",
            ExifTag::ExposureMode => "ExposureMode",
            ExifTag::MeteringMode => "MeteringMode",
            ExifTag::ExposureBiasValue => "ExposureBiasValue",
            ExifTag::Orientation => "Orientation",
            ExifTag::ColorSpace => "ColorSpace",
            ExifTag::Software => "Software",
            ExifTag::Artist => "Artist",
            ExifTag::Copyright => "Copyright",
            ExifTag::ImageDescription => "ImageDescription",
            ExifTag::GpsLatitude => "GPSLatitude",
            ExifTag::GpsLongitude => "GPSLongitude",
            ExifTag::GpsAltitude => "GPSAltitude",
            ExifTag::XResolution => "XResolution",
            ExifTag::YResolution => "YResolution",
            ExifTag::ResolutionUnit => "ResolutionUnit",
            ExifTag::BitsPerSample => "BitsPerSample",
            ExifTag::SamplesPerPixel => "SamplesPerPixel",
        }
    }
}

impl fmt::Display for ExifTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExifTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExifTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| format!("Unknown EXIF tag: {}", s))
    }
}

// ============================================================================
// Tag Values
// ============================================================================

/// Raw value of a tag as decoded by the EXIF parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
}

impl TagValue {
    /// String form used when a tag has no description
    pub fn to_display_string(&self) -> String {
        match self {
            TagValue::Text(s) => s.clone(),
            TagValue::Number(n) => format_number(*n),
            TagValue::Numbers(ns) => ns
                .iter()
                .map(|n| format_number(*n))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Text(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Text(s)
    }
}

impl From<f64> for TagValue {
    fn from(n: f64) -> Self {
        TagValue::Number(n)
    }
}

impl From<u32> for TagValue {
    fn from(n: u32) -> Self {
        TagValue::Number(n as f64)
    }
}

impl From<Vec<f64>> for TagValue {
    fn from(ns: Vec<f64>) -> Self {
        TagValue::Numbers(ns)
    }
}

/// Whole numbers print without a fractional part ("72", not "72.0")
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ============================================================================
// Tags and Dictionary
// ============================================================================

/// One entry of the raw tag dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTag {
    pub description: Option<String>,
    pub value: Option<TagValue>,
}

impl RawTag {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            value: None,
        }
    }

    pub fn valued(value: impl Into<TagValue>) -> Self {
        Self {
            description: None,
            value: Some(value.into()),
        }
    }

    pub fn with_value(mut self, value: impl Into<TagValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Description if non-empty, else the stringified raw value if non-empty
    pub fn resolve(&self) -> Option<String> {
        let description = self.description.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(d) = description {
            return Some(d.to_string());
        }

        self.raw_string()
    }

    /// Stringified raw value, ignoring the description
    pub fn raw_string(&self) -> Option<String> {
        self.value
            .as_ref()
            .map(|v| v.to_display_string().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Raw tag dictionary keyed by known tag identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTags {
    tags: HashMap<ExifTag, RawTag>,
}

impl RawTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: ExifTag, raw: RawTag) {
        self.tags.insert(tag, raw);
    }

    /// Builder-style insert
    pub fn with(mut self, tag: ExifTag, raw: RawTag) -> Self {
        self.insert(tag, raw);
        self
    }

    pub fn get(&self, tag: ExifTag) -> Option<&RawTag> {
        self.tags.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// First tag in `sources` that resolves to a non-empty string
    pub fn first_resolved(&self, sources: &[ExifTag]) -> Option<String> {
        sources
            .iter()
            .find_map(|tag| self.get(*tag).and_then(RawTag::resolve))
    }
}

impl FromIterator<(ExifTag, RawTag)> for RawTags {
    fn from_iter<I: IntoIterator<Item = (ExifTag, RawTag)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in ExifTag::ALL {
            assert_eq!(tag.name().parse::<ExifTag>(), Ok(tag));
        }
        assert!("NotATag".parse::<ExifTag>().is_err());
    }

    #[test]
    fn test_description_preferred_over_value() {
        let tag = RawTag::described("Canon").with_value("CANON");
        assert_eq!(tag.resolve(), Some("Canon".to_string()));
    }

    #[test]
    fn test_empty_description_falls_back_to_value() {
        let tag = RawTag::described("  ").with_value(72u32);
        assert_eq!(tag.resolve(), Some("72".to_string()));

        assert_eq!(RawTag::default().resolve(), None);
        assert_eq!(RawTag::valued("").resolve(), None);
    }

    #[test]
    fn test_value_stringification() {
        assert_eq!(TagValue::Number(2.8).to_display_string(), "2.8");
        assert_eq!(TagValue::Number(300.0).to_display_string(), "300");
        assert_eq!(TagValue::Numbers(vec![8.0, 8.0, 8.0]).to_display_string(), "8 8 8");
    }

    #[test]
    fn test_first_resolved_order() {
        let tags = RawTags::new()
            .with(ExifTag::Iso, RawTag::described(""))
            .with(ExifTag::IsoSpeedRatings, RawTag::valued(400u32));

        assert_eq!(
            tags.first_resolved(&[ExifTag::Iso, ExifTag::IsoSpeedRatings]),
            Some("400".to_string())
        );
        assert_eq!(tags.first_resolved(&[ExifTag::Make]), None);
    }
}

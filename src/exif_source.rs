//! kamadak-exif adapter
//!
//! Turns a parsed [`exif::Exif`] into the typed [`RawTags`] dictionary the
//! normalizer works on. Parse failures are not errors here: they yield
//! `None` and are logged.

use std::io::{BufRead, Seek};
use tracing::debug;

use crate::tags::{ExifTag, RawTag, RawTags, TagValue};

/// kamadak-exif tag for each known tag identifier
pub fn exif_tag(tag: ExifTag) -> exif::Tag {
    match tag {
        ExifTag::Make => exif::Tag::Make,
        ExifTag::Model => exif::Tag::Model,
        ExifTag::LensModel => exif::Tag::LensModel,
        ExifTag::DateTimeOriginal => exif::Tag::DateTimeOriginal,
        ExifTag::DateTime => exif::Tag::DateTime,
        ExifTag::ExposureTime => exif::Tag::ExposureTime,
        ExifTag::FNumber => exif::Tag::FNumber,
        ExifTag::ApertureValue => exif::Tag::ApertureValue,
        ExifTag::Iso => exif::Tag::ISOSpeed,
        ExifTag::IsoSpeedRatings => exif::Tag::PhotographicSensitivity,
        ExifTag::FocalLength => exif::Tag::FocalLength,
        ExifTag::Flash => exif::Tag::Flash,
        ExifTag::WhiteBalance => exif::Tag::WhiteBalance,
        ExifTag::ExposureMode => exif::Tag::ExposureMode,
        ExifTag::MeteringMode => exif::Tag::MeteringMode,
        ExifTag::ExposureBiasValue => exif::Tag::ExposureBiasValue,
        ExifTag::Orientation => exif::Tag::Orientation,
        ExifTag::ColorSpace => exif::Tag::ColorSpace,
        ExifTag::Software => exif::Tag::Software,
        ExifTag::Artist => exif::Tag::Artist,
        ExifTag::Copyright => exif::Tag::Copyright,
        ExifTag::ImageDescription => exif::Tag::ImageDescription,
        ExifTag::GpsLatitude => exif::Tag::GPSLatitude,
        ExifTag::GpsLongitude => exif::Tag::GPSLongitude,
        ExifTag::GpsAltitude => exif::Tag::GPSAltitude,
        ExifTag::XResolution => exif::Tag::XResolution,
        ExifTag::YResolution => exif::Tag::YResolution,
        ExifTag::ResolutionUnit => exif::Tag::ResolutionUnit,
        ExifTag::BitsPerSample => exif::Tag::BitsPerSample,
        ExifTag::SamplesPerPixel => exif::Tag::SamplesPerPixel,
    }
}

/// Parse EXIF from an image container (JPEG, TIFF, HEIF, PNG, WebP)
///
/// Returns `None` when the container has no EXIF block or it cannot be parsed.
pub fn read_raw_tags<R: BufRead + Seek>(reader: &mut R) -> Option<RawTags> {
    match exif::Reader::new().read_from_container(reader) {
        Ok(exif_data) => Some(raw_tags_from_exif(&exif_data)),
        Err(e) => {
            debug!("EXIF unavailable: {}", e);
            None
        }
    }
}

/// Collect the known tags from the primary IFD
pub fn raw_tags_from_exif(exif_data: &exif::Exif) -> RawTags {
    let get_field = |tag: ExifTag| exif_data.get_field(exif_tag(tag), exif::In::PRIMARY);

    let mut tags = RawTags::new();
    for tag in ExifTag::ALL {
        let Some(field) = get_field(tag) else {
            continue;
        };

        let raw = match tag {
            ExifTag::GpsLatitude | ExifTag::GpsLongitude => {
                let reference = match tag {
                    ExifTag::GpsLatitude => get_field_ref(exif_data, exif::Tag::GPSLatitudeRef),
                    _ => get_field_ref(exif_data, exif::Tag::GPSLongitudeRef),
                };
                gps_tag(&field.value, reference.as_deref())
            }
            _ if is_plain_number(tag) => RawTag {
                description: None,
                value: tag_value(&field.value),
            },
            _ => RawTag {
                description: describe(field),
                value: tag_value(&field.value),
            },
        };

        tags.insert(tag, raw);
    }

    debug!("Collected {} EXIF tags", tags.len());
    tags
}

/// Tags whose raw number is already the presentable form
///
/// kamadak's display joins lists with ", " and may reformat rationals, while
/// the bit-depth parser and the DPI/focal length formatters expect the bare
/// space-separated numbers.
fn is_plain_number(tag: ExifTag) -> bool {
    matches!(
        tag,
        ExifTag::BitsPerSample
            | ExifTag::SamplesPerPixel
            | ExifTag::XResolution
            | ExifTag::YResolution
            | ExifTag::FocalLength
            | ExifTag::FNumber
            | ExifTag::Iso
            | ExifTag::IsoSpeedRatings
    )
}

fn get_field_ref(exif_data: &exif::Exif, tag: exif::Tag) -> Option<String> {
    exif_data
        .get_field(tag, exif::In::PRIMARY)
        .and_then(|f| ascii_text(&f.value))
}

/// Human-readable form of a field; ASCII is decoded directly so strings are
/// not quoted
fn describe(field: &exif::Field) -> Option<String> {
    let text = match &field.value {
        exif::Value::Ascii(_) => ascii_text(&field.value)?,
        _ => field.display_value().to_string(),
    };
    let text = text.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

fn ascii_text(value: &exif::Value) -> Option<String> {
    match value {
        exif::Value::Ascii(strings) => {
            let parts: Vec<String> = strings
                .iter()
                .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() { None } else { Some(parts.join(", ")) }
        }
        _ => None,
    }
}

/// Raw value of a field, if it has a numeric or text representation
fn tag_value(value: &exif::Value) -> Option<TagValue> {
    let numbers: Vec<f64> = match value {
        exif::Value::Ascii(_) => return ascii_text(value).map(TagValue::Text),
        exif::Value::Byte(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::Short(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::Long(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::SByte(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::SShort(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::SLong(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
        exif::Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
        exif::Value::Float(v) => v.iter().map(|&n| n as f64).collect(),
        exif::Value::Double(v) => v.clone(),
        _ => return None,
    };

    match numbers.as_slice() {
        [] => None,
        [single] => Some(TagValue::Number(*single)),
        _ => Some(TagValue::Numbers(numbers)),
    }
}

/// GPS coordinate as signed decimal degrees
///
/// The raw value keeps the degree/minute/second triple.
fn gps_tag(value: &exif::Value, reference: Option<&str>) -> RawTag {
    let dms = match value {
        exif::Value::Rational(v) if v.len() >= 3 => Some([v[0].to_f64(), v[1].to_f64(), v[2].to_f64()]),
        _ => None,
    };

    match dms {
        Some(dms) => {
            let description = dms_to_decimal(dms, reference)
                .map(|degrees| format!("{:.6}", degrees));
            RawTag {
                description,
                value: Some(TagValue::Numbers(dms.to_vec())),
            }
        }
        None => RawTag {
            description: None,
            value: tag_value(value),
        },
    }
}

/// Degrees/minutes/seconds to decimal degrees, negative for S and W
pub fn dms_to_decimal(dms: [f64; 3], reference: Option<&str>) -> Option<f64> {
    let degrees = dms[0] + dms[1] / 60.0 + dms[2] / 3600.0;
    if !degrees.is_finite() {
        return None;
    }

    let negative = reference
        .map(|r| r.trim().to_ascii_uppercase())
        .is_some_and(|r| r.starts_with('S') || r.starts_with('W'));

    Some(if negative { -degrees } else { degrees })
}

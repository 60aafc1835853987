//! imgmeta - image metadata normalization for viewer panels
//!
//! Turns raw image facts (dimensions, format, byte size) and a raw EXIF tag
//! dictionary into presentation-ready strings. The core is pure and never
//! fails; [`probe`] reads files from disk via `image` and `kamadak-exif`.

mod bit_depth;
mod color;
mod error;
mod file_size;
mod normalize;
mod resolution;
mod tags;

pub mod exif_source;
pub mod probe;
pub mod report;

pub use bit_depth::{bit_depth, UNKNOWN};
pub use color::{color_info, ColorInfo, Transparency};
pub use error::{MetaError, Result};
pub use file_size::format_file_size;
pub use normalize::{
    normalize, normalize_aperture, normalize_focal_length, FieldRule, MetadataKey,
    NormalizedMetadata, FIELD_RULES,
};
pub use report::{build_report, ImageDimensions, ImageReport, ReportSource};
pub use resolution::{resolve_dpi, ResolutionUnit};
pub use tags::{ExifTag, RawTag, RawTags, TagValue};

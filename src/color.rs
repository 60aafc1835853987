//! Color info inferred from the image format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a format can carry an alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transparency {
    Yes,
    No,
}

impl Transparency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transparency::Yes => "Yes",
            Transparency::No => "No",
        }
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format-level color capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub supports_transparency: Transparency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_depth: Option<String>,
}

/// Infer color info from a format name such as "PNG" or "jpeg"
pub fn color_info(format: Option<&str>) -> ColorInfo {
    let format = format.map(|f| f.trim().to_lowercase()).unwrap_or_default();
    
    let supports_transparency = match format.as_str() {
        "png" | "gif" | "webp" | "svg" => Transparency::Yes,
        _ => Transparency::No,
    };
    
    let color_depth = match format.as_str() {
        "png" | "bmp" => Some("Variable (8-32 bit)"),
        "jpg" | "jpeg" => Some("24 bit (8 bit per channel)"),
        "gif" => Some("8 bit (256 colors)"),
        "webp" => Some("24-32 bit"),
        _ => None,
    };
    
    ColorInfo {
        supports_transparency,
        color_depth: color_depth.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_transparency_by_format() {
        assert_eq!(color_info(Some("PNG")).supports_transparency.as_str(), "Yes");
        assert_eq!(color_info(Some("gif")).supports_transparency, Transparency::Yes);
        assert_eq!(color_info(Some("WebP")).supports_transparency, Transparency::Yes);
        assert_eq!(color_info(Some("svg")).supports_transparency, Transparency::Yes);
        assert_eq!(color_info(Some("bmp")).supports_transparency, Transparency::No);
        assert_eq!(color_info(None).supports_transparency, Transparency::No);
    }
    
    #[test]
    fn test_jpeg_color_depth() {
        let info = color_info(Some("JPEG"));
        assert_eq!(info.supports_transparency.as_str(), "No");
        assert_eq!(info.color_depth.as_deref(), Some("24 bit (8 bit per channel)"));
        assert_eq!(color_info(Some("jpg")), info);
    }
    
    #[test]
    fn test_color_depth_table() {
        assert_eq!(color_info(Some("png")).color_depth.as_deref(), Some("Variable (8-32 bit)"));
        assert_eq!(color_info(Some("bmp")).color_depth.as_deref(), Some("Variable (8-32 bit)"));
        assert_eq!(color_info(Some("gif")).color_depth.as_deref(), Some("8 bit (256 colors)"));
        assert_eq!(color_info(Some("webp")).color_depth.as_deref(), Some("24-32 bit"));
        // svg is transparent but has no fixed depth
        assert_eq!(color_info(Some("svg")).color_depth, None);
        assert_eq!(color_info(Some("tiff")).color_depth, None);
    }
}

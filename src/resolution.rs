//! DPI / resolution resolution from XResolution, YResolution, ResolutionUnit

use crate::tags::RawTag;

/// Unit a resolution is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    Inch,
    Centimeter,
}

impl ResolutionUnit {
    /// EXIF ResolutionUnit 3 (or a "cm" description) means centimeters,
    /// anything else including a missing tag is treated as inches
    pub fn from_tag(tag: Option<&RawTag>) -> Self {
        let Some(tag) = tag else {
            return ResolutionUnit::Inch;
        };
        
        let is_cm = |s: &str| {
            let s = s.trim();
            s == "3" || s.eq_ignore_ascii_case("cm")
        };
        
        let by_value = tag.raw_string().is_some_and(|v| is_cm(&v));
        let by_description = tag.description.as_deref().is_some_and(is_cm);
        
        if by_value || by_description {
            ResolutionUnit::Centimeter
        } else {
            ResolutionUnit::Inch
        }
    }
    
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionUnit::Inch => "DPI",
            ResolutionUnit::Centimeter => "pixels/cm",
        }
    }
}

/// Format a resolution, only when both axes are known
pub fn resolve_dpi(x: Option<&str>, y: Option<&str>, unit: Option<&RawTag>) -> Option<String> {
    let x = x.map(str::trim).filter(|s| !s.is_empty())?;
    let y = y.map(str::trim).filter(|s| !s.is_empty())?;
    let unit = ResolutionUnit::from_tag(unit).label();
    
    if x == y {
        Some(format!("{} {}", x, unit))
    } else {
        Some(format!("{} x {} {}", x, y, unit))
    }
}

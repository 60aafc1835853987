//! Human-readable file sizes

const UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary (1024) units, rounded to two decimals
///
/// # Example
/// ```
/// use imgmeta::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1048576), "1 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    
    // Largest unit with bytes >= 1024^index, clamped to the table
    let mut index = 0;
    let mut scale: u64 = 1;
    while index + 1 < UNITS.len() {
        match scale.checked_mul(1024) {
            Some(next) if bytes >= next => {
                scale = next;
                index += 1;
            }
            _ => break,
        }
    }
    
    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[index])
}

//! Bit depth summaries from BitsPerSample / SamplesPerPixel

/// Returned when nothing usable is known and no fallback was given
pub const UNKNOWN: &str = "Unknown";

/// Summarize per-channel and total bit depth
///
/// `bits_per_sample` is a whitespace-separated list such as `"8 8 8"`;
/// tokens that are not integers are ignored when summing, but a mixed list is
/// echoed back as given. Malformed input never fails,
/// it yields `fallback` (or [`UNKNOWN`]).
pub fn bit_depth(
    bits_per_sample: Option<&str>,
    samples_per_pixel: Option<&str>,
    fallback: Option<&str>,
) -> String {
    let fallback = || fallback.unwrap_or(UNKNOWN).to_string();
    let channels = samples_per_pixel.and_then(parse_channel_count);
    
    let Some(bits) = bits_per_sample else {
        return match (samples_per_pixel, channels) {
            (Some(_), Some(n)) => format!("{} {}", n, if n == 1 { "channel" } else { "channels" }),
            _ => fallback(),
        };
    };
    
    let values: Vec<u32> = bits
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect();
    
    let Some(&first) = values.first() else {
        return fallback();
    };
    
    if values.iter().all(|&v| v == first) {
        let count = channels.unwrap_or(values.len() as u32);
        let total = u64::from(first).saturating_mul(u64::from(count));
        if count > 1 {
            format!("{} bit ({} bit per channel, {} channels)", total, first, count)
        } else {
            format!("{} bit", first)
        }
    } else {
        let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
        format!("{} bit ({} per channel)", total, bits.trim())
    }
}

fn parse_channel_count(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

//! Byte-size formatting for human-readable output

const SIZE_SUFFIXES: [&str; 9] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Formats a byte count with a binary-magnitude suffix
///
/// `size_suffix(1536, 1)` is `"1.5 KB"`; magnitudes step at 1024. Values
/// that would round up to 1000 or more are promoted to the next suffix so
/// the printed number stays under four digits.
pub fn size_suffix(value: u64, decimal_places: usize) -> String {
    if value == 0 {
        return format!("{:.*} bytes", decimal_places, 0.0);
    }

    // 0 for bytes, 1 for KB, 2 for MB, ...
    let mut mag = (value.ilog2() / 10) as usize;
    let mut adjusted = value as f64 / (1u64 << (mag * 10)) as f64;

    let rounded = format!("{:.*}", decimal_places, adjusted);
    if rounded.parse::<f64>().unwrap_or(adjusted) >= 1000.0 {
        mag += 1;
        adjusted /= 1024.0;
    }

    format!("{:.*} {}", decimal_places, adjusted, SIZE_SUFFIXES[mag])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(size_suffix(0, 1), "0.0 bytes");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(size_suffix(42, 1), "42.0 bytes");
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(size_suffix(1536, 1), "1.5 KB");
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(size_suffix(5 * 1024 * 1024, 1), "5.0 MB");
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(size_suffix(1536, 2), "1.50 KB");
        assert_eq!(size_suffix(1536, 0), "2 KB");
    }

    #[test]
    fn test_promotion_near_boundary() {
        // 1023.9 KB would print as a four-digit number; promote to MB.
        let value = 1024 * 1024 - 100;
        assert!(size_suffix(value, 1).ends_with("MB"));
    }
}

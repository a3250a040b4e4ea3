//! Human-readable formatting helpers

/// Format a byte count the way the upload page shows it
///
/// 1024-based units, at most two decimals, trailing zeros trimmed:
/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `20 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let mut formatted = format!("{:.2}", value);
    if formatted.contains('.') {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    format!("{} {}", formatted, UNITS[exponent])
}

/// Format a millisecond countdown as `MM:SS`
pub fn format_remaining(ms: i64) -> String {
    let total_secs = (ms.max(0)) / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

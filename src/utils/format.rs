use itertools::Itertools;

/// Integer with comma thousands separators, e.g. `30,000`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Fraction rendered as a percentage, e.g. `0.015` with one decimal is `1.5%`
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, fraction * 100.0);
    // Avoid "-0.0%" for tiny negative rounding noise
    if rendered.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return format!("{}%", rendered.trim_start_matches('-'));
    }
    format!("{}%", rendered)
}

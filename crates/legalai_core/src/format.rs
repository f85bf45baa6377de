//! crates/legalai_core/src/format.rs
//!
//! Display helpers shared by the dashboard and analysis views.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with base-1024 units and at most two decimals,
/// e.g. `1536` -> `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Formats an upload time like `Jan 5, 2024, 02:30 PM`.
pub fn format_timestamp(at: Option<&DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "Unknown date".to_string(),
    }
}

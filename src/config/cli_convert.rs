//! Size string conversion utilities

use crate::error::PatternError;

const UNITS: [(char, u64); 4] = [
    ('k', 1024),
    ('m', 1024 * 1024),
    ('g', 1024 * 1024 * 1024),
    ('t', 1024 * 1024 * 1024 * 1024),
];

/// Parse a size string (e.g., "4K", "128k", "4G", "1mb", "32768") to bytes
///
/// Units are binary multiples and case-insensitive; a trailing `b` after the unit is
/// accepted. A bare number is a byte count.
pub fn parse_size(s: &str) -> Result<u64, PatternError> {
    let lower = s.trim().to_lowercase();
    let unit_part = lower.strip_suffix('b').filter(|rest| rest.ends_with(char::is_alphabetic));
    let body = unit_part.unwrap_or(&lower);

    let (num_str, multiplier) = match body.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let multiplier = UNITS
                .iter()
                .find(|(unit, _)| *unit == c)
                .map(|&(_, m)| m)
                .ok_or_else(|| PatternError::invalid(format!("Invalid size unit in '{}'", s)))?;
            (&body[..body.len() - 1], multiplier)
        }
        _ => (body, 1),
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| PatternError::invalid(format!("Invalid size format: '{}'", s)))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| PatternError::invalid(format!("Size '{}' overflows 64 bits", s)))
}

/// Render a byte count with the largest unit that divides it exactly (e.g. "4K", "1M")
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    for &(unit, multiplier) in UNITS.iter().rev() {
        if bytes % multiplier == 0 {
            return format!("{}{}", bytes / multiplier, unit.to_ascii_uppercase());
        }
    }
    bytes.to_string()
}

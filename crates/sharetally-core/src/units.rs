//! Size and age unit conversion.
//!
//! The scanner reports sizes as `<decimal><unit>` tokens (`65.1KiB`, `729`)
//! and ages as runs of `<integer><unit>` groups (`59d4h`, `+0s`). Everything
//! downstream works on canonical bytes and seconds; the display helpers here
//! are the exact inverses used when rendering a report.

/// Bytes in one kilobyte. `KB` and `KiB` are both treated as 1024.
pub const KB: u64 = 1024;
/// Bytes in one megabyte.
pub const MB: u64 = KB * 1024;
/// Bytes in one gigabyte.
pub const GB: u64 = MB * 1024;
/// Bytes in one terabyte.
pub const TB: u64 = GB * 1024;

/// Seconds in one minute.
pub const MINUTE: u64 = 60;
/// Seconds in one hour.
pub const HOUR: u64 = 60 * MINUTE;
/// Seconds in one day.
pub const DAY: u64 = 24 * HOUR;
/// Seconds in one (365 day) year.
pub const YEAR: u64 = 365 * DAY;

/// Multiplier for a size unit suffix, matched case-insensitively.
fn size_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "kb" | "kib" => KB,
        "mb" | "mib" => MB,
        "gb" | "gib" => GB,
        "tb" | "tib" => TB,
        _ => return None,
    };
    Some(multiplier)
}

/// Parse a size token into bytes, or `None` if the token is not recognized.
///
/// Fractional bytes are truncated.
pub fn parse_size(token: &str) -> Option<u64> {
    let token = token.trim();
    let split = token
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(token.len());
    let (number, unit) = token.split_at(split);

    if number.is_empty() || number.starts_with('.') || number.ends_with('.') {
        return None;
    }
    let multiplier = size_multiplier(unit)?;

    // Plain integers stay exact; only fractional values go through f64.
    if let Ok(whole) = number.parse::<u64>() {
        return Some(whole.saturating_mul(multiplier));
    }
    let value: f64 = number.parse().ok()?;
    Some((value * multiplier as f64) as u64)
}

/// Convert a size token to bytes, degrading to 0 for anything unparseable.
pub fn size_to_bytes(token: &str) -> u64 {
    parse_size(token).unwrap_or(0)
}

/// Format a byte count for display.
///
/// Picks the largest unit whose threshold the value meets, using the same
/// multipliers as [`size_to_bytes`].
pub fn bytes_to_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(TB, "TB"), (GB, "GB"), (MB, "MB"), (KB, "KB")];

    for (threshold, label) in UNITS {
        if bytes >= threshold {
            return format!("{:.2} {label}", bytes as f64 / threshold as f64);
        }
    }
    format!("{bytes} B")
}

fn age_multiplier(unit: &str) -> Option<u64> {
    match unit {
        "y" | "Y" => Some(YEAR),
        "d" | "D" => Some(DAY),
        "h" | "H" => Some(HOUR),
        "m" | "M" => Some(MINUTE),
        "s" | "S" => Some(1),
        _ => None,
    }
}

/// Parse an age token into seconds, or `None` if no group carries a known unit.
///
/// A leading `+` (the recency marker) is ignored. Groups contribute
/// independently, so `1h30m` and `30m1h` are equal and a repeated unit adds up.
pub fn parse_age(token: &str) -> Option<u64> {
    let body = token.trim();
    let body = body.strip_prefix('+').unwrap_or(body);
    let bytes = body.as_bytes();

    let mut total: u64 = 0;
    let mut recognized = false;
    let mut pos = 0;

    while pos < bytes.len() {
        let digits_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let digits = &body[digits_start..pos];

        let unit_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let unit = &body[unit_start..pos];

        if digits.is_empty() && unit.is_empty() {
            // Neither a digit nor a letter: skip the stray character.
            pos += body[pos..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        if digits.is_empty() {
            continue;
        }

        if let Some(multiplier) = age_multiplier(unit) {
            let value: u64 = digits.parse().unwrap_or(u64::MAX);
            total = total.saturating_add(value.saturating_mul(multiplier));
            recognized = true;
        }
    }

    recognized.then_some(total)
}

/// Convert an age token to seconds. Unrecognized tokens count as 0 (newest).
pub fn age_to_seconds(token: &str) -> u64 {
    parse_age(token).unwrap_or(0)
}

/// Format an age in seconds using the scanner's compact notation.
///
/// Zero components are omitted, so 59 days 4 hours renders as `59d4h`.
pub fn seconds_to_age(seconds: u64) -> String {
    const UNITS: [(u64, char); 5] = [(YEAR, 'y'), (DAY, 'd'), (HOUR, 'h'), (MINUTE, 'm'), (1, 's')];

    if seconds == 0 {
        return "0s".to_string();
    }

    let mut remaining = seconds;
    let mut out = String::new();
    for (unit, suffix) in UNITS {
        let count = remaining / unit;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push(suffix);
            remaining %= unit;
        }
    }
    out
}

// Human-readable byte-count rendering for tooltips and scale labels.

const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Renders a byte count with binary (1024-based) unit steps, choosing the
/// decimal precision by magnitude so labels stay narrow: values under 10x a
/// unit step get 2 decimals, under 100x get 1, above that none. Plain byte
/// counts are printed as integers with an empty unit, e.g. `"1023 "`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        return format!("{} ", bytes);
    }
    let precision = if value < 10.0 {
        2
    } else if value < 100.0 {
        1
    } else {
        0
    };
    format!("{:.*} {}", precision, value, UNITS[unit])
}

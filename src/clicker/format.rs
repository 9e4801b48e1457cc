//! Number formatting for the mushroom counter.

/// Suffix ladder: (threshold, suffix). The threshold doubles as the divisor.
const UNITS: &[(f64, &str)] = &[(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Whole numbers as-is; everything else rounded to one decimal place, with
/// the decimal dropped when rounding lands on a whole number.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return if n.is_nan() { "0".into() } else { "∞".into() };
    }
    let rounded = (n * 10.0).round() / 10.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".into();
    }
    format!("{}", rounded)
}

/// Abbreviate with K / M / B / T. Values that round up to 1000 of a unit
/// are promoted to the next unit ("1M", not "1000K").
pub fn format_large_number(n: f64) -> String {
    if n.is_finite() && n < 0.0 {
        return format!("-{}", format_large_number(-n));
    }
    // compare after rounding so 999.95 shows as 1K, not 1000
    if !n.is_finite() || round1(n) < UNITS[0].0 {
        return format_number(n);
    }
    let mut idx = UNITS
        .iter()
        .rposition(|(threshold, _)| n >= *threshold)
        .unwrap_or(0);
    let mut scaled = round1(n / UNITS[idx].0);
    while scaled >= 1000.0 && idx + 1 < UNITS.len() {
        idx += 1;
        scaled = round1(n / UNITS[idx].0);
    }
    format!("{}{}", format_number(scaled), UNITS[idx].1)
}

fn round1(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}

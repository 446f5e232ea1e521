//! Display helpers for values that may be undefined
//!
//! Indicator columns and percent changes are `Option<f64>`; anything that is
//! absent or not finite renders as `N/A`.

/// Placeholder shown for an undefined value
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an optional value with a fixed number of decimals.
pub fn or_na(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a value with an explicit sign, e.g. `+1.25` or `-0.40`.
pub fn signed(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:+.decimals$}")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Format an optional percentage with an explicit sign, e.g. `+1.25%`.
pub fn signed_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render a whole number with comma thousands separators.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0.0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(12.345), 2), "12.35");
        assert_eq!(or_na(None, 2), "N/A");
        assert_eq!(or_na(Some(f64::NAN), 2), "N/A");
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(1.5, 2), "+1.50");
        assert_eq!(signed(-0.4, 2), "-0.40");
        assert_eq!(signed(f64::INFINITY, 2), "N/A");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(Some(2.0)), "+2.00%");
        assert_eq!(signed_percent(Some(-1.234)), "-1.23%");
        assert_eq!(signed_percent(None), "N/A");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-45_000.0), "-45,000");
    }
}

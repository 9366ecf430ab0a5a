// src/results/salary.rs
//! Salary and budget display strings.

/// Compact amount: `1.2M`, `85K`, or the plain number.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", (amount / 100_000.0).round() / 10.0)
    } else if amount >= 1_000.0 {
        format!("{}K", (amount / 1_000.0).round())
    } else {
        format!("{}", amount)
    }
}

/// Drops zero amounts, which scrapers use for "unknown".
pub fn nonzero(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a != 0.0 && a.is_finite())
}

/// `"{currency} {min} - {max} / {unit}"` or `"{currency} {value} / {unit}"`.
pub fn format_range(
    currency: &str,
    min: Option<f64>,
    max: Option<f64>,
    value: Option<f64>,
    unit: Option<&str>,
) -> Option<String> {
    let unit = unit
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "year".to_string());

    let text = match (nonzero(min), nonzero(max), nonzero(value)) {
        (Some(min), Some(max), _) => format!(
            "{} {} - {} / {}",
            currency,
            format_amount(min),
            format_amount(max),
            unit
        ),
        (_, _, Some(value)) => format!("{} {} / {}", currency, format_amount(value), unit),
        _ => return None,
    };
    Some(text.trim().to_string())
}

/// Whole-number amount with thousands separators, e.g. `12,500`.
pub fn group_thousands(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_250_000.0), "1.3M");
        assert_eq!(format_amount(2_000_000.0), "2.0M");
        assert_eq!(format_amount(85_400.0), "85K");
        assert_eq!(format_amount(1_500.0), "2K");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(42.5), "42.5");
    }

    #[test]
    fn test_format_range_shapes() {
        assert_eq!(
            format_range("USD", Some(90_000.0), Some(120_000.0), None, Some("YEAR")).as_deref(),
            Some("USD 90K - 120K / year")
        );
        assert_eq!(
            format_range("EUR", Some(50.0), None, Some(60.0), Some("HOUR")).as_deref(),
            Some("EUR 60 / hour")
        );
        assert_eq!(
            format_range("", None, None, Some(70_000.0), None).as_deref(),
            Some("70K / year")
        );
        assert_eq!(format_range("USD", Some(0.0), None, None, None), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_500.0), "1,500");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_234_567.4), "1,234,567");
    }
}

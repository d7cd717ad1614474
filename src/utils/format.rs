use chrono::NaiveDateTime;

/// Format an amount in pesos with dot thousands separators, e.g. `$5.000`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(999), "$999");
        assert_eq!(format_amount(5000), "$5.000");
        assert_eq!(format_amount(100000), "$100.000");
        assert_eq!(format_amount(1234567), "$1.234.567");
        assert_eq!(format_amount(-2500), "-$2.500");
    }

    #[test]
    fn test_format_timestamp() {
        let at = NaiveDateTime::parse_from_str("2025-03-01T14:05:09.123", "%Y-%m-%dT%H:%M:%S%.f")
            .expect("valid timestamp");
        assert_eq!(format_timestamp(&at), "2025-03-01 14:05:09");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Claro", 10), "Claro");
        assert_eq!(truncate("Transacción exitosa", 11), "Transacción...");
    }
}

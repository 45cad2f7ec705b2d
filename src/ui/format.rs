/// Group the integer part with commas: `1234567` → `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn signed_money(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text.as_str(), None),
    };
    let sign = if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac {
        Some(frac) => format!("{sign}${}.{frac}", group_thousands(int)),
        None => format!("{sign}${}", group_thousands(int)),
    }
}

/// `$1,234`
pub fn money(value: f64) -> String {
    signed_money(value, 0)
}

/// `$1,234.56`
pub fn money_cents(value: f64) -> String {
    signed_money(value, 2)
}

/// `12.34%`
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// `1,234`
pub fn count(n: usize) -> String {
    group_thousands(&n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(2_297_200.86), "$2,297,201");
        assert_eq!(money(999.4), "$999");
        assert_eq!(money(-1_500.0), "-$1,500");
        assert_eq!(money(-0.2), "$0");
        assert_eq!(money_cents(1234.5), "$1,234.50");
        assert_eq!(money_cents(-7.126), "-$7.13");
    }

    #[test]
    fn percent_and_count() {
        assert_eq!(percent(12.346, 2), "12.35%");
        assert_eq!(percent(50.0, 1), "50.0%");
        assert_eq!(count(0), "0");
        assert_eq!(count(1_234), "1,234");
        assert_eq!(count(100_000), "100,000");
    }
}

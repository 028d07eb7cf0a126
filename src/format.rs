use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// `£1,234.56`, with a leading minus for negative amounts
pub fn format_currency(amount: Money) -> String {
    format_pounds(amount.as_decimal(), 2)
}

/// `£1,235`, rounded to whole pounds
pub fn format_currency_whole(amount: Money) -> String {
    format_pounds(amount.as_decimal(), 0)
}

/// rate as a percentage with a fixed number of decimal places, e.g. `9.00%`
pub fn format_percent(rate: Rate, dp: u32) -> String {
    let mut percent = rate.as_percentage().round_dp(dp);
    percent.rescale(dp);
    format!("{}%", percent)
}

/// `12 years 3 months`; either part is dropped when zero
pub fn format_duration_months(months: u32) -> String {
    let years = months / 12;
    let rest = months % 12;

    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (years, rest) {
        (0, rest) => plural(rest, "month"),
        (years, 0) => plural(years, "year"),
        (years, rest) => format!("{} {}", plural(years, "year"), plural(rest, "month")),
    }
}

fn format_pounds(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp(dp).abs();
    rounded.rescale(dp);
    let text = rounded.to_string();

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.round_dp(dp).is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{}£{}.{}", sign, grouped, fraction),
        None => format!("{}£{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Money::from_decimal(dec!(1234.56))), "£1,234.56");
        assert_eq!(format_currency(Money::from_decimal(dec!(-1234.56))), "-£1,234.56");
        assert_eq!(format_currency(Money::from_major(1_000_000)), "£1,000,000.00");
        assert_eq!(format_currency(Money::from_decimal(dec!(20.2875))), "£20.29");
        assert_eq!(format_currency(Money::ZERO), "£0.00");
        assert_eq!(format_currency(Money::from_decimal(dec!(-0.001))), "£0.00");
    }

    #[test]
    fn test_currency_whole() {
        assert_eq!(format_currency_whole(Money::from_decimal(dec!(1234.56))), "£1,235");
        assert_eq!(format_currency_whole(Money::from_major(999)), "£999");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(Rate::from_percentage(9), 2), "9.00%");
        assert_eq!(format_percent(Rate::from_bps(730), 1), "7.3%");
        assert_eq!(format_percent(Rate::from_decimal(dec!(0.10953)), 0), "11%");
    }

    #[test]
    fn test_duration() {
        assert_eq!(format_duration_months(147), "12 years 3 months");
        assert_eq!(format_duration_months(12), "1 year");
        assert_eq!(format_duration_months(13), "1 year 1 month");
        assert_eq!(format_duration_months(0), "0 months");
    }
}

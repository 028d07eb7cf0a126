use crate::config::{BandTable, TaxYearConfig};
use crate::decimal::Money;
use crate::tax::apply_bands;

/// Annual employee class 1 NI on gross pay. The zero-rate band below the
/// primary threshold is part of the table, so no allowance is deducted.
pub fn compute_national_insurance(annual_gross: Money, config: &TaxYearConfig) -> Money {
    compute_national_insurance_with_table(annual_gross, &config.national_insurance)
}

pub fn compute_national_insurance_with_table(annual_gross: Money, table: &BandTable) -> Money {
    let floor = table
        .bands
        .first()
        .map(|band| band.lower)
        .unwrap_or(Money::ZERO);

    apply_bands((annual_gross - floor).non_negative(), &table.bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TaxYearConfig {
        TaxYearConfig::uk_2024_25()
    }

    #[test]
    fn test_below_primary_threshold() {
        assert_eq!(compute_national_insurance(Money::from_major(12_000), &config()), Money::ZERO);
        assert_eq!(compute_national_insurance(Money::from_major(12_570), &config()), Money::ZERO);
    }

    #[test]
    fn test_main_rate() {
        // 17,430 at 8%
        let ni = compute_national_insurance(Money::from_major(30_000), &config());
        assert_eq!(ni, Money::from_decimal(rust_decimal_macros::dec!(1394.40)));
    }

    #[test]
    fn test_upper_rate() {
        // 37,700 at 8% + 9,730 at 2%
        let ni = compute_national_insurance(Money::from_major(60_000), &config());
        assert_eq!(ni, Money::from_decimal(rust_decimal_macros::dec!(3210.60)));
    }

    #[test]
    fn test_negative_income_clamped() {
        assert_eq!(compute_national_insurance(Money::from_major(-1), &config()), Money::ZERO);
    }
}

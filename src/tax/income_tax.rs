use log::warn;

use crate::config::{BandTable, TaxYearConfig};
use crate::decimal::{Money, Rate};
use crate::tax::apply_bands;
use crate::tax::code::{TaxCode, TaxCodeKind};
use crate::types::{Region, TaxJurisdiction};

/// Annual income tax on `annual_gross` for a borrower in `region`.
///
/// An S or C prefix on the tax code overrides the region's band table. An
/// unparseable code falls back to the configured standard code.
pub fn compute_income_tax(
    annual_gross: Money,
    tax_code: &str,
    region: Region,
    config: &TaxYearConfig,
) -> Money {
    let code = TaxCode::parse(tax_code).unwrap_or_else(|err| {
        warn!("{}; falling back to {}", err, config.standard_tax_code);
        TaxCode::parse(&config.standard_tax_code)
            .unwrap_or_else(|_| TaxCode::with_allowance(config.personal_allowance))
    });

    compute_tax_with_code(annual_gross, &code, region, config)
}

/// income tax for an already parsed code
pub fn compute_tax_with_code(
    annual_gross: Money,
    code: &TaxCode,
    region: Region,
    config: &TaxYearConfig,
) -> Money {
    let jurisdiction = code
        .jurisdiction
        .unwrap_or(config.region(region).tax_jurisdiction);
    let table = config.income_tax_bands(jurisdiction);
    let gross = annual_gross.non_negative();

    match &code.kind {
        TaxCodeKind::Standard => compute_tax_for_allowance(gross, config.personal_allowance, table),
        TaxCodeKind::Allowance(allowance) => compute_tax_for_allowance(gross, *allowance, table),
        TaxCodeKind::Deduction(amount) => apply_bands(gross + *amount, table.chargeable_bands()),
        TaxCodeKind::FlatRate(band) => {
            let rate = table
                .band_named(band)
                .map(|band| band.rate)
                .unwrap_or_else(|| flat_rate_fallback(table, jurisdiction));
            gross.apply_rate(rate)
        }
        TaxCodeKind::NoTax => Money::ZERO,
    }
}

/// Tax on `annual_gross` after deducting `allowance`, walking the
/// chargeable bands of `table` by width.
pub fn compute_tax_for_allowance(annual_gross: Money, allowance: Money, table: &BandTable) -> Money {
    let taxable = (annual_gross.non_negative() - allowance.non_negative()).non_negative();
    apply_bands(taxable, table.chargeable_bands())
}

fn flat_rate_fallback(table: &BandTable, jurisdiction: TaxJurisdiction) -> Rate {
    warn!("flat rate band missing from {:?} table, using top rate", jurisdiction);
    table.top_rate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> TaxYearConfig {
        TaxYearConfig::uk_2024_25()
    }

    #[test]
    fn test_basic_rate_taxpayer() {
        let tax = compute_income_tax(Money::from_major(30_000), "1257L", Region::England, &config());
        // (30,000 - 12,570) at 20%
        assert_eq!(tax, Money::from_major(3_486));
    }

    #[test]
    fn test_higher_rate_taxpayer() {
        let tax = compute_income_tax(Money::from_major(60_000), "1257L", Region::England, &config());
        // 37,700 at 20% + 9,730 at 40%
        assert_eq!(tax, Money::from_major(11_432));
    }

    #[test]
    fn test_allowance_covers_income() {
        let tax = compute_income_tax(Money::from_major(12_000), "1257L", Region::Wales, &config());
        assert_eq!(tax, Money::ZERO);
        let tax = compute_income_tax(Money::from_major(-5_000), "1257L", Region::Wales, &config());
        assert_eq!(tax, Money::ZERO);
    }

    #[test]
    fn test_scottish_bands() {
        let tax = compute_income_tax(Money::from_major(30_000), "S1257L", Region::England, &config());
        // starter 2,306 at 19% + basic 11,685 at 20% + intermediate 3,439 at 21%
        let expected = dec!(438.14) + dec!(2337) + dec!(722.19);
        assert_eq!(tax, Money::from_decimal(expected));

        let by_region = compute_income_tax(Money::from_major(30_000), "1257L", Region::Scotland, &config());
        assert_eq!(by_region, tax);
    }

    #[test]
    fn test_prefix_overrides_region() {
        let tax = compute_income_tax(Money::from_major(30_000), "C1257L", Region::Scotland, &config());
        assert_eq!(tax, Money::from_major(3_486));
    }

    #[test]
    fn test_special_codes() {
        let gross = Money::from_major(30_000);
        assert_eq!(compute_income_tax(gross, "NT", Region::England, &config()), Money::ZERO);
        assert_eq!(compute_income_tax(gross, "BR", Region::England, &config()), Money::from_major(6_000));
        assert_eq!(compute_income_tax(gross, "0T", Region::England, &config()), Money::from_major(6_000));
        // 34,750 taxable: 34,750 at 20%
        assert_eq!(compute_income_tax(gross, "K475", Region::England, &config()), Money::from_major(6_950));
    }

    #[test]
    fn test_invalid_code_falls_back_to_standard() {
        let gross = Money::from_major(30_000);
        let fallback = compute_income_tax(gross, "not a code", Region::England, &config());
        assert_eq!(fallback, compute_income_tax(gross, "1257L", Region::England, &config()));
    }
}

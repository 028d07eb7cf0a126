pub mod code;
pub mod income_tax;
pub mod national_insurance;

use crate::config::TaxBand;
use crate::decimal::Money;

pub use code::{TaxCode, TaxCodeKind};
pub use income_tax::{compute_income_tax, compute_tax_for_allowance, compute_tax_with_code};
pub use national_insurance::{compute_national_insurance, compute_national_insurance_with_table};

/// walk bands in ascending order, charging each band's rate on the part of
/// `income` that falls within its width
pub fn apply_bands(income: Money, bands: &[TaxBand]) -> Money {
    let mut remaining = income.non_negative();
    let mut total = Money::ZERO;

    for band in bands {
        if remaining.is_zero() {
            break;
        }

        let charged = match band.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };

        total += charged.apply_rate(band.rate);
        remaining -= charged;
    }

    total
}

pub mod accrual;
pub mod compound;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{EngineError, Result};

pub use accrual::{AccrualEngine, MonthlyAccrual};
pub use compound::{CompoundingEngine, GrowthProjection, MAX_ANNUAL_RETURN};

/// how a plan's annual interest rate is set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InterestRule {
    /// one rate regardless of income
    Fixed { rate: Rate },
    /// RPI at or below `lower_income`, RPI + uplift at or above
    /// `upper_income`, linear in between
    Sliding {
        rpi: Rate,
        uplift: Rate,
        lower_income: Money,
        upper_income: Money,
    },
    /// lower of RPI and base rate plus a margin
    LesserOf {
        rpi: Rate,
        base_rate: Rate,
        base_rate_margin: Rate,
    },
}

impl InterestRule {
    /// annual rate for a borrower on the given annual income
    pub fn annual_rate(&self, annual_income: Money) -> Rate {
        match *self {
            InterestRule::Fixed { rate } => rate.non_negative(),
            InterestRule::Sliding {
                rpi,
                uplift,
                lower_income,
                upper_income,
            } => sliding_rate(rpi, uplift, annual_income, lower_income, upper_income),
            InterestRule::LesserOf {
                rpi,
                base_rate,
                base_rate_margin,
            } => rpi.min(base_rate + base_rate_margin).non_negative(),
        }
    }

    /// true when the rate depends on income
    pub fn is_income_dependent(&self) -> bool {
        matches!(self, InterestRule::Sliding { .. })
    }

    pub fn validate(&self) -> Result<()> {
        let rates = match *self {
            InterestRule::Fixed { rate } => vec![rate],
            InterestRule::Sliding {
                rpi,
                uplift,
                lower_income,
                upper_income,
            } => {
                if upper_income < lower_income {
                    return Err(EngineError::InvalidConfiguration {
                        message: format!(
                            "sliding interest upper income {} is below lower income {}",
                            upper_income, lower_income
                        ),
                    });
                }
                vec![rpi, uplift]
            }
            InterestRule::LesserOf {
                rpi,
                base_rate,
                base_rate_margin,
            } => vec![rpi, base_rate, base_rate_margin],
        };

        match rates.into_iter().find(|rate| rate.as_decimal() < Decimal::ZERO) {
            Some(rate) => Err(EngineError::InvalidInterestRate { rate }),
            None => Ok(()),
        }
    }
}

/// Plan 2 style sliding rate with the standard 3 percentage point uplift.
///
/// Returns `rpi` when income is at or below `lower_threshold`, `rpi + 3%`
/// at or above `upper_threshold`, and interpolates linearly in between.
pub fn compute_sliding_interest_rate(
    rpi: Rate,
    income: Money,
    lower_threshold: Money,
    upper_threshold: Money,
) -> Rate {
    sliding_rate(
        rpi,
        Rate::from_percentage(3),
        income,
        lower_threshold,
        upper_threshold,
    )
}

fn sliding_rate(rpi: Rate, uplift: Rate, income: Money, lower: Money, upper: Money) -> Rate {
    let income = income.non_negative();

    if income <= lower {
        return rpi;
    }
    // inverted or empty range steps straight to the full uplift
    if income >= upper || upper <= lower {
        return rpi + uplift;
    }

    let position = Money::ratio(income - lower, upper - lower);
    Rate::from_decimal(rpi.as_decimal() + uplift.as_decimal() * position)
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// highest annual return a projection will compound at
pub const MAX_ANNUAL_RETURN: Rate = Rate::ONE;

/// engine for compound growth of a savings pot with regular contributions
#[derive(Debug, Clone, Copy)]
pub struct CompoundingEngine {
    pub annual_return: Rate,
}

impl CompoundingEngine {
    /// returns are clamped to [-100%, `MAX_ANNUAL_RETURN`]
    pub fn new(annual_return: Rate) -> Self {
        Self {
            annual_return: annual_return
                .max(Rate::from_decimal(dec!(-1)))
                .min(MAX_ANNUAL_RETURN),
        }
    }

    pub fn monthly_return(&self) -> Decimal {
        self.annual_return.as_decimal() / dec!(12)
    }

    /// grow a pot monthly: `value = value * (1 + r / 12) + contribution`,
    /// with the contribution paid at the end of each month. A pot that
    /// outgrows `Decimal` stops at `Decimal::MAX`.
    pub fn grow_with_contributions(
        &self,
        opening_value: Money,
        monthly_contribution: Money,
        months: u32,
    ) -> GrowthProjection {
        let growth = Decimal::ONE + self.monthly_return();
        let contribution = monthly_contribution.non_negative();
        let mut value = opening_value.non_negative();

        for _ in 0..months {
            match value
                .as_decimal()
                .checked_mul(growth)
                .and_then(|grown| grown.checked_add(contribution.as_decimal()))
            {
                Some(next) => value = Money::from_decimal(next),
                None => {
                    value = Money::from_decimal(Decimal::MAX);
                    break;
                }
            }
        }

        let total_contributed = opening_value.non_negative() + contribution * Decimal::from(months);

        GrowthProjection {
            months,
            total_contributed,
            final_value: value,
            gain: value - total_contributed,
        }
    }

    /// compound a single sum for the given number of months
    pub fn compound_monthly(&self, principal: Money, months: u32) -> Money {
        self.grow_with_contributions(principal, Money::ZERO, months).final_value
    }
}

/// result of growing a pot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub months: u32,
    pub total_contributed: Money,
    pub final_value: Money,
    /// final value less everything paid in
    pub gain: Money,
}

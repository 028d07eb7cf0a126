use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};
use crate::interest::InterestRule;

/// engine for accruing loan interest one month at a time
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub rule: InterestRule,
}

impl AccrualEngine {
    pub fn new(rule: InterestRule) -> Self {
        Self { rule }
    }

    /// annual rate for the borrower's current income
    pub fn annual_rate(&self, annual_income: Money) -> Rate {
        self.rule.annual_rate(annual_income)
    }

    /// accrue one month of simple interest (annual rate / 12) on the
    /// opening balance
    pub fn accrue_monthly(&self, balance: Money, annual_income: Money) -> MonthlyAccrual {
        let annual_rate = self.annual_rate(annual_income);
        let monthly_rate = annual_rate.as_decimal() / dec!(12);
        let balance = balance.non_negative();

        MonthlyAccrual {
            principal_base: balance,
            interest_amount: Money::from_decimal(balance.as_decimal() * monthly_rate),
            annual_rate,
            monthly_rate: Rate::from_decimal(monthly_rate),
        }
    }

    /// interest for a full year charged once on the opening balance
    pub fn accrue_annual(&self, balance: Money, annual_income: Money) -> Money {
        balance.non_negative().apply_rate(self.annual_rate(annual_income))
    }
}

/// monthly accrual record
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAccrual {
    pub principal_base: Money,
    pub interest_amount: Money,
    pub annual_rate: Rate,
    pub monthly_rate: Rate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_monthly_accrual() {
        let engine = AccrualEngine::new(InterestRule::Fixed {
            rate: Rate::from_percentage(6),
        });

        let accrual = engine.accrue_monthly(Money::from_major(10_000), Money::from_major(30_000));

        assert_eq!(accrual.interest_amount, Money::from_major(50));
        assert_eq!(accrual.monthly_rate.as_decimal(), dec!(0.005));
        assert_eq!(accrual.principal_base, Money::from_major(10_000));
    }

    #[test]
    fn test_sliding_accrual_follows_income() {
        let engine = AccrualEngine::new(InterestRule::Sliding {
            rpi: Rate::from_percentage(3),
            uplift: Rate::from_percentage(3),
            lower_income: Money::from_major(25_000),
            upper_income: Money::from_major(50_000),
        });

        let low = engine.accrue_monthly(Money::from_major(12_000), Money::from_major(20_000));
        let high = engine.accrue_monthly(Money::from_major(12_000), Money::from_major(60_000));

        assert_eq!(low.interest_amount, Money::from_major(30));
        assert_eq!(high.interest_amount, Money::from_major(60));
    }

    #[test]
    fn test_negative_balance_accrues_nothing() {
        let engine = AccrualEngine::new(InterestRule::Fixed {
            rate: Rate::from_percentage(6),
        });

        let accrual = engine.accrue_monthly(Money::from_major(-1_000), Money::ZERO);
        assert_eq!(accrual.interest_amount, Money::ZERO);
        assert_eq!(engine.accrue_annual(Money::from_major(1_000), Money::ZERO), Money::from_major(60));
    }
}

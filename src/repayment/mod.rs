pub mod allocation;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanPlanConfig;
use crate::decimal::{Money, Rate};
use crate::types::RepaymentPeriod;

pub use allocation::{
    allocate_combined_or_separate, allocate_for_period, allocate_headline, LoanPosition,
    RepaymentBreakdown,
};

/// Mandatory repayment for one pay period: `rate * max(0, income - threshold)`
/// with the annual threshold prorated to the period.
pub fn compute_loan_repayment(
    period_income: Money,
    plan: &LoanPlanConfig,
    period: RepaymentPeriod,
) -> Money {
    let threshold = period_threshold(plan.threshold, period);
    repayment_above_threshold(period_income, threshold, plan.repayment_rate)
}

/// monthly repayment on an annual salary
pub fn monthly_repayment(annual_income: Money, plan: &LoanPlanConfig) -> Money {
    compute_loan_repayment(annual_income.per_month(), plan, RepaymentPeriod::Monthly)
}

/// annual repayment on an annual salary
pub fn annual_repayment(annual_income: Money, plan: &LoanPlanConfig) -> Money {
    compute_loan_repayment(annual_income, plan, RepaymentPeriod::Annual)
}

/// threshold repayment with explicit terms, shared with the postgraduate
/// rules held on the region
pub fn repayment_above_threshold(period_income: Money, threshold: Money, rate: Rate) -> Money {
    let above = (period_income.non_negative() - threshold.non_negative()).non_negative();
    above.apply_rate(rate.non_negative())
}

/// scale an annual threshold to a pay period
pub fn period_threshold(annual_threshold: Money, period: RepaymentPeriod) -> Money {
    annual_threshold / Decimal::from(period.periods_per_year())
}

/// headline repayment figures for one plan at one salary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentQuote {
    pub annual_income: Money,
    pub threshold: Money,
    pub repayment_rate: Rate,
    pub monthly_repayment: Money,
    pub annual_repayment: Money,
    /// annual interest rate the plan charges at this income
    pub interest_rate: Rate,
}

impl RepaymentQuote {
    pub fn for_plan(annual_income: Money, plan: &LoanPlanConfig) -> Self {
        let annual_income = annual_income.non_negative();
        Self {
            annual_income,
            threshold: plan.threshold,
            repayment_rate: plan.repayment_rate,
            monthly_repayment: monthly_repayment(annual_income, plan),
            annual_repayment: annual_repayment(annual_income, plan),
            interest_rate: plan.interest.annual_rate(annual_income),
        }
    }

    pub fn repays(&self) -> bool {
        self.annual_repayment.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxYearConfig;
    use crate::types::PlanType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_2_annual_repayment() {
        let config = TaxYearConfig::uk_2024_25();
        let plan = config.plan(PlanType::Plan2);

        let annual = annual_repayment(Money::from_major(30_000), plan);
        assert_eq!(annual, Money::from_decimal(dec!(243.45)));

        let monthly = monthly_repayment(Money::from_major(30_000), plan);
        assert_eq!(monthly.round_pence(), Money::from_decimal(dec!(20.29)));
    }

    #[test]
    fn test_below_and_at_threshold() {
        let config = TaxYearConfig::uk_2024_25();
        let plan = config.plan(PlanType::Plan2);

        assert_eq!(annual_repayment(Money::from_major(20_000), plan), Money::ZERO);
        assert_eq!(annual_repayment(plan.threshold, plan), Money::ZERO);
        assert_eq!(annual_repayment(Money::from_major(-10_000), plan), Money::ZERO);
    }

    #[test]
    fn test_monthly_threshold_is_prorated() {
        let config = TaxYearConfig::uk_2024_25();
        let plan = config.plan(PlanType::Postgraduate);

        let monthly = compute_loan_repayment(Money::from_major(2_500), plan, RepaymentPeriod::Monthly);
        assert_eq!(monthly, Money::from_major(45));
    }

    #[test]
    fn test_quote() {
        let config = TaxYearConfig::uk_2024_25();
        let quote = RepaymentQuote::for_plan(Money::from_major(60_000), config.plan(PlanType::Plan2));

        assert!(quote.repays());
        assert_eq!(quote.interest_rate.as_decimal(), dec!(0.073));
        assert_eq!(quote.annual_repayment, Money::from_decimal(dec!(2943.45)));
    }
}

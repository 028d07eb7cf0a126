use serde::{Deserialize, Serialize};

use crate::config::TaxYearConfig;
use crate::decimal::{Money, Rate};
use crate::payroll::{monthly_payroll, PayrollBreakdown};
use crate::types::{PlanType, Region};

/// what a one-off bonus costs in PAYE deductions in the month it is paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusAnalysis {
    pub normal_month: PayrollBreakdown,
    pub bonus_month: PayrollBreakdown,
    pub additional_tax: Money,
    pub additional_ni: Money,
    pub additional_undergraduate: Money,
    pub additional_postgraduate: Money,
    pub additional_deductions: Money,
    /// bonus less the additional deductions
    pub bonus_take_home: Money,
    /// additional deductions as a share of the bonus
    pub effective_deduction_rate: Rate,
}

/// Payroll for a regular month and for the same month with `bonus` added.
/// The additional amounts are the per-deduction differences.
pub fn compute_bonus_impact(
    regular_monthly: Money,
    bonus: Money,
    tax_code: &str,
    region: Region,
    plan: Option<PlanType>,
    has_postgraduate: bool,
    config: &TaxYearConfig,
) -> BonusAnalysis {
    let regular = regular_monthly.non_negative();
    let bonus = bonus.non_negative();

    let normal_month = monthly_payroll(regular, tax_code, region, plan, has_postgraduate, config);
    let bonus_month = monthly_payroll(regular + bonus, tax_code, region, plan, has_postgraduate, config);

    let additional_tax = bonus_month.income_tax - normal_month.income_tax;
    let additional_ni = bonus_month.national_insurance - normal_month.national_insurance;
    let additional_undergraduate = bonus_month.undergraduate_loan - normal_month.undergraduate_loan;
    let additional_postgraduate = bonus_month.postgraduate_loan - normal_month.postgraduate_loan;
    let additional_deductions = additional_tax + additional_ni + additional_undergraduate + additional_postgraduate;

    BonusAnalysis {
        additional_tax,
        additional_ni,
        additional_undergraduate,
        additional_postgraduate,
        additional_deductions,
        bonus_take_home: bonus - additional_deductions,
        effective_deduction_rate: Rate::from_decimal(Money::ratio(additional_deductions, bonus)),
        normal_month,
        bonus_month,
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{LoanPlanConfig, TaxYearConfig};
use crate::decimal::Money;
use crate::repayment::allocate_headline;
use crate::tax::{compute_income_tax, compute_national_insurance};
use crate::types::{PlanType, Region, RepaymentPeriod};

/// deductions from one period's gross pay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub gross: Money,
    pub income_tax: Money,
    pub national_insurance: Money,
    pub undergraduate_loan: Money,
    pub postgraduate_loan: Money,
    pub net: Money,
}

impl PayrollBreakdown {
    fn new(gross: Money, income_tax: Money, national_insurance: Money, undergraduate_loan: Money, postgraduate_loan: Money) -> Self {
        let net = gross - income_tax - national_insurance - undergraduate_loan - postgraduate_loan;
        Self {
            gross,
            income_tax,
            national_insurance,
            undergraduate_loan,
            postgraduate_loan,
            net,
        }
    }

    pub fn student_loan(&self) -> Money {
        self.undergraduate_loan + self.postgraduate_loan
    }

    pub fn total_deductions(&self) -> Money {
        self.income_tax + self.national_insurance + self.student_loan()
    }
}

/// Annual take-home pay on `annual_gross`.
///
/// `plan` is the undergraduate plan, if any. Passing
/// `PlanType::Postgraduate` is read as a postgraduate loan on its own.
pub fn payroll_breakdown(
    annual_gross: Money,
    tax_code: &str,
    region: Region,
    plan: Option<PlanType>,
    has_postgraduate: bool,
    config: &TaxYearConfig,
) -> PayrollBreakdown {
    let gross = annual_gross.non_negative();
    let (undergraduate, has_postgraduate) = loan_plans(plan, has_postgraduate, config);

    let loans = allocate_headline(
        gross,
        RepaymentPeriod::Annual,
        undergraduate,
        has_postgraduate,
        config.region(region),
    );

    PayrollBreakdown::new(
        gross,
        compute_income_tax(gross, tax_code, region, config),
        compute_national_insurance(gross, config),
        loans.undergraduate,
        loans.postgraduate,
    )
}

/// One month's pay. Tax and NI are worked out on the annualised salary and
/// divided back down; loan repayments use the monthly thresholds.
pub fn monthly_payroll(
    monthly_gross: Money,
    tax_code: &str,
    region: Region,
    plan: Option<PlanType>,
    has_postgraduate: bool,
    config: &TaxYearConfig,
) -> PayrollBreakdown {
    let gross = monthly_gross.non_negative();
    let annualised = gross.per_year();
    let (undergraduate, has_postgraduate) = loan_plans(plan, has_postgraduate, config);

    let loans = allocate_headline(
        gross,
        RepaymentPeriod::Monthly,
        undergraduate,
        has_postgraduate,
        config.region(region),
    );

    let months = Decimal::from(12);
    PayrollBreakdown::new(
        gross,
        compute_income_tax(annualised, tax_code, region, config) / months,
        compute_national_insurance(annualised, config) / months,
        loans.undergraduate,
        loans.postgraduate,
    )
}

fn loan_plans(
    plan: Option<PlanType>,
    has_postgraduate: bool,
    config: &TaxYearConfig,
) -> (Option<&LoanPlanConfig>, bool) {
    match plan {
        Some(PlanType::Postgraduate) => (None, true),
        Some(plan) => (Some(config.plan(plan)), has_postgraduate),
        None => (None, has_postgraduate),
    }
}

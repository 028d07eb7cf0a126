use serde::{Deserialize, Serialize};

use crate::config::{LoanPlanConfig, RegionConfig};
use crate::decimal::{Money, Rate};
use crate::repayment::{compute_loan_repayment, period_threshold, repayment_above_threshold};
use crate::types::{RepaymentPeriod, RepaymentSystem};

/// a loan and its outstanding balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPosition {
    pub plan: LoanPlanConfig,
    pub balance: Money,
}

impl LoanPosition {
    pub fn new(plan: LoanPlanConfig, balance: Money) -> Self {
        Self {
            plan,
            balance: balance.non_negative(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.balance.is_positive()
    }
}

/// how one period's repayment is split between undergraduate and
/// postgraduate debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentBreakdown {
    pub system: RepaymentSystem,
    pub undergraduate: Money,
    pub postgraduate: Money,
    pub total: Money,
    /// total repayment over income above the lowest active threshold
    pub effective_rate: Rate,
}

impl RepaymentBreakdown {
    fn none(system: RepaymentSystem) -> Self {
        Self {
            system,
            undergraduate: Money::ZERO,
            postgraduate: Money::ZERO,
            total: Money::ZERO,
            effective_rate: Rate::ZERO,
        }
    }
}

/// Annual repayment for an undergraduate and a postgraduate loan held
/// together, under the region's separate or combined system.
pub fn allocate_combined_or_separate(
    annual_income: Money,
    undergraduate: &LoanPosition,
    postgraduate: &LoanPosition,
    region: &RegionConfig,
) -> RepaymentBreakdown {
    allocate_for_period(
        annual_income,
        RepaymentPeriod::Annual,
        undergraduate,
        postgraduate,
        region,
    )
}

/// as [`allocate_combined_or_separate`] for any pay period. Each share is
/// capped at its loan's balance.
pub fn allocate_for_period(
    period_income: Money,
    period: RepaymentPeriod,
    undergraduate: &LoanPosition,
    postgraduate: &LoanPosition,
    region: &RegionConfig,
) -> RepaymentBreakdown {
    let income = period_income.non_negative();

    match region.system() {
        RepaymentSystem::Separate => {
            let ug = if undergraduate.is_active() {
                compute_loan_repayment(income, &undergraduate.plan, period).min(undergraduate.balance)
            } else {
                Money::ZERO
            };
            let pg = if postgraduate.is_active() {
                postgraduate_repayment(income, period, region).min(postgraduate.balance)
            } else {
                Money::ZERO
            };

            let lowest = lowest_threshold(
                undergraduate.is_active().then_some(undergraduate.plan.threshold),
                postgraduate.is_active().then_some(region.postgraduate_threshold),
                period,
            );

            separate_breakdown(income, ug, pg, lowest)
        }
        RepaymentSystem::Combined => {
            let total_balance = undergraduate.balance + postgraduate.balance;
            if total_balance.is_zero() {
                return RepaymentBreakdown::none(RepaymentSystem::Combined);
            }

            let total = compute_loan_repayment(income, &undergraduate.plan, period).min(total_balance);
            let undergraduate_share = if postgraduate.is_active() {
                (total * Money::ratio(undergraduate.balance, total_balance)).min(undergraduate.balance)
            } else {
                total
            };

            RepaymentBreakdown {
                system: RepaymentSystem::Combined,
                undergraduate: undergraduate_share,
                postgraduate: total - undergraduate_share,
                total,
                effective_rate: effective_rate(
                    income,
                    total,
                    Some(period_threshold(undergraduate.plan.threshold, period)),
                ),
            }
        }
    }
}

/// Repayment when balances are not known, as on a payslip. Shares are
/// uncapped; a combined system charges everything on the undergraduate
/// terms and attributes it to the undergraduate loan.
pub fn allocate_headline(
    period_income: Money,
    period: RepaymentPeriod,
    undergraduate: Option<&LoanPlanConfig>,
    has_postgraduate: bool,
    region: &RegionConfig,
) -> RepaymentBreakdown {
    let income = period_income.non_negative();
    let system = region.system();

    match (undergraduate, system) {
        (Some(plan), RepaymentSystem::Combined) => {
            let total = compute_loan_repayment(income, plan, period);
            RepaymentBreakdown {
                system,
                undergraduate: total,
                postgraduate: Money::ZERO,
                total,
                effective_rate: effective_rate(income, total, Some(period_threshold(plan.threshold, period))),
            }
        }
        (undergraduate, _) => {
            let ug = undergraduate
                .map(|plan| compute_loan_repayment(income, plan, period))
                .unwrap_or(Money::ZERO);
            let pg = if has_postgraduate {
                postgraduate_repayment(income, period, region)
            } else {
                Money::ZERO
            };

            let lowest = lowest_threshold(
                undergraduate.map(|plan| plan.threshold),
                has_postgraduate.then_some(region.postgraduate_threshold),
                period,
            );

            let mut breakdown = separate_breakdown(income, ug, pg, lowest);
            breakdown.system = system;
            breakdown
        }
    }
}

fn postgraduate_repayment(income: Money, period: RepaymentPeriod, region: &RegionConfig) -> Money {
    repayment_above_threshold(
        income,
        period_threshold(region.postgraduate_threshold, period),
        region.postgraduate_rate,
    )
}

fn separate_breakdown(income: Money, ug: Money, pg: Money, lowest: Option<Money>) -> RepaymentBreakdown {
    let total = ug + pg;
    RepaymentBreakdown {
        system: RepaymentSystem::Separate,
        undergraduate: ug,
        postgraduate: pg,
        total,
        effective_rate: effective_rate(income, total, lowest),
    }
}

fn lowest_threshold(ug: Option<Money>, pg: Option<Money>, period: RepaymentPeriod) -> Option<Money> {
    let lowest = match (ug, pg) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    lowest.map(|threshold| period_threshold(threshold, period))
}

/// zero when nothing is above the threshold
fn effective_rate(income: Money, total: Money, threshold: Option<Money>) -> Rate {
    match threshold {
        Some(threshold) => {
            let above = (income - threshold).non_negative();
            Rate::from_decimal(Money::ratio(total, above))
        }
        None => Rate::ZERO,
    }
}

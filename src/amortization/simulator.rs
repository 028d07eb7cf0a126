use log::{debug, trace};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::LoanPlanConfig;
use crate::decimal::{Money, Rate};
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::repayment::monthly_repayment;
use crate::state::LoanBalance;

/// inputs to a single-loan simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub principal: Money,
    /// annual salary in the first year
    pub start_income: Money,
    /// annual salary growth, applied every 12 months
    pub income_growth: Rate,
    pub plan: LoanPlanConfig,
    /// voluntary amount paid on top of the mandatory repayment each month
    pub overpayment: Money,
    /// requested horizon; the plan's write-off term always applies too
    pub month_cap: u32,
}

impl SimulationParams {
    /// run to the plan's write-off with no overpayment
    pub fn new(principal: Money, start_income: Money, income_growth: Rate, plan: LoanPlanConfig) -> Self {
        let month_cap = plan.write_off_months();
        Self {
            principal,
            start_income,
            income_growth,
            plan,
            overpayment: Money::ZERO,
            month_cap,
        }
    }

    pub fn with_overpayment(mut self, overpayment: Money) -> Self {
        self.overpayment = overpayment;
        self
    }

    pub fn with_month_cap(mut self, month_cap: u32) -> Self {
        self.month_cap = month_cap;
        self
    }

    /// the month the loop stops at regardless of balance
    pub fn effective_cap(&self) -> u32 {
        self.month_cap.min(self.plan.write_off_months())
    }

    /// growth factor applied at each anniversary, floored at zero
    pub(crate) fn growth_factor(&self) -> Decimal {
        (Decimal::ONE + self.income_growth.as_decimal()).max(Decimal::ZERO)
    }
}

/// one year of the payoff timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    /// 1 for the first simulated year
    pub year: u32,
    pub salary: Money,
    /// rate charged in the final month of the year
    pub interest_rate: Rate,
    pub interest: Money,
    pub repaid: Money,
    pub closing_balance: Money,
}

/// outcome of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_repaid: Money,
    pub total_interest: Money,
    pub months_elapsed: u32,
    pub paid_off: bool,
    /// balance left when the loop stopped, zero when paid off
    pub final_balance: Money,
    /// amount cancelled at the horizon
    pub written_off: Money,
    pub yearly: Vec<YearSnapshot>,
}

impl SimulationResult {
    pub fn years_elapsed(&self) -> Decimal {
        (Decimal::from(self.months_elapsed) / dec!(12)).round_dp(2)
    }
}

/// Month by month simulation of one loan until it is repaid or the horizon
/// is reached. Interest is added before each month's repayment.
pub fn simulate_amortization(params: &SimulationParams) -> SimulationResult {
    let mut events = EventStore::new();
    simulate_amortization_with_events(params, &mut events)
}

/// as [`simulate_amortization`], recording milestones into `events`
pub fn simulate_amortization_with_events(
    params: &SimulationParams,
    events: &mut EventStore,
) -> SimulationResult {
    let plan = params.plan.plan;
    let cap = params.effective_cap();
    let accrual = AccrualEngine::new(params.plan.interest);
    let growth = params.growth_factor();
    let overpayment = params.overpayment.non_negative();

    let mut income = params.start_income.non_negative();
    let mut balance = LoanBalance::new(params.principal);
    let mut yearly = Vec::new();
    let mut year = YearAccumulator::default();
    let mut previous_rate: Option<Rate> = None;
    let mut repaying = false;

    while balance.months_elapsed < cap && balance.is_open() {
        let month = balance.months_elapsed;

        if month > 0 && month % 12 == 0 {
            let old_salary = income;
            income = income * growth;
            if income != old_salary {
                events.emit(Event::SalaryChanged {
                    plan,
                    month: month + 1,
                    old_salary,
                    new_salary: income,
                });
            }
        }

        let accrued = accrual.accrue_monthly(balance.principal, income);
        if let Some(old_rate) = previous_rate {
            if old_rate != accrued.annual_rate {
                events.emit(Event::InterestRateChanged {
                    plan,
                    month: month + 1,
                    old_rate,
                    new_rate: accrued.annual_rate,
                });
            }
        }
        previous_rate = Some(accrued.annual_rate);
        balance.accrue(accrued.interest_amount);

        let mandatory = monthly_repayment(income, &params.plan);
        let payment = balance.repay(mandatory + overpayment);

        if !repaying && payment.is_positive() {
            repaying = true;
            events.emit(Event::RepaymentsStarted {
                plan,
                month: month + 1,
                monthly_repayment: payment,
            });
        }

        trace!(
            "{} month {}, rate {}, interest {}, paid {}, balance {}",
            plan,
            month + 1,
            accrued.annual_rate,
            accrued.interest_amount,
            payment,
            balance.principal
        );

        balance.advance();
        year.record(accrued.interest_amount, payment, accrued.annual_rate);
        if balance.months_elapsed % 12 == 0 || !balance.is_open() {
            yearly.push(year.close(yearly.len() as u32 + 1, income, balance.principal));
        }
    }

    if !balance.is_open() {
        events.emit(Event::LoanPaidOff {
            plan,
            month: balance.months_elapsed,
            total_repaid: balance.repaid,
            total_interest: balance.interest_accrued,
        });
    } else {
        if year.has_months() {
            yearly.push(year.close(yearly.len() as u32 + 1, income, balance.principal));
        }
        if let Some(amount) = balance.write_off() {
            events.emit(Event::BalanceWrittenOff {
                plan,
                month: balance.months_elapsed,
                amount,
            });
        }
    }

    let paid_off = balance.principal.is_zero();
    let written_off = if paid_off { Money::ZERO } else { balance.principal };

    debug!(
        "{} simulation finished after {} months: repaid {}, interest {}, written off {}",
        plan, balance.months_elapsed, balance.repaid, balance.interest_accrued, written_off
    );

    SimulationResult {
        total_repaid: balance.repaid,
        total_interest: balance.interest_accrued,
        months_elapsed: balance.months_elapsed,
        paid_off,
        final_balance: balance.principal,
        written_off,
        yearly,
    }
}

/// running totals for the current simulated year
#[derive(Debug, Default)]
pub(crate) struct YearAccumulator {
    months: u32,
    interest: Money,
    repaid: Money,
    rate: Rate,
}

impl YearAccumulator {
    pub(crate) fn record(&mut self, interest: Money, repaid: Money, rate: Rate) {
        self.months += 1;
        self.interest += interest;
        self.repaid += repaid;
        self.rate = rate;
    }

    pub(crate) fn add_repaid(&mut self, repaid: Money) {
        self.repaid += repaid;
    }

    pub(crate) fn has_months(&self) -> bool {
        self.months > 0
    }

    pub(crate) fn close(&mut self, year: u32, salary: Money, closing_balance: Money) -> YearSnapshot {
        let snapshot = YearSnapshot {
            year,
            salary,
            interest_rate: self.rate,
            interest: self.interest,
            repaid: self.repaid,
            closing_balance,
        };
        *self = YearAccumulator::default();
        snapshot
    }
}

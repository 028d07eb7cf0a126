use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::simulator::{SimulationResult, YearAccumulator, YearSnapshot};
use crate::config::RegionConfig;
use crate::decimal::{Money, Rate};
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::repayment::{allocate_for_period, LoanPosition};
use crate::state::LoanBalance;
use crate::types::RepaymentPeriod;

/// an undergraduate and a postgraduate loan repaid from one salary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioParams {
    pub undergraduate: LoanPosition,
    pub postgraduate: LoanPosition,
    pub region: RegionConfig,
    pub start_income: Money,
    pub income_growth: Rate,
    /// requested horizon; each loan's write-off term applies on top
    pub month_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub undergraduate: SimulationResult,
    pub postgraduate: SimulationResult,
    pub total_repaid: Money,
    pub total_interest: Money,
    pub total_written_off: Money,
    /// months until both loans were closed
    pub months_elapsed: u32,
}

/// per-loan state while the portfolio runs
struct Track {
    position: LoanPosition,
    balance: LoanBalance,
    accrual: AccrualEngine,
    cap: u32,
    yearly: Vec<YearSnapshot>,
    year: YearAccumulator,
}

impl Track {
    fn new(position: &LoanPosition, month_cap: u32) -> Self {
        Self {
            position: position.clone(),
            balance: LoanBalance::new(position.balance),
            accrual: AccrualEngine::new(position.plan.interest),
            cap: month_cap.min(position.plan.write_off_months()),
            yearly: Vec::new(),
            year: YearAccumulator::default(),
        }
    }

    /// position with the live balance, zero once closed
    fn live_position(&self) -> LoanPosition {
        let balance = if self.balance.is_open() {
            self.balance.principal
        } else {
            Money::ZERO
        };
        LoanPosition::new(self.position.plan.clone(), balance)
    }

    fn close_at_cap(&mut self, income: Money, events: &mut EventStore) {
        if self.balance.is_open() && self.balance.months_elapsed >= self.cap {
            if self.year.has_months() {
                self.yearly
                    .push(self.year.close(self.yearly.len() as u32 + 1, income, self.balance.principal));
            }
            if let Some(amount) = self.balance.write_off() {
                events.emit(Event::BalanceWrittenOff {
                    plan: self.position.plan.plan,
                    month: self.balance.months_elapsed,
                    amount,
                });
            }
        }
    }

    fn into_result(self) -> SimulationResult {
        let paid_off = self.balance.principal.is_zero();
        SimulationResult {
            total_repaid: self.balance.repaid,
            total_interest: self.balance.interest_accrued,
            months_elapsed: self.balance.months_elapsed,
            paid_off,
            final_balance: self.balance.principal,
            written_off: if paid_off { Money::ZERO } else { self.balance.principal },
            yearly: self.yearly,
        }
    }
}

/// Simulate both loans month by month. Each accrues its own interest,
/// the region's system sets how the month's repayment is shared, and each
/// is written off at its own horizon.
pub fn simulate_portfolio(params: &PortfolioParams, events: &mut EventStore) -> PortfolioResult {
    let mut undergraduate = Track::new(&params.undergraduate, params.month_cap);
    let mut postgraduate = Track::new(&params.postgraduate, params.month_cap);
    let growth = (Decimal::ONE + params.income_growth.as_decimal()).max(Decimal::ZERO);
    let mut income = params.start_income.non_negative();
    let mut month = 0u32;

    undergraduate.close_at_cap(income, events);
    postgraduate.close_at_cap(income, events);

    while undergraduate.balance.is_open() || postgraduate.balance.is_open() {
        if month > 0 && month % 12 == 0 {
            income = income * growth;
        }

        for track in [&mut undergraduate, &mut postgraduate] {
            if track.balance.is_open() {
                let accrued = track.accrual.accrue_monthly(track.balance.principal, income);
                track.balance.accrue(accrued.interest_amount);
                track.year.record(accrued.interest_amount, Money::ZERO, accrued.annual_rate);
            }
        }

        let breakdown = allocate_for_period(
            income.per_month(),
            RepaymentPeriod::Monthly,
            &undergraduate.live_position(),
            &postgraduate.live_position(),
            &params.region,
        );

        for (track, share) in [
            (&mut undergraduate, breakdown.undergraduate),
            (&mut postgraduate, breakdown.postgraduate),
        ] {
            if !track.balance.is_open() {
                continue;
            }
            let paid = track.balance.repay(share);
            track.year.add_repaid(paid);
            track.balance.advance();

            if !track.balance.is_open() {
                track
                    .yearly
                    .push(track.year.close(track.yearly.len() as u32 + 1, income, Money::ZERO));
                events.emit(Event::LoanPaidOff {
                    plan: track.position.plan.plan,
                    month: track.balance.months_elapsed,
                    total_repaid: track.balance.repaid,
                    total_interest: track.balance.interest_accrued,
                });
            } else if track.balance.months_elapsed % 12 == 0 {
                let closing = track.balance.principal;
                track
                    .yearly
                    .push(track.year.close(track.yearly.len() as u32 + 1, income, closing));
            }
            track.close_at_cap(income, events);
        }

        month += 1;
    }

    let undergraduate = undergraduate.into_result();
    let postgraduate = postgraduate.into_result();

    debug!(
        "portfolio finished after {} months: undergraduate repaid {}, postgraduate repaid {}",
        month, undergraduate.total_repaid, postgraduate.total_repaid
    );

    PortfolioResult {
        total_repaid: undergraduate.total_repaid + postgraduate.total_repaid,
        total_interest: undergraduate.total_interest + postgraduate.total_interest,
        total_written_off: undergraduate.written_off + postgraduate.written_off,
        months_elapsed: month,
        undergraduate,
        postgraduate,
    }
}

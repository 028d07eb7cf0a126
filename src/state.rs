use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::SimulationPhase;

/// running state of one loan inside the amortization loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalance {
    /// outstanding balance, interest included
    pub principal: Money,
    pub interest_accrued: Money,
    pub repaid: Money,
    pub months_elapsed: u32,
    pub phase: SimulationPhase,
}

impl LoanBalance {
    /// create new loan state; a zero opening balance is already paid off
    pub fn new(principal: Money) -> Self {
        let principal = principal.non_negative();
        let phase = if principal.is_positive() {
            SimulationPhase::Accruing
        } else {
            SimulationPhase::PaidOff
        };

        Self {
            principal,
            interest_accrued: Money::ZERO,
            repaid: Money::ZERO,
            months_elapsed: 0,
            phase,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.phase.is_terminal()
    }

    /// add a month's interest to the balance
    pub fn accrue(&mut self, interest: Money) {
        let interest = interest.non_negative();
        self.principal += interest;
        self.interest_accrued += interest;
    }

    /// Apply a payment, capped at the outstanding balance. Returns the
    /// amount actually taken.
    pub fn repay(&mut self, amount: Money) -> Money {
        let payment = amount.non_negative().min(self.principal);
        self.principal -= payment;
        self.repaid += payment;

        if !self.principal.is_positive() {
            self.principal = Money::ZERO;
            self.phase = SimulationPhase::PaidOff;
        } else if payment.is_positive() {
            self.phase = SimulationPhase::Repaying;
        } else {
            self.phase = SimulationPhase::Accruing;
        }

        payment
    }

    /// close the month
    pub fn advance(&mut self) {
        self.months_elapsed += 1;
    }

    /// Stop at the horizon. Returns the balance written off, if any.
    pub fn write_off(&mut self) -> Option<Money> {
        if self.phase == SimulationPhase::PaidOff || !self.principal.is_positive() {
            return None;
        }
        self.phase = SimulationPhase::WrittenOff;
        Some(self.principal)
    }
}

use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::PlanType;

/// milestones emitted while a loan is simulated. `month` counts from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    RepaymentsStarted {
        plan: PlanType,
        month: u32,
        monthly_repayment: Money,
    },
    LoanPaidOff {
        plan: PlanType,
        month: u32,
        total_repaid: Money,
        total_interest: Money,
    },
    BalanceWrittenOff {
        plan: PlanType,
        month: u32,
        amount: Money,
    },

    // income events
    SalaryChanged {
        plan: PlanType,
        month: u32,
        old_salary: Money,
        new_salary: Money,
    },

    // interest events
    InterestRateChanged {
        plan: PlanType,
        month: u32,
        old_rate: Rate,
        new_rate: Rate,
    },
}

impl Event {
    pub fn month(&self) -> u32 {
        match self {
            Event::RepaymentsStarted { month, .. }
            | Event::LoanPaidOff { month, .. }
            | Event::BalanceWrittenOff { month, .. }
            | Event::SalaryChanged { month, .. }
            | Event::InterestRateChanged { month, .. } => *month,
        }
    }
}

/// event store for collecting events during a simulation
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

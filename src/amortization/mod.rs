pub mod portfolio;
pub mod simulator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::repayment::{annual_repayment, monthly_repayment};

pub use portfolio::{simulate_portfolio, PortfolioParams, PortfolioResult};
pub use simulator::{
    simulate_amortization, simulate_amortization_with_events, SimulationParams, SimulationResult,
    YearSnapshot,
};

/// headline summary of one repayment scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentResult {
    /// mandatory repayment at the starting salary
    pub monthly_repayment: Money,
    pub annual_repayment: Money,
    pub total_repaid: Money,
    pub total_interest: Money,
    /// years until the loop stopped, whether by payoff or write-off
    pub years_to_payoff: Decimal,
    /// true when cleared before write-off
    pub paid_off: bool,
}

impl RepaymentResult {
    pub fn from_simulation(params: &SimulationParams, result: &SimulationResult) -> Self {
        Self {
            monthly_repayment: monthly_repayment(params.start_income, &params.plan),
            annual_repayment: annual_repayment(params.start_income, &params.plan),
            total_repaid: result.total_repaid,
            total_interest: result.total_interest,
            years_to_payoff: result.years_elapsed(),
            paid_off: result.paid_off,
        }
    }
}

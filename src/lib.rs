pub mod amortization;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod format;
pub mod interest;
pub mod payroll;
pub mod repayment;
pub mod scenarios;
pub mod state;
pub mod tax;
pub mod types;
pub mod writeoff;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{EngineError, Result};
pub use events::{Event, EventStore};
pub use config::{BandTable, LoanPlanConfig, RegionConfig, TaxBand, TaxYearConfig};
pub use interest::{
    compute_sliding_interest_rate, AccrualEngine, CompoundingEngine, GrowthProjection,
    InterestRule,
};
pub use tax::{
    compute_income_tax, compute_national_insurance, compute_tax_for_allowance, TaxCode,
    TaxCodeKind,
};
pub use repayment::{
    allocate_combined_or_separate, allocate_headline, annual_repayment, compute_loan_repayment,
    monthly_repayment, LoanPosition, RepaymentBreakdown, RepaymentQuote,
};
pub use amortization::{
    simulate_amortization, simulate_amortization_with_events, simulate_portfolio,
    PortfolioParams, PortfolioResult, RepaymentResult, SimulationParams, SimulationResult,
    YearSnapshot,
};
pub use scenarios::{
    break_even_return, compare_overpay_vs_invest, compute_bonus_impact, BonusAnalysis,
    OverpayInvestComparison, OverpayInvestParams,
};
pub use payroll::{monthly_payroll, payroll_breakdown, PayrollBreakdown};
pub use state::LoanBalance;
pub use types::{
    PlanType, Recommendation, Region, RepaymentPeriod, RepaymentSystem, SimulationPhase,
    TaxJurisdiction, TaxYear,
};
pub use writeoff::{first_repayment_date, remaining_month_cap, write_off_date, years_until_write_off};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;

pub mod bonus;
pub mod overpay_invest;

pub use bonus::{compute_bonus_impact, BonusAnalysis};
pub use overpay_invest::{
    break_even_return, compare_overpay_vs_invest, OverpayInvestComparison, OverpayInvestParams,
    MATERIALITY_BAND,
};

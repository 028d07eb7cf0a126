use thiserror::Error;

use crate::decimal::Rate;

/// errors raised while loading or validating tax-year tables.
///
/// the calculators themselves are total and never return these; they clamp
/// inputs instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid band table {table}: {message}")]
    InvalidBands {
        table: String,
        message: String,
    },

    #[error("invalid tax code: {code}")]
    InvalidTaxCode {
        code: String,
    },

    #[error("unknown loan plan: {label}")]
    UnknownPlan {
        label: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// student loan products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanType {
    /// pre-2012 england/wales, and northern ireland
    Plan1,
    /// england/wales 2012 to 2023 starters
    Plan2,
    /// scotland
    Plan4,
    /// england 2023 onwards
    Plan5,
    /// postgraduate master's and doctoral loans
    Postgraduate,
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanType::Plan1 => "Plan 1",
            PlanType::Plan2 => "Plan 2",
            PlanType::Plan4 => "Plan 4",
            PlanType::Plan5 => "Plan 5",
            PlanType::Postgraduate => "Postgraduate",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for PlanType {
    type Err = EngineError;

    /// accepts `plan2`, `Plan 2`, `2`, `pg` and `postgraduate`, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let key = key.strip_prefix("plan").unwrap_or(&key);

        match key {
            "1" => Ok(PlanType::Plan1),
            "2" => Ok(PlanType::Plan2),
            "4" => Ok(PlanType::Plan4),
            "5" => Ok(PlanType::Plan5),
            "pg" | "postgraduate" | "postgrad" => Ok(PlanType::Postgraduate),
            _ => Err(EngineError::UnknownPlan {
                label: s.to_string(),
            }),
        }
    }
}

/// where the borrower lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    England,
    Wales,
    Scotland,
    NorthernIreland,
}

/// which income tax band table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxJurisdiction {
    /// england, wales and northern ireland
    RestOfUk,
    Scotland,
}

/// the pay period an income figure covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentPeriod {
    Monthly,
    Annual,
}

impl RepaymentPeriod {
    /// number of periods per tax year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            RepaymentPeriod::Monthly => 12,
            RepaymentPeriod::Annual => 1,
        }
    }
}

/// how undergraduate and postgraduate debt are repaid together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentSystem {
    /// each loan has its own threshold and both are repaid at once
    Separate,
    /// one repayment on the undergraduate terms, split by balance
    Combined,
}

/// outcome of an overpay vs invest comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Overpay,
    Invest,
    /// difference within the materiality band
    Neutral,
}

/// amortization loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationPhase {
    /// interest accrues but income is below threshold
    Accruing,
    /// repayments are being collected
    Repaying,
    /// balance reached zero
    PaidOff,
    /// horizon reached with a balance remaining
    WrittenOff,
}

impl SimulationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimulationPhase::PaidOff | SimulationPhase::WrittenOff)
    }
}

/// UK tax year (6 April to 5 April), identified by the year it ends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// tax year containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(year + 1)
        } else {
            TaxYear(year)
        }
    }

    /// 6 April of the previous calendar year
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6)
    }

    /// 5 April
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 5)
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.0 - 1, self.0.rem_euclid(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_year_boundaries() {
        let before = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 4, 6).unwrap();
        let january = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        assert_eq!(TaxYear::from_date(before), TaxYear(2024));
        assert_eq!(TaxYear::from_date(on), TaxYear(2025));
        assert_eq!(TaxYear::from_date(january), TaxYear(2025));
    }

    #[test]
    fn test_tax_year_display() {
        assert_eq!(TaxYear(2025).to_string(), "2024/25");
        assert_eq!(TaxYear(2010).to_string(), "2009/10");
        assert_eq!(TaxYear(2025).start_date(), NaiveDate::from_ymd_opt(2024, 4, 6));
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!("Plan 2".parse::<PlanType>().unwrap(), PlanType::Plan2);
        assert_eq!("plan_4".parse::<PlanType>().unwrap(), PlanType::Plan4);
        assert_eq!("5".parse::<PlanType>().unwrap(), PlanType::Plan5);
        assert_eq!("PG".parse::<PlanType>().unwrap(), PlanType::Postgraduate);
        assert!(matches!(
            "plan 3".parse::<PlanType>(),
            Err(EngineError::UnknownPlan { .. })
        ));
        for plan in [PlanType::Plan1, PlanType::Plan2, PlanType::Plan4, PlanType::Plan5, PlanType::Postgraduate] {
            assert_eq!(plan.to_string().parse::<PlanType>().unwrap(), plan);
        }
    }

    #[test]
    fn test_terminal_phases() {
        assert!(SimulationPhase::PaidOff.is_terminal());
        assert!(SimulationPhase::WrittenOff.is_terminal());
        assert!(!SimulationPhase::Repaying.is_terminal());
    }
}

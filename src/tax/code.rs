use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::types::TaxJurisdiction;

/// what a PAYE tax code tells us about the allowance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaxCodeKind {
    /// prefix with no number, use the configured personal allowance
    Standard,
    /// tax-free amount, number x 10 (1257L -> 12,570; 0T -> 0)
    Allowance(Money),
    /// K code, amount added to taxable income
    Deduction(Money),
    /// all income charged at the named band's rate (BR, D0, D1, ...)
    FlatRate(String),
    /// NT
    NoTax,
}

/// parsed tax code, e.g. `S1257L`, `K475`, `BR`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCode {
    /// set when the code carries an S or C prefix
    pub jurisdiction: Option<TaxJurisdiction>,
    pub kind: TaxCodeKind,
}

impl TaxCode {
    /// standard code for the given allowance
    pub fn with_allowance(allowance: Money) -> Self {
        Self {
            jurisdiction: None,
            kind: TaxCodeKind::Allowance(allowance),
        }
    }

    pub fn parse(code: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTaxCode {
            code: code.to_string(),
        };

        let normalized: String = code
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect::<String>()
            .to_ascii_uppercase();

        // emergency markers do not change an annual calculation
        let mut body = normalized.as_str();
        for marker in ["W1", "M1", "X"] {
            if let Some(stripped) = body.strip_suffix(marker) {
                if !stripped.is_empty() {
                    body = stripped;
                    break;
                }
            }
        }

        let (jurisdiction, body) = match body.chars().next() {
            Some('S') => (Some(TaxJurisdiction::Scotland), &body[1..]),
            Some('C') => (Some(TaxJurisdiction::RestOfUk), &body[1..]),
            _ => (None, body),
        };
        let scottish = jurisdiction == Some(TaxJurisdiction::Scotland);

        let kind = match body {
            "" if jurisdiction.is_some() => TaxCodeKind::Standard,
            "" => return Err(invalid()),
            "NT" => TaxCodeKind::NoTax,
            "BR" => TaxCodeKind::FlatRate("basic".to_string()),
            "D0" if scottish => TaxCodeKind::FlatRate("intermediate".to_string()),
            "D0" => TaxCodeKind::FlatRate("higher".to_string()),
            "D1" if scottish => TaxCodeKind::FlatRate("higher".to_string()),
            "D1" => TaxCodeKind::FlatRate("additional".to_string()),
            "D2" if scottish => TaxCodeKind::FlatRate("advanced".to_string()),
            "D3" if scottish => TaxCodeKind::FlatRate("top".to_string()),
            _ if body.starts_with('K') => {
                let amount = parse_tens(&body[1..]).ok_or_else(invalid)?;
                TaxCodeKind::Deduction(amount)
            }
            _ => {
                let suffix = body.chars().last().ok_or_else(invalid)?;
                if !matches!(suffix, 'L' | 'M' | 'N' | 'T') {
                    return Err(invalid());
                }
                let amount = parse_tens(&body[..body.len() - 1]).ok_or_else(invalid)?;
                TaxCodeKind::Allowance(amount)
            }
        };

        Ok(Self { jurisdiction, kind })
    }
}

impl FromStr for TaxCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        TaxCode::parse(s)
    }
}

/// the numeric part of a code is the amount divided by ten
fn parse_tens(digits: &str) -> Option<Money> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<i64>()
        .ok()
        .map(|n| Money::from_major(n.saturating_mul(10)))
}

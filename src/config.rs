use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{EngineError, Result};
use crate::interest::InterestRule;
use crate::types::{PlanType, Region, RepaymentSystem, TaxJurisdiction, TaxYear};

/// one band of a progressive tax or NI table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBand {
    pub name: String,
    pub lower: Money,
    pub rate: Rate,
    /// none for the top band
    pub upper: Option<Money>,
}

impl TaxBand {
    pub fn new(name: &str, lower: Money, rate: Rate, upper: Option<Money>) -> Self {
        Self {
            name: name.to_string(),
            lower,
            rate,
            upper,
        }
    }

    /// width of the band, none when unbounded
    pub fn width(&self) -> Option<Money> {
        self.upper.map(|upper| (upper - self.lower).non_negative())
    }
}

/// ordered, contiguous band table for one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<TaxBand>,
}

impl BandTable {
    pub fn new(bands: Vec<TaxBand>) -> Self {
        Self { bands }
    }

    /// bands after the leading zero-rate allowance band(s)
    pub fn chargeable_bands(&self) -> &[TaxBand] {
        let skip = self
            .bands
            .iter()
            .take_while(|band| band.rate.as_decimal().is_zero())
            .count();
        &self.bands[skip..]
    }

    /// find a band by name, ignoring case
    pub fn band_named(&self, name: &str) -> Option<&TaxBand> {
        self.bands
            .iter()
            .find(|band| band.name.eq_ignore_ascii_case(name))
    }

    /// highest marginal rate in the table
    pub fn top_rate(&self) -> Rate {
        self.bands
            .iter()
            .map(|band| band.rate)
            .max()
            .unwrap_or(Rate::ZERO)
    }

    /// check ordering, contiguity and that only the last band is unbounded
    pub fn validate(&self, table: &str) -> Result<()> {
        let invalid = |message: String| EngineError::InvalidBands {
            table: table.to_string(),
            message,
        };

        let last_index = match self.bands.len() {
            0 => return Err(invalid("table has no bands".to_string())),
            n => n - 1,
        };

        for (index, band) in self.bands.iter().enumerate() {
            if band.lower.is_negative() {
                return Err(invalid(format!("band {} starts below zero", band.name)));
            }
            if band.rate.as_decimal() < Decimal::ZERO || band.rate > Rate::ONE {
                return Err(invalid(format!("band {} has rate {}", band.name, band.rate)));
            }
            match band.upper {
                None if index != last_index => {
                    return Err(invalid(format!("band {} is unbounded but not last", band.name)));
                }
                Some(_) if index == last_index => {
                    return Err(invalid(format!("final band {} has an upper limit", band.name)));
                }
                Some(upper) if upper <= band.lower => {
                    return Err(invalid(format!("band {} has upper limit below its lower threshold", band.name)));
                }
                _ => {}
            }
            if let Some(next) = self.bands.get(index + 1) {
                if band.upper != Some(next.lower) {
                    return Err(invalid(format!(
                        "band {} does not meet band {}",
                        band.name, next.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// repayment and interest terms for one loan plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPlanConfig {
    pub plan: PlanType,
    /// annual income threshold
    pub threshold: Money,
    pub repayment_rate: Rate,
    pub interest: InterestRule,
    pub write_off_years: u32,
}

impl LoanPlanConfig {
    /// monthly threshold (annual / 12)
    pub fn monthly_threshold(&self) -> Money {
        self.threshold.per_month()
    }

    /// write-off horizon in months
    pub fn write_off_months(&self) -> u32 {
        self.write_off_years.saturating_mul(12)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_negative() {
            return Err(EngineError::InvalidConfiguration {
                message: format!("{} threshold is negative", self.plan),
            });
        }
        if self.repayment_rate.as_decimal() < Decimal::ZERO || self.repayment_rate > Rate::ONE {
            return Err(EngineError::InvalidConfiguration {
                message: format!("{} repayment rate {} out of range", self.plan, self.repayment_rate),
            });
        }
        if self.write_off_years == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: format!("{} has no write-off horizon", self.plan),
            });
        }
        self.interest.validate()
    }
}

/// regional rules for holding undergraduate and postgraduate debt together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub region: Region,
    pub tax_jurisdiction: TaxJurisdiction,
    /// true when both loans are merged into one repayment
    pub combined_postgraduate: bool,
    pub postgraduate_threshold: Money,
    pub postgraduate_rate: Rate,
}

impl RegionConfig {
    pub fn system(&self) -> RepaymentSystem {
        if self.combined_postgraduate {
            RepaymentSystem::Combined
        } else {
            RepaymentSystem::Separate
        }
    }
}

/// income tax tables by jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxTables {
    pub rest_of_uk: BandTable,
    pub scotland: BandTable,
}

/// plan terms for every product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTable {
    pub plan1: LoanPlanConfig,
    pub plan2: LoanPlanConfig,
    pub plan4: LoanPlanConfig,
    pub plan5: LoanPlanConfig,
    pub postgraduate: LoanPlanConfig,
}

/// regional rules for every region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    pub england: RegionConfig,
    pub wales: RegionConfig,
    pub scotland: RegionConfig,
    pub northern_ireland: RegionConfig,
}

/// all policy data for one tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: TaxYear,
    pub personal_allowance: Money,
    /// code applied when a supplied code cannot be parsed
    pub standard_tax_code: String,
    pub income_tax: IncomeTaxTables,
    pub national_insurance: BandTable,
    pub plans: PlanTable,
    pub regions: RegionTable,
}

impl TaxYearConfig {
    pub fn income_tax_bands(&self, jurisdiction: TaxJurisdiction) -> &BandTable {
        match jurisdiction {
            TaxJurisdiction::RestOfUk => &self.income_tax.rest_of_uk,
            TaxJurisdiction::Scotland => &self.income_tax.scotland,
        }
    }

    pub fn plan(&self, plan: PlanType) -> &LoanPlanConfig {
        match plan {
            PlanType::Plan1 => &self.plans.plan1,
            PlanType::Plan2 => &self.plans.plan2,
            PlanType::Plan4 => &self.plans.plan4,
            PlanType::Plan5 => &self.plans.plan5,
            PlanType::Postgraduate => &self.plans.postgraduate,
        }
    }

    pub fn region(&self, region: Region) -> &RegionConfig {
        match region {
            Region::England => &self.regions.england,
            Region::Wales => &self.regions.wales,
            Region::Scotland => &self.regions.scotland,
            Region::NorthernIreland => &self.regions.northern_ireland,
        }
    }

    /// load tables from json and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TaxYearConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.personal_allowance.is_negative() {
            return Err(EngineError::InvalidConfiguration {
                message: "personal allowance is negative".to_string(),
            });
        }

        self.income_tax.rest_of_uk.validate("income tax (rest of UK)")?;
        self.income_tax.scotland.validate("income tax (Scotland)")?;
        self.national_insurance.validate("national insurance")?;

        for plan in [
            &self.plans.plan1,
            &self.plans.plan2,
            &self.plans.plan4,
            &self.plans.plan5,
            &self.plans.postgraduate,
        ] {
            plan.validate()?;
        }

        for (expected, region) in [
            (Region::England, &self.regions.england),
            (Region::Wales, &self.regions.wales),
            (Region::Scotland, &self.regions.scotland),
            (Region::NorthernIreland, &self.regions.northern_ireland),
        ] {
            if region.region != expected {
                return Err(EngineError::InvalidConfiguration {
                    message: format!("region entry {:?} holds rules for {:?}", expected, region.region),
                });
            }
        }

        Ok(())
    }

    /// 2024/25 tables
    pub fn uk_2024_25() -> Self {
        let rpi = Rate::from_decimal(dec!(0.043));
        let base_rate = Rate::from_decimal(dec!(0.05));

        Self {
            tax_year: TaxYear(2025),
            personal_allowance: Money::from_major(12_570),
            standard_tax_code: "1257L".to_string(),
            income_tax: IncomeTaxTables {
                rest_of_uk: rest_of_uk_income_tax(),
                scotland: scottish_income_tax(14_876, 26_561),
            },
            national_insurance: employee_national_insurance(),
            plans: PlanTable {
                plan1: LoanPlanConfig {
                    plan: PlanType::Plan1,
                    threshold: Money::from_major(24_990),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::LesserOf {
                        rpi,
                        base_rate,
                        base_rate_margin: Rate::from_percentage(1),
                    },
                    write_off_years: 25,
                },
                plan2: LoanPlanConfig {
                    plan: PlanType::Plan2,
                    threshold: Money::from_major(27_295),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::Sliding {
                        rpi,
                        uplift: Rate::from_percentage(3),
                        lower_income: Money::from_major(27_295),
                        upper_income: Money::from_major(49_130),
                    },
                    write_off_years: 30,
                },
                plan4: LoanPlanConfig {
                    plan: PlanType::Plan4,
                    threshold: Money::from_major(31_395),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::LesserOf {
                        rpi,
                        base_rate,
                        base_rate_margin: Rate::from_percentage(1),
                    },
                    write_off_years: 30,
                },
                plan5: LoanPlanConfig {
                    plan: PlanType::Plan5,
                    threshold: Money::from_major(25_000),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::Fixed { rate: rpi },
                    write_off_years: 40,
                },
                postgraduate: LoanPlanConfig {
                    plan: PlanType::Postgraduate,
                    threshold: Money::from_major(21_000),
                    repayment_rate: Rate::from_percentage(6),
                    interest: InterestRule::Fixed {
                        rate: rpi + Rate::from_percentage(3),
                    },
                    write_off_years: 30,
                },
            },
            regions: region_table(Money::from_major(21_000), Rate::from_percentage(6)),
        }
    }

    /// 2025/26 tables
    pub fn uk_2025_26() -> Self {
        let rpi = Rate::from_decimal(dec!(0.032));
        let base_rate = Rate::from_decimal(dec!(0.04));

        Self {
            tax_year: TaxYear(2026),
            personal_allowance: Money::from_major(12_570),
            standard_tax_code: "1257L".to_string(),
            income_tax: IncomeTaxTables {
                rest_of_uk: rest_of_uk_income_tax(),
                scotland: scottish_income_tax(15_397, 27_491),
            },
            national_insurance: employee_national_insurance(),
            plans: PlanTable {
                plan1: LoanPlanConfig {
                    plan: PlanType::Plan1,
                    threshold: Money::from_major(26_065),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::LesserOf {
                        rpi,
                        base_rate,
                        base_rate_margin: Rate::from_percentage(1),
                    },
                    write_off_years: 25,
                },
                plan2: LoanPlanConfig {
                    plan: PlanType::Plan2,
                    threshold: Money::from_major(28_470),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::Sliding {
                        rpi,
                        uplift: Rate::from_percentage(3),
                        lower_income: Money::from_major(28_470),
                        upper_income: Money::from_major(51_245),
                    },
                    write_off_years: 30,
                },
                plan4: LoanPlanConfig {
                    plan: PlanType::Plan4,
                    threshold: Money::from_major(32_745),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::LesserOf {
                        rpi,
                        base_rate,
                        base_rate_margin: Rate::from_percentage(1),
                    },
                    write_off_years: 30,
                },
                plan5: LoanPlanConfig {
                    plan: PlanType::Plan5,
                    threshold: Money::from_major(25_000),
                    repayment_rate: Rate::from_percentage(9),
                    interest: InterestRule::Fixed { rate: rpi },
                    write_off_years: 40,
                },
                postgraduate: LoanPlanConfig {
                    plan: PlanType::Postgraduate,
                    threshold: Money::from_major(21_000),
                    repayment_rate: Rate::from_percentage(6),
                    interest: InterestRule::Fixed {
                        rate: rpi + Rate::from_percentage(3),
                    },
                    write_off_years: 30,
                },
            },
            regions: region_table(Money::from_major(21_000), Rate::from_percentage(6)),
        }
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::uk_2024_25()
    }
}

fn rest_of_uk_income_tax() -> BandTable {
    BandTable::new(vec![
        TaxBand::new("personal allowance", Money::ZERO, Rate::ZERO, Some(Money::from_major(12_570))),
        TaxBand::new("basic", Money::from_major(12_570), Rate::from_percentage(20), Some(Money::from_major(50_270))),
        TaxBand::new("higher", Money::from_major(50_270), Rate::from_percentage(40), Some(Money::from_major(125_140))),
        TaxBand::new("additional", Money::from_major(125_140), Rate::from_percentage(45), None),
    ])
}

/// scottish bands; only the starter and basic upper limits moved between
/// recent years
fn scottish_income_tax(starter_upper: i64, basic_upper: i64) -> BandTable {
    BandTable::new(vec![
        TaxBand::new("personal allowance", Money::ZERO, Rate::ZERO, Some(Money::from_major(12_570))),
        TaxBand::new("starter", Money::from_major(12_570), Rate::from_percentage(19), Some(Money::from_major(starter_upper))),
        TaxBand::new("basic", Money::from_major(starter_upper), Rate::from_percentage(20), Some(Money::from_major(basic_upper))),
        TaxBand::new("intermediate", Money::from_major(basic_upper), Rate::from_percentage(21), Some(Money::from_major(43_662))),
        TaxBand::new("higher", Money::from_major(43_662), Rate::from_percentage(42), Some(Money::from_major(75_000))),
        TaxBand::new("advanced", Money::from_major(75_000), Rate::from_percentage(45), Some(Money::from_major(125_140))),
        TaxBand::new("top", Money::from_major(125_140), Rate::from_percentage(48), None),
    ])
}

/// class 1 employee contributions
fn employee_national_insurance() -> BandTable {
    BandTable::new(vec![
        TaxBand::new("below primary threshold", Money::ZERO, Rate::ZERO, Some(Money::from_major(12_570))),
        TaxBand::new("main", Money::from_major(12_570), Rate::from_percentage(8), Some(Money::from_major(50_270))),
        TaxBand::new("upper", Money::from_major(50_270), Rate::from_percentage(2), None),
    ])
}

/// england and wales repay separately; scotland and northern ireland combine
fn region_table(postgraduate_threshold: Money, postgraduate_rate: Rate) -> RegionTable {
    let region = |region: Region, tax_jurisdiction: TaxJurisdiction, combined: bool| RegionConfig {
        region,
        tax_jurisdiction,
        combined_postgraduate: combined,
        postgraduate_threshold,
        postgraduate_rate,
    };

    RegionTable {
        england: region(Region::England, TaxJurisdiction::RestOfUk, false),
        wales: region(Region::Wales, TaxJurisdiction::RestOfUk, false),
        scotland: region(Region::Scotland, TaxJurisdiction::Scotland, true),
        northern_ireland: region(Region::NorthernIreland, TaxJurisdiction::RestOfUk, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(TaxYearConfig::uk_2024_25().validate().is_ok());
        assert!(TaxYearConfig::uk_2025_26().validate().is_ok());
    }

    #[test]
    fn test_chargeable_bands_skip_allowance() {
        let config = TaxYearConfig::uk_2024_25();
        let bands = config.income_tax_bands(TaxJurisdiction::RestOfUk).chargeable_bands();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].name, "basic");
        assert_eq!(bands[0].width(), Some(Money::from_major(37_700)));
        assert_eq!(bands[2].width(), None);
    }

    #[test]
    fn test_gap_between_bands_rejected() {
        let table = BandTable::new(vec![
            TaxBand::new("zero", Money::ZERO, Rate::ZERO, Some(Money::from_major(10_000))),
            TaxBand::new("basic", Money::from_major(11_000), Rate::from_percentage(20), None),
        ]);
        let err = table.validate("test").unwrap_err();
        assert!(matches!(err, EngineError::InvalidBands { .. }));
    }

    #[test]
    fn test_bounded_final_band_rejected() {
        let table = BandTable::new(vec![
            TaxBand::new("basic", Money::ZERO, Rate::from_percentage(20), Some(Money::from_major(10_000))),
        ]);
        assert!(table.validate("test").is_err());
        assert!(BandTable::new(Vec::new()).validate("empty").is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_tables() {
        let config = TaxYearConfig::uk_2025_26();
        let json = config.to_json().unwrap();
        let loaded = TaxYearConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_json_tables_rejected() {
        let mut config = TaxYearConfig::uk_2024_25();
        config.plans.plan5.write_off_years = 0;
        let json = config.to_json().unwrap();
        assert!(matches!(
            TaxYearConfig::from_json(&json),
            Err(EngineError::InvalidConfiguration { .. })
        ));
        assert!(matches!(TaxYearConfig::from_json("{"), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_region_systems() {
        let config = TaxYearConfig::uk_2024_25();
        assert_eq!(config.region(Region::England).system(), RepaymentSystem::Separate);
        assert_eq!(config.region(Region::Scotland).system(), RepaymentSystem::Combined);
        assert_eq!(config.region(Region::Scotland).tax_jurisdiction, TaxJurisdiction::Scotland);
    }
}

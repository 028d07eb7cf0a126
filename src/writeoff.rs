use chrono::{Datelike, Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::config::LoanPlanConfig;
use crate::types::TaxYear;

/// Repayments start on the first 6 April after leaving the course.
pub fn first_repayment_date(graduation: NaiveDate) -> Option<NaiveDate> {
    TaxYear(TaxYear::from_date(graduation).0 + 1).start_date()
}

/// Date the remaining balance is cancelled: the plan's term after the
/// first repayment, clamped to the end of the month (29 February becomes
/// 28 February in a non-leap year).
pub fn write_off_date(first_repayment: NaiveDate, plan: &LoanPlanConfig) -> Option<NaiveDate> {
    first_repayment.checked_add_months(Months::new(plan.write_off_months()))
}

/// whole years left before write-off, zero once the date has passed
pub fn years_until_write_off(
    first_repayment: NaiveDate,
    plan: &LoanPlanConfig,
    time: &SafeTimeProvider,
) -> u32 {
    let today = time.now().date_naive();
    match write_off_date(first_repayment, plan) {
        Some(date) if date > today => {
            let mut years = date.year() - today.year();
            if (date.month(), date.day()) < (today.month(), today.day()) {
                years -= 1;
            }
            years.max(0) as u32
        }
        _ => 0,
    }
}

/// Whole months left before write-off, for use as a simulation cap. Never
/// more than the plan's full term.
pub fn remaining_month_cap(
    first_repayment: NaiveDate,
    plan: &LoanPlanConfig,
    time: &SafeTimeProvider,
) -> u32 {
    let today = time.now().date_naive();
    let Some(date) = write_off_date(first_repayment, plan) else {
        return plan.write_off_months();
    };
    if date <= today {
        return 0;
    }

    let mut months = (date.year() - today.year()) * 12 + date.month() as i32 - today.month() as i32;
    if date.day() < today.day() {
        months -= 1;
    }
    (months.max(0) as u32).min(plan.write_off_months())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxYearConfig;
    use crate::types::PlanType;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_first_repayment_is_next_april() {
        assert_eq!(first_repayment_date(date(2024, 6, 30)), Some(date(2025, 4, 6)));
        assert_eq!(first_repayment_date(date(2025, 1, 15)), Some(date(2025, 4, 6)));
        assert_eq!(first_repayment_date(date(2025, 4, 6)), Some(date(2026, 4, 6)));
        assert_eq!(first_repayment_date(date(2025, 4, 5)), Some(date(2025, 4, 6)));
    }

    #[test]
    fn test_write_off_date_by_plan() {
        let config = TaxYearConfig::uk_2024_25();
        let start = date(2025, 4, 6);

        assert_eq!(write_off_date(start, config.plan(PlanType::Plan2)), Some(date(2055, 4, 6)));
        assert_eq!(write_off_date(start, config.plan(PlanType::Plan5)), Some(date(2065, 4, 6)));
        assert_eq!(write_off_date(start, config.plan(PlanType::Plan1)), Some(date(2050, 4, 6)));
    }

    #[test]
    fn test_leap_day_clamped() {
        let mut plan = TaxYearConfig::uk_2024_25().plan(PlanType::Plan2).clone();
        plan.write_off_years = 1;
        assert_eq!(write_off_date(date(2024, 2, 29), &plan), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_years_and_months_remaining() {
        let config = TaxYearConfig::uk_2024_25();
        let plan = config.plan(PlanType::Plan2);
        let start = date(2025, 4, 6);

        let time = at(2030, 1, 1);
        assert_eq!(years_until_write_off(start, plan, &time), 25);
        assert_eq!(remaining_month_cap(start, plan, &time), 303);

        let before_start = at(2020, 1, 1);
        assert_eq!(remaining_month_cap(start, plan, &before_start), 360);

        let after = at(2056, 1, 1);
        assert_eq!(years_until_write_off(start, plan, &after), 0);
        assert_eq!(remaining_month_cap(start, plan, &after), 0);
    }
}

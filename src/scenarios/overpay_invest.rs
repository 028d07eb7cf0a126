use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{simulate_amortization, SimulationParams, SimulationResult};
use crate::decimal::{Money, Rate};
use crate::interest::{CompoundingEngine, GrowthProjection};
use crate::types::Recommendation;

/// differences smaller than this either way are reported as neutral
pub const MATERIALITY_BAND: Money = Money::from_whole_pounds(1_000);

const BREAK_EVEN_ITERATIONS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpayInvestParams {
    /// the loan on standard repayments; its own overpayment is ignored
    pub loan: SimulationParams,
    /// monthly amount either overpaid or invested
    pub monthly_amount: Money,
    pub investment_return: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpayInvestComparison {
    pub standard: SimulationResult,
    pub with_overpayment: SimulationResult,
    /// the same monthly amount invested for the standard run's duration
    pub investment: GrowthProjection,
    pub interest_saved: Money,
    /// standard months less overpaid months
    pub months_saved: i64,
    /// extra repaid by overpaying; negative when it clears the loan sooner
    pub extra_paid: Money,
    /// investment gain less interest saved
    pub net_benefit: Money,
    pub recommendation: Recommendation,
}

/// Compare overpaying the loan against investing the same amount.
pub fn compare_overpay_vs_invest(params: &OverpayInvestParams) -> OverpayInvestComparison {
    let monthly_amount = params.monthly_amount.non_negative();
    let standard = simulate_amortization(&params.loan.clone().with_overpayment(Money::ZERO));
    let with_overpayment = simulate_amortization(&params.loan.clone().with_overpayment(monthly_amount));

    let investment = CompoundingEngine::new(params.investment_return).grow_with_contributions(
        Money::ZERO,
        monthly_amount,
        standard.months_elapsed,
    );

    let interest_saved = standard.total_interest - with_overpayment.total_interest;
    let extra_paid = with_overpayment.total_repaid - standard.total_repaid;
    let net_benefit = investment.gain - interest_saved;
    let recommendation = classify(&standard, &with_overpayment, extra_paid, &investment, net_benefit);

    debug!(
        "overpay {} a month: interest saved {}, investment gain {}, recommendation {:?}",
        monthly_amount, interest_saved, investment.gain, recommendation
    );

    OverpayInvestComparison {
        months_saved: i64::from(standard.months_elapsed) - i64::from(with_overpayment.months_elapsed),
        standard,
        with_overpayment,
        investment,
        interest_saved,
        extra_paid,
        net_benefit,
        recommendation,
    }
}

fn classify(
    standard: &SimulationResult,
    with_overpayment: &SimulationResult,
    extra_paid: Money,
    investment: &GrowthProjection,
    net_benefit: Money,
) -> Recommendation {
    // written off either way, so overpaid money is lost
    if !with_overpayment.paid_off {
        return Recommendation::Invest;
    }

    if !standard.paid_off {
        return if extra_paid > investment.final_value {
            Recommendation::Invest
        } else {
            Recommendation::Overpay
        };
    }

    if net_benefit > MATERIALITY_BAND {
        Recommendation::Invest
    } else if net_benefit < -MATERIALITY_BAND {
        Recommendation::Overpay
    } else {
        Recommendation::Neutral
    }
}

/// Annual return at which investing gains exactly the interest that
/// overpaying saves, searched on [0%, 50%]. Zero when overpaying saves
/// nothing or no return in range catches up.
pub fn break_even_return(params: &OverpayInvestParams) -> Rate {
    let monthly_amount = params.monthly_amount.non_negative();
    let standard = simulate_amortization(&params.loan.clone().with_overpayment(Money::ZERO));
    let with_overpayment = simulate_amortization(&params.loan.clone().with_overpayment(monthly_amount));
    let interest_saved = standard.total_interest - with_overpayment.total_interest;

    if !interest_saved.is_positive() || standard.months_elapsed == 0 {
        return Rate::ZERO;
    }

    let gain_at = |rate: Decimal| {
        CompoundingEngine::new(Rate::from_decimal(rate))
            .grow_with_contributions(Money::ZERO, monthly_amount, standard.months_elapsed)
            .gain
    };

    let mut low = Decimal::ZERO;
    let mut high = dec!(0.5);
    if gain_at(high) < interest_saved {
        return Rate::ZERO;
    }

    for _ in 0..BREAK_EVEN_ITERATIONS {
        let mid = (low + high) / dec!(2);
        if gain_at(mid) < interest_saved {
            low = mid;
        } else {
            high = mid;
        }
    }

    Rate::from_decimal(((low + high) / dec!(2)).round_dp(6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoanPlanConfig, TaxYearConfig};
    use crate::interest::InterestRule;
    use crate::types::PlanType;

    fn plan(rate: Decimal) -> LoanPlanConfig {
        let mut plan = TaxYearConfig::uk_2024_25().plan(PlanType::Plan2).clone();
        plan.interest = InterestRule::Fixed {
            rate: Rate::from_decimal(rate),
        };
        plan
    }

    fn params(principal: i64, salary: i64, rate: Decimal, amount: i64, investment_return: Decimal) -> OverpayInvestParams {
        OverpayInvestParams {
            loan: SimulationParams::new(
                Money::from_major(principal),
                Money::from_major(salary),
                Rate::ZERO,
                plan(rate),
            ),
            monthly_amount: Money::from_major(amount),
            investment_return: Rate::from_decimal(investment_return),
        }
    }

    #[test]
    fn test_written_off_either_way_invests() {
        // below threshold, balance never shrinks
        let comparison = compare_overpay_vs_invest(&params(60_000, 20_000, dec!(0.06), 50, dec!(0.05)));

        assert!(!comparison.standard.paid_off);
        assert!(!comparison.with_overpayment.paid_off);
        assert_eq!(comparison.recommendation, Recommendation::Invest);
    }

    #[test]
    fn test_overpaying_to_payoff_compares_terminal_value() {
        // 50,000 at 0% with no mandatory repayment; 200 a month clears it in
        // 250 months against 360 months of investing
        let comparison = compare_overpay_vs_invest(&params(50_000, 20_000, dec!(0), 200, dec!(0)));

        assert!(!comparison.standard.paid_off);
        assert!(comparison.with_overpayment.paid_off);
        assert_eq!(comparison.extra_paid, Money::from_major(50_000));
        assert_eq!(comparison.investment.final_value, Money::from_major(72_000));
        assert_eq!(comparison.recommendation, Recommendation::Overpay);
        assert_eq!(comparison.months_saved, 110);
    }

    #[test]
    fn test_both_paid_off_uses_materiality_band() {
        // zero-interest loan saves nothing and the small gain stays in the band
        let comparison = compare_overpay_vs_invest(&params(5_000, 60_000, dec!(0), 100, dec!(0.07)));

        assert!(comparison.standard.paid_off && comparison.with_overpayment.paid_off);
        assert_eq!(comparison.interest_saved, Money::ZERO);
        assert!(comparison.investment.gain < MATERIALITY_BAND);
        assert_eq!(comparison.recommendation, Recommendation::Neutral);

        let expensive = compare_overpay_vs_invest(&params(30_000, 80_000, dec!(0.12), 300, dec!(0)));
        assert!(expensive.standard.paid_off);
        assert!(expensive.interest_saved > MATERIALITY_BAND);
        assert_eq!(expensive.recommendation, Recommendation::Overpay);
    }

    #[test]
    fn test_overpaying_to_payoff_loses_to_investing() {
        // 200 a month clears 50,000 in 250 months, but a -50% pot fed the
        // same 200 for 360 months never gets near 50,000
        let comparison = compare_overpay_vs_invest(&params(50_000, 20_000, dec!(0), 200, dec!(-0.5)));

        assert!(!comparison.standard.paid_off);
        assert!(comparison.with_overpayment.paid_off);
        assert_eq!(comparison.extra_paid, Money::from_major(50_000));
        assert!(comparison.investment.final_value < comparison.extra_paid);
        assert_eq!(comparison.recommendation, Recommendation::Invest);
    }

    #[test]
    fn test_both_paid_off_large_gain_invests() {
        // 40,000 salary clears 30,000 at 0% in 315 months; 100 a month at 7%
        // over that term gains far more than the band
        let comparison = compare_overpay_vs_invest(&params(30_000, 40_000, dec!(0), 100, dec!(0.07)));

        assert!(comparison.standard.paid_off && comparison.with_overpayment.paid_off);
        assert_eq!(comparison.interest_saved, Money::ZERO);
        assert!(comparison.net_benefit > MATERIALITY_BAND);
        assert_eq!(comparison.recommendation, Recommendation::Invest);
    }

    fn finished(paid_off: bool) -> SimulationResult {
        SimulationResult {
            total_repaid: Money::ZERO,
            total_interest: Money::ZERO,
            months_elapsed: 120,
            paid_off,
            final_balance: Money::ZERO,
            written_off: Money::ZERO,
            yearly: Vec::new(),
        }
    }

    fn projection(final_value: Money) -> GrowthProjection {
        GrowthProjection {
            months: 120,
            total_contributed: Money::ZERO,
            final_value,
            gain: final_value,
        }
    }

    #[test]
    fn test_classification_rules() {
        let paid = finished(true);
        let open = finished(false);
        let pot = projection(Money::from_major(10_000));

        assert_eq!(classify(&paid, &open, Money::ZERO, &pot, Money::ZERO), Recommendation::Invest);
        assert_eq!(classify(&open, &open, Money::ZERO, &pot, -MATERIALITY_BAND * dec!(10)), Recommendation::Invest);

        // tipped to paid off: extra paid against the pot's terminal value
        let extra = Money::from_major(10_000);
        assert_eq!(classify(&open, &paid, extra, &pot, Money::ZERO), Recommendation::Overpay);
        assert_eq!(classify(&open, &paid, extra + Money::PENNY, &pot, Money::ZERO), Recommendation::Invest);
    }

    #[test]
    fn test_materiality_band_edges_are_neutral() {
        let paid = finished(true);
        let pot = projection(Money::ZERO);
        let at = |net_benefit: Money| classify(&paid, &paid, Money::ZERO, &pot, net_benefit);

        assert_eq!(at(MATERIALITY_BAND), Recommendation::Neutral);
        assert_eq!(at(-MATERIALITY_BAND), Recommendation::Neutral);
        assert_eq!(at(MATERIALITY_BAND + Money::PENNY), Recommendation::Invest);
        assert_eq!(at(-MATERIALITY_BAND - Money::PENNY), Recommendation::Overpay);
    }

    #[test]
    fn test_extreme_investment_return_is_clamped() {
        let plan = TaxYearConfig::uk_2024_25().plan(PlanType::Plan5).clone();
        let comparison = compare_overpay_vs_invest(&OverpayInvestParams {
            loan: SimulationParams::new(Money::from_major(60_000), Money::from_major(20_000), Rate::ZERO, plan),
            monthly_amount: Money::from_major(100),
            investment_return: Rate::from_decimal(dec!(5)),
        });

        assert_eq!(comparison.standard.months_elapsed, 480);
        assert!(comparison.investment.gain.is_positive());
        assert_eq!(comparison.recommendation, Recommendation::Invest);
    }

    #[test]
    fn test_extra_paid_negative_when_cleared_sooner() {
        let comparison = compare_overpay_vs_invest(&params(20_000, 45_000, dec!(0.06), 200, dec!(0.04)));
        assert!(comparison.extra_paid.is_negative());
        assert!(comparison.interest_saved.is_positive());
        assert_eq!(comparison.extra_paid, -comparison.interest_saved);
    }

    #[test]
    fn test_break_even_return() {
        let p = params(20_000, 45_000, dec!(0.06), 200, dec!(0.04));
        let rate = break_even_return(&p);

        assert!(rate > Rate::ZERO);
        assert!(rate < Rate::from_decimal(dec!(0.5)));

        let at_break_even = compare_overpay_vs_invest(&OverpayInvestParams {
            investment_return: rate,
            ..p.clone()
        });
        assert!(at_break_even.net_benefit.abs() < Money::from_major(5));

        let nothing_saved = params(5_000, 60_000, dec!(0), 100, dec!(0.07));
        assert_eq!(break_even_return(&nothing_saved), Rate::ZERO);
    }
}

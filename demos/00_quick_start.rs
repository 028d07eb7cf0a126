/// quick start - repayments, a payoff simulation and overpay vs invest
use student_loan_rs::format::{format_currency, format_duration_months};
use student_loan_rs::{
    compare_overpay_vs_invest, monthly_repayment, simulate_amortization, Money, OverpayInvestParams,
    PlanType, Rate, RepaymentResult, SimulationParams, TaxYearConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TaxYearConfig::uk_2024_25();
    config.validate()?;
    let plan = config.plan(PlanType::Plan2).clone();

    // what a 35,000 salary repays each month
    let salary = Money::from_major(35_000);
    println!("monthly repayment: {}", format_currency(monthly_repayment(salary, &plan)));

    // a 45,000 balance with 3% salary growth, run to payoff or write-off
    let params = SimulationParams::new(Money::from_major(45_000), salary, Rate::from_percentage(3), plan);
    let result = simulate_amortization(&params);
    let summary = RepaymentResult::from_simulation(&params, &result);
    println!("total repaid: {}", format_currency(summary.total_repaid));
    println!("paid off: {} after {}", summary.paid_off, format_duration_months(result.months_elapsed));

    // overpay 200 a month or invest it at 5%
    let comparison = compare_overpay_vs_invest(&OverpayInvestParams {
        loan: params,
        monthly_amount: Money::from_major(200),
        investment_return: Rate::from_percentage(5),
    });
    println!("{}", serde_json::to_string_pretty(&comparison)?);

    Ok(())
}

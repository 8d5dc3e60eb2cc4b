/// quick start - register a loan, pay one installment, read both views
use billing_engine_rs::{system_clock, BillingEngine, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let time = system_clock();
    let mut engine = BillingEngine::new(&time);

    let billable = engine.make_billable("loan-001", Money::from_major(5_000_000))?;
    println!("billable {} created", billable.id);
    println!("  principal: {}", billable.principal);
    println!("  bill:      {}", billable.amount);
    println!("  weekly:    {}", billable.weekly_installment());
    println!("  due at:    {}", billable.due_at.format("%Y-%m-%d"));

    let payment = engine.make_payment_now("loan-001", Money::from_major(110_000))?;
    println!("\npayment {} recorded: {}", payment.id, payment.amount);

    let outstanding = engine.get_outstanding("loan-001")?;
    println!("\noutstanding: {} of {}", outstanding.outstanding, outstanding.bill);

    let delinquency = engine.is_delinquent("loan-001")?;
    println!("delinquent: {}", delinquency.delinquent);

    Ok(())
}

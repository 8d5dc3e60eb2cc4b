/// time control - watch delinquency change as weeks pass
use billing_engine_rs::{BillingEngine, Money, SafeTimeProvider, SequentialIdGenerator, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn report(
    engine: &BillingEngine<&SafeTimeProvider, SequentialIdGenerator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = engine.is_delinquent("loan-1")?;
    println!(
        "  {} | week {:>2} | expected {:>8} | paid {:>8} | missed {} | delinquent {}",
        engine.now().format("%Y-%m-%d"),
        status.age_weeks,
        status.expected_paid,
        status.paid,
        status.missed_installments,
        status.delinquent,
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut engine = BillingEngine::new(&time).with_id_generator(SequentialIdGenerator::default());
    let installment = engine.make_default_billable("loan-1")?.weekly_installment();
    println!("loan created on {}, weekly installment {}", time.now().format("%Y-%m-%d"), installment);

    report(&engine)?;

    // skip two weeks
    controller.advance(Duration::days(14));
    report(&engine)?;

    // catch up one installment
    engine.make_payment_now("loan-1", installment)?;
    report(&engine)?;

    // skip three more weeks
    controller.advance(Duration::days(21));
    report(&engine)?;

    // pay everything that is due
    for _ in 0..4 {
        engine.make_payment_now("loan-1", installment)?;
    }
    report(&engine)?;

    // a non-installment amount is rejected
    if let Err(err) = engine.make_payment_now("loan-1", Money::from_major(1_000)) {
        println!("\nrejected: {}", err);
    }

    Ok(())
}

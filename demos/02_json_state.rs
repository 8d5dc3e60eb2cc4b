/// json state - configure from json and dump the ledger
use billing_engine_rs::{BillingEngine, EngineConfig, LedgerView, Money, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::from_json(
        r#"{
            "loan_duration_weeks": 10,
            "interest_rate": "0.05",
            "paid_strategy": "FullScan"
        }"#,
    )?;

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut engine = BillingEngine::with_config(&time, config)?;
    engine.make_billable("alpha", Money::from_major(100_000))?;
    engine.make_billable("beta", Money::from_major(20_000))?;

    controller.advance(Duration::weeks(1));
    engine.make_payment_now("alpha", Money::from_major(10_500))?;

    controller.advance(Duration::weeks(2));

    let view = LedgerView::from_engine(&engine)?;
    println!("{}", view.to_json_pretty()?);

    Ok(())
}

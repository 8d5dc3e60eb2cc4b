/// shared engine - several threads paying into the same engine
use std::thread;

use billing_engine_rs::{Money, SafeTimeProvider, SharedBillingEngine, TimeSource};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let engine = SharedBillingEngine::new(&time);

    for id in ["north", "south", "east", "west"] {
        engine.make_default_billable(id)?;
    }

    thread::scope(|scope| {
        for id in ["north", "south", "east", "west"] {
            let engine = engine.clone();
            scope.spawn(move || {
                for _ in 0..5 {
                    if let Err(err) = engine.make_payment_now(id, Money::from_major(110_000)) {
                        eprintln!("{}: {}", id, err);
                    }
                }
            });
        }
    });

    for billable in engine.billables() {
        let outstanding = engine.get_outstanding(&billable.id)?;
        println!("{:>6}: paid {} outstanding {}", billable.id, outstanding.paid, outstanding.outstanding);
    }

    let inconsistent = engine.verify_running_totals();
    println!("\nrunning totals consistent: {}", inconsistent.is_empty());

    Ok(())
}

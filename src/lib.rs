pub mod billable;
pub mod clock;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod ids;
pub mod ledger;
pub mod payment;
pub mod serialization;
pub mod shared;
pub mod types;

// re-export key types
pub use billable::Billable;
pub use clock::{system_clock, Clock};
pub use config::EngineConfig;
pub use decimal::{Money, Rate};
pub use engine::BillingEngine;
pub use errors::{BillingError, Result};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use ledger::PaymentLedger;
pub use payment::{Payment, PaymentRequest};
pub use serialization::{BillableView, LedgerView, PaymentView};
pub use shared::SharedBillingEngine;
pub use types::{
    BillableId, DelinquencyDetails, OutstandingDetails, PaidStrategy, PaymentId, PaymentPolicy,
    ScheduledInstallment,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;

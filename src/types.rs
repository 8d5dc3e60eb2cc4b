use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// caller-supplied identifier of a billable
pub type BillableId = String;

/// engine-generated identifier of a payment
pub type PaymentId = String;

/// which payment amounts are accepted against a billable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentPolicy {
    /// every payment must be exactly one weekly installment
    #[default]
    ExactInstallment,
    /// any positive amount is accepted and accumulated
    AnyPositive,
}

/// how "paid to date" is derived for a billable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaidStrategy {
    /// sum the amounts of every payment linked to the billable
    FullScan,
    /// read the accumulated amount carried on the latest payment
    #[default]
    RunningTotal,
}

/// outstanding balance view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingDetails {
    pub principal: Money,
    pub bill: Money,
    pub paid: Money,
    /// `bill - paid`, negative when overpaid
    pub outstanding: Money,
}

/// delinquency view together with the figures it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelinquencyDetails {
    pub delinquent: bool,
    pub age_weeks: i64,
    pub weekly_installment: Money,
    pub expected_paid: Money,
    pub paid: Money,
    /// installments behind schedule, zero when ahead or on time
    pub missed_installments: i64,
}

/// one row of a billable's weekly repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub due_date: DateTime<Utc>,
    pub amount: Money,
    /// total expected once this installment is paid
    pub cumulative_amount: Money,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::billable::Billable;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{BillableId, PaymentId, PaymentPolicy};

/// funds applied against exactly one billable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub billable_id: BillableId,
    pub amount: Money,
    /// total paid against `billable_id` up to and including this payment
    pub accumulated_amount: Money,
    /// when the payer says the money moved; may be backdated
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// payment request
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub billable_id: BillableId,
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
}

impl PaymentRequest {
    pub fn new(billable_id: impl Into<BillableId>, amount: Money, paid_at: DateTime<Utc>) -> Self {
        Self {
            billable_id: billable_id.into(),
            amount,
            paid_at,
        }
    }
}

impl PaymentPolicy {
    /// check `amount` against this policy for `billable`
    pub fn validate(&self, amount: Money, billable: &Billable) -> Result<()> {
        if !amount.is_positive() {
            return Err(BillingError::InvalidPaymentAmount {
                amount,
                expected: self.expected_amount(billable),
            });
        }

        match self {
            PaymentPolicy::ExactInstallment => {
                let installment = billable.weekly_installment();
                if amount != installment {
                    return Err(BillingError::InvalidPaymentAmount {
                        amount,
                        expected: Some(installment),
                    });
                }
            }
            PaymentPolicy::AnyPositive => {}
        }

        Ok(())
    }

    /// the only accepted amount, when the policy pins one
    pub fn expected_amount(&self, billable: &Billable) -> Option<Money> {
        match self {
            PaymentPolicy::ExactInstallment => Some(billable.weekly_installment()),
            PaymentPolicy::AnyPositive => None,
        }
    }
}

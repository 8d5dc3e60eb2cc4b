use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::payment::Payment;
use crate::types::{BillableId, PaidStrategy, PaymentId};

/// append-only payment log with a per-billable index
///
/// The index maps a billable id to the positions of its payments in insertion
/// order, so the latest payment (and its running total) is found without a scan.
#[derive(Debug, Clone, Default)]
pub struct PaymentLedger {
    payments: Vec<Payment>,
    by_billable: HashMap<BillableId, Vec<usize>>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a payment, computing its running total from the previous one
    ///
    /// Nothing is recorded when the running total would overflow.
    pub fn append(
        &mut self,
        id: PaymentId,
        billable_id: &str,
        amount: Money,
        paid_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Result<&Payment> {
        let accumulated_amount = self
            .running_total(billable_id)
            .checked_add(amount)
            .ok_or(BillingError::InvalidPaymentAmount {
                amount,
                expected: None,
            })?;
        let position = self.payments.len();

        self.payments.push(Payment {
            id,
            billable_id: billable_id.to_string(),
            amount,
            accumulated_amount,
            paid_at,
            created_at,
        });
        self.by_billable
            .entry(billable_id.to_string())
            .or_default()
            .push(position);

        Ok(&self.payments[position])
    }

    /// paid to date, derived the way `strategy` says
    pub fn paid_to_date(&self, billable_id: &str, strategy: PaidStrategy) -> Money {
        match strategy {
            PaidStrategy::FullScan => self.full_scan_total(billable_id),
            PaidStrategy::RunningTotal => self.running_total(billable_id),
        }
    }

    /// sum of every payment in the log that references `billable_id`
    pub fn full_scan_total(&self, billable_id: &str) -> Money {
        self.payments
            .iter()
            .filter(|p| p.billable_id == billable_id)
            .map(|p| p.amount)
            .sum()
    }

    /// accumulated amount on the most recent payment for `billable_id`
    pub fn running_total(&self, billable_id: &str) -> Money {
        self.latest_for(billable_id)
            .map(|p| p.accumulated_amount)
            .unwrap_or(Money::ZERO)
    }

    pub fn latest_for(&self, billable_id: &str) -> Option<&Payment> {
        self.by_billable
            .get(billable_id)
            .and_then(|positions| positions.last())
            .map(|&position| &self.payments[position])
    }

    /// payments for `billable_id` in insertion order
    pub fn for_billable<'a>(&'a self, billable_id: &str) -> impl Iterator<Item = &'a Payment> + 'a {
        self.by_billable
            .get(billable_id)
            .into_iter()
            .flatten()
            .map(move |&position| &self.payments[position])
    }

    pub fn count_for(&self, billable_id: &str) -> usize {
        self.by_billable.get(billable_id).map_or(0, Vec::len)
    }

    /// billable ids whose running total disagrees with the full scan
    pub fn inconsistent_billables(&self) -> Vec<BillableId> {
        let mut ids: Vec<BillableId> = self
            .by_billable
            .keys()
            .filter(|id| self.running_total(id) != self.full_scan_total(id))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn all(&self) -> &[Payment] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::billable::Billable;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::engine::BillingEngine;
use crate::errors::Result;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::payment::Payment;
use crate::types::{BillableId, DelinquencyDetails, OutstandingDetails};

/// clonable handle to one engine, safe to use from many threads
///
/// Writes hold the write guard for the whole validate/accumulate/insert step, so
/// two payments for the same billable never interleave and readers see a
/// payment together with its running total or not at all. Reads share the lock.
pub struct SharedBillingEngine<C, G = UuidGenerator> {
    inner: Arc<RwLock<BillingEngine<C, G>>>,
}

impl<C, G> Clone for SharedBillingEngine<C, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedBillingEngine<C, UuidGenerator> {
    pub fn new(clock: C) -> Self {
        Self::from_engine(BillingEngine::new(clock))
    }

    pub fn with_config(clock: C, config: EngineConfig) -> Result<Self> {
        Ok(Self::from_engine(BillingEngine::with_config(clock, config)?))
    }
}

impl<C: Clock, G: IdGenerator> SharedBillingEngine<C, G> {
    pub fn from_engine(engine: BillingEngine<C, G>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    // every write is a single append, so a poisoned lock still guards consistent data
    fn read(&self) -> RwLockReadGuard<'_, BillingEngine<C, G>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BillingEngine<C, G>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn make_billable(&self, id: impl Into<BillableId>, principal: Money) -> Result<Billable> {
        self.write().make_billable(id, principal).cloned()
    }

    pub fn make_default_billable(&self, id: impl Into<BillableId>) -> Result<Billable> {
        self.write().make_default_billable(id).cloned()
    }

    pub fn make_payment(
        &self,
        billable_id: &str,
        amount: Money,
        paid_at: DateTime<Utc>,
    ) -> Result<Payment> {
        self.write().make_payment(billable_id, amount, paid_at).cloned()
    }

    pub fn make_payment_now(&self, billable_id: &str, amount: Money) -> Result<Payment> {
        self.write().make_payment_now(billable_id, amount).cloned()
    }

    pub fn get_outstanding(&self, billable_id: &str) -> Result<OutstandingDetails> {
        self.read().get_outstanding(billable_id)
    }

    pub fn is_delinquent(&self, billable_id: &str) -> Result<DelinquencyDetails> {
        self.read().is_delinquent(billable_id)
    }

    pub fn get_billable(&self, billable_id: &str) -> Result<Billable> {
        self.read().get_billable(billable_id).cloned()
    }

    pub fn billables(&self) -> Vec<Billable> {
        self.read().billables().to_vec()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.read().payments().to_vec()
    }

    pub fn payments_for(&self, billable_id: &str) -> Result<Vec<Payment>> {
        let engine = self.read();
        let payments = engine.payments_for(billable_id)?;
        Ok(payments.into_iter().cloned().collect())
    }

    pub fn payment_count(&self) -> usize {
        self.read().payment_count()
    }

    pub fn verify_running_totals(&self) -> Vec<BillableId> {
        self.read().verify_running_totals()
    }

    /// run `f` against a consistent view of the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&BillingEngine<C, G>) -> R) -> R {
        f(&*self.read())
    }
}

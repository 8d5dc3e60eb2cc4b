use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::billable::Billable;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::ledger::PaymentLedger;
use crate::payment::{Payment, PaymentRequest};
use crate::types::{BillableId, DelinquencyDetails, OutstandingDetails};

/// in-memory billing engine
///
/// Owns the billables and the payment ledger. Writes take `&mut self`, so a
/// payment and its running total are always published together; see
/// [`SharedBillingEngine`](crate::shared::SharedBillingEngine) for concurrent callers.
pub struct BillingEngine<C, G = UuidGenerator> {
    config: EngineConfig,
    clock: C,
    ids: G,
    billables: Vec<Billable>,
    index: HashMap<BillableId, usize>,
    ledger: PaymentLedger,
}

impl<C: Clock> BillingEngine<C, UuidGenerator> {
    /// create engine with default configuration
    pub fn new(clock: C) -> Self {
        Self::from_parts(EngineConfig::default(), clock, UuidGenerator)
    }

    /// create engine with validated configuration
    pub fn with_config(clock: C, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, clock, UuidGenerator))
    }
}

impl<C: Clock, G: IdGenerator> BillingEngine<C, G> {
    fn from_parts(config: EngineConfig, clock: C, ids: G) -> Self {
        Self {
            config,
            clock,
            ids,
            billables: Vec::new(),
            index: HashMap::new(),
            ledger: PaymentLedger::new(),
        }
    }

    /// swap the payment id generator
    pub fn with_id_generator<H: IdGenerator>(self, ids: H) -> BillingEngine<C, H> {
        BillingEngine {
            config: self.config,
            clock: self.clock,
            ids,
            billables: self.billables,
            index: self.index,
            ledger: self.ledger,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// register a loan of `principal` under the caller-chosen `id`
    pub fn make_billable(&mut self, id: impl Into<BillableId>, principal: Money) -> Result<&Billable> {
        let id = id.into();
        if self.index.contains_key(&id) {
            warn!(billable_id = %id, "rejected duplicate billable id");
            return Err(BillingError::DuplicateBillable { id });
        }

        let billable = Billable::new(id, principal, &self.config, self.clock.now())?;

        info!(
            billable_id = %billable.id,
            principal = %billable.principal,
            amount = %billable.amount,
            due_at = %billable.due_at,
            "billable created"
        );

        let position = self.billables.len();
        self.index.insert(billable.id.clone(), position);
        self.billables.push(billable);

        Ok(&self.billables[position])
    }

    /// register a loan of the configured default principal
    pub fn make_default_billable(&mut self, id: impl Into<BillableId>) -> Result<&Billable> {
        let principal = self.config.default_principal;
        self.make_billable(id, principal)
    }

    /// record a payment made at `paid_at`
    pub fn make_payment(
        &mut self,
        billable_id: &str,
        amount: Money,
        paid_at: DateTime<Utc>,
    ) -> Result<&Payment> {
        let billable = self.find(billable_id)?;

        if let Err(err) = self.config.payment_policy.validate(amount, billable) {
            warn!(billable_id, amount = %amount, error = %err, "payment rejected");
            return Err(err);
        }

        let created_at = self.clock.now();
        let payment_id = self.ids.next_id();
        let payment = match self
            .ledger
            .append(payment_id, billable_id, amount, paid_at, created_at)
        {
            Ok(payment) => payment,
            Err(err) => {
                warn!(billable_id, amount = %amount, error = %err, "payment would overflow running total");
                return Err(err);
            }
        };

        info!(
            billable_id,
            payment_id = %payment.id,
            amount = %payment.amount,
            accumulated = %payment.accumulated_amount,
            "payment recorded"
        );

        Ok(payment)
    }

    /// record a payment made right now
    pub fn make_payment_now(&mut self, billable_id: &str, amount: Money) -> Result<&Payment> {
        let paid_at = self.clock.now();
        self.make_payment(billable_id, amount, paid_at)
    }

    /// record a payment from a request
    pub fn submit(&mut self, request: &PaymentRequest) -> Result<&Payment> {
        self.make_payment(&request.billable_id, request.amount, request.paid_at)
    }

    /// outstanding balance of a billable
    pub fn get_outstanding(&self, billable_id: &str) -> Result<OutstandingDetails> {
        let billable = self.find(billable_id)?;
        let paid = self.paid_to_date(billable_id);

        Ok(OutstandingDetails {
            principal: billable.principal,
            bill: billable.amount,
            paid,
            outstanding: billable.amount - paid,
        })
    }

    /// delinquency status as of the clock's current time
    ///
    /// A billable is delinquent once the amount expected by now exceeds what was
    /// paid by at least `delinquency_skip_threshold` installments. The boundary is
    /// inclusive: exactly two missed installments under the default threshold
    /// already counts.
    pub fn is_delinquent(&self, billable_id: &str) -> Result<DelinquencyDetails> {
        let billable = self.find(billable_id)?;
        let now = self.clock.now();

        let weekly_installment = billable.weekly_installment();
        let age_weeks = billable.age_in_weeks(now);
        let expected_paid = billable.expected_paid_by(now);
        let paid = self.paid_to_date(billable_id);

        let shortfall = expected_paid - paid;
        let threshold = weekly_installment.times(self.config.delinquency_skip_threshold as i64);
        let delinquent = shortfall >= threshold;

        let missed_installments = shortfall.whole_multiples_of(weekly_installment).unwrap_or(0);

        debug!(
            billable_id,
            age_weeks,
            expected = %expected_paid,
            paid = %paid,
            delinquent,
            "delinquency derived"
        );

        Ok(DelinquencyDetails {
            delinquent,
            age_weeks,
            weekly_installment,
            expected_paid,
            paid,
            missed_installments,
        })
    }

    pub fn get_billable(&self, billable_id: &str) -> Result<&Billable> {
        self.find(billable_id)
    }

    /// all billables in creation order
    pub fn billables(&self) -> &[Billable] {
        &self.billables
    }

    /// all payments in insertion order
    pub fn payments(&self) -> &[Payment] {
        self.ledger.all()
    }

    /// payments for one billable in insertion order
    pub fn payments_for(&self, billable_id: &str) -> Result<Vec<&Payment>> {
        self.find(billable_id)?;
        Ok(self.ledger.for_billable(billable_id).collect())
    }

    pub fn billable_count(&self) -> usize {
        self.billables.len()
    }

    pub fn payment_count(&self) -> usize {
        self.ledger.len()
    }

    /// billables whose cached running total differs from a full scan
    ///
    /// Always empty unless the ledger was corrupted from outside the engine.
    pub fn verify_running_totals(&self) -> Vec<BillableId> {
        self.ledger.inconsistent_billables()
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    fn paid_to_date(&self, billable_id: &str) -> Money {
        self.ledger.paid_to_date(billable_id, self.config.paid_strategy)
    }

    fn find(&self, billable_id: &str) -> Result<&Billable> {
        match self.index.get(billable_id) {
            Some(&position) => Ok(&self.billables[position]),
            None => {
                warn!(billable_id, "billable not found");
                Err(BillingError::BillableNotFound {
                    id: billable_id.to_string(),
                })
            }
        }
    }
}

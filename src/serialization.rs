//! serialization support for engine state
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::decimal::{Money, Rate};
use crate::engine::BillingEngine;
use crate::errors::Result;
use crate::ids::IdGenerator;
use crate::payment::Payment;
use crate::types::{BillableId, DelinquencyDetails, OutstandingDetails, PaymentId};

/// serializable view of one billable with its derived figures
#[derive(Debug, Serialize, Deserialize)]
pub struct BillableView {
    pub id: BillableId,
    pub principal: Money,
    pub amount: Money,
    pub duration_weeks: u32,
    pub weekly_installment: Money,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub outstanding: OutstandingDetails,
    pub delinquency: DelinquencyDetails,
    pub payments: Vec<PaymentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub billable_id: BillableId,
    pub amount: Money,
    pub amount_accumulated: Money,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        PaymentView {
            id: payment.id.clone(),
            billable_id: payment.billable_id.clone(),
            amount: payment.amount,
            amount_accumulated: payment.accumulated_amount,
            paid_at: payment.paid_at,
            created_at: payment.created_at,
        }
    }
}

/// whole-engine snapshot as of the clock's current time
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerView {
    pub as_of: DateTime<Utc>,
    pub interest_rate: Rate,
    pub billable_count: usize,
    pub payment_count: usize,
    pub total_billed: Money,
    pub total_paid: Money,
    pub delinquent_count: usize,
    pub billables: Vec<BillableView>,
}

impl BillableView {
    pub fn from_engine<C: Clock, G: IdGenerator>(
        engine: &BillingEngine<C, G>,
        billable_id: &str,
    ) -> Result<Self> {
        let billable = engine.get_billable(billable_id)?;
        let outstanding = engine.get_outstanding(billable_id)?;
        let delinquency = engine.is_delinquent(billable_id)?;
        let payments = engine
            .payments_for(billable_id)?
            .into_iter()
            .map(PaymentView::from)
            .collect();

        Ok(BillableView {
            id: billable.id.clone(),
            principal: billable.principal,
            amount: billable.amount,
            duration_weeks: billable.duration_weeks,
            weekly_installment: billable.weekly_installment(),
            created_at: billable.created_at,
            due_at: billable.due_at,
            outstanding,
            delinquency,
            payments,
        })
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl LedgerView {
    pub fn from_engine<C: Clock, G: IdGenerator>(engine: &BillingEngine<C, G>) -> Result<Self> {
        let billables = engine
            .billables()
            .iter()
            .map(|b| BillableView::from_engine(engine, &b.id))
            .collect::<Result<Vec<_>>>()?;

        Ok(LedgerView {
            as_of: engine.now(),
            interest_rate: engine.config().interest_rate,
            billable_count: billables.len(),
            payment_count: engine.payment_count(),
            total_billed: billables.iter().map(|b| b.amount).sum(),
            total_paid: billables.iter().map(|b| b.outstanding.paid).sum(),
            delinquent_count: billables.iter().filter(|b| b.delinquency.delinquent).count(),
            billables,
        })
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

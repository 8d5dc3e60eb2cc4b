use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{BillableId, ScheduledInstallment};

/// an installment loan: principal plus flat interest, repaid in equal weekly installments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Billable {
    pub id: BillableId,
    pub principal: Money,
    /// principal with interest, fixed at creation
    pub amount: Money,
    pub duration_weeks: u32,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl Billable {
    /// build a billable under `config`, created at `now`
    pub fn new(
        id: impl Into<BillableId>,
        principal: Money,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BillingError::InvalidBillableId);
        }

        if !principal.is_positive() {
            return Err(BillingError::InvalidPrincipal { principal });
        }

        if config.loan_duration_weeks == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "loan duration must be at least one week".to_string(),
            });
        }

        let amount = principal
            .with_flat_interest(config.interest_rate)
            .ok_or(BillingError::InvalidPrincipal { principal })?;

        let due_at = now
            .checked_add_signed(Duration::weeks(config.loan_duration_weeks as i64))
            .ok_or_else(|| BillingError::InvalidConfiguration {
                message: format!(
                    "loan duration of {} weeks runs past the supported date range",
                    config.loan_duration_weeks
                ),
            })?;

        Ok(Self {
            id,
            principal,
            amount,
            duration_weeks: config.loan_duration_weeks,
            created_at: now,
            due_at,
        })
    }

    /// amount owed each week
    pub fn weekly_installment(&self) -> Money {
        // a zero-week term can only come from hand-built records; treat it as due at once
        self.amount.split(self.duration_weeks).unwrap_or(self.amount)
    }

    /// whole weeks elapsed since creation, truncated; zero if `now` precedes creation
    pub fn age_in_weeks(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_weeks().max(0)
    }

    /// one installment per whole week elapsed by `now`
    ///
    /// Keeps growing after the term ends, so a loan left unpaid at maturity stays
    /// behind schedule.
    pub fn expected_paid_by(&self, now: DateTime<Utc>) -> Money {
        self.weekly_installment().times(self.age_in_weeks(now))
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    /// the weekly repayment plan, one row per installment
    pub fn installment_schedule(&self) -> Vec<ScheduledInstallment> {
        let installment = self.weekly_installment();
        (1..=self.duration_weeks)
            .map(|number| ScheduledInstallment {
                number,
                due_date: self.created_at + Duration::weeks(number as i64),
                amount: installment,
                cumulative_amount: installment.times(number as i64),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn default_billable() -> Billable {
        Billable::new("loan-1", Money::from_major(5_000_000), &EngineConfig::default(), start())
            .unwrap()
    }

    #[test]
    fn test_default_terms() {
        let billable = default_billable();

        assert_eq!(billable.amount, Money::from_major(5_500_000));
        assert_eq!(billable.duration_weeks, 50);
        assert_eq!((billable.due_at - billable.created_at).num_days(), 350);
        assert_eq!(billable.weekly_installment(), Money::from_major(110_000));
    }

    #[test]
    fn test_amount_exceeds_principal_with_interest() {
        let config = EngineConfig::default().with_interest_rate(Rate::from_percentage(3));
        let billable = Billable::new("loan-2", Money::from_major(1_000), &config, start()).unwrap();
        assert_eq!(billable.amount, Money::from_major(1_030));
        assert!(billable.amount > billable.principal);
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let config = EngineConfig::default();
        assert_eq!(
            Billable::new("loan-3", Money::ZERO, &config, start()),
            Err(BillingError::InvalidPrincipal { principal: Money::ZERO })
        );
        assert!(Billable::new("loan-3", Money::from_major(-10), &config, start()).is_err());
    }

    #[test]
    fn test_rejects_blank_id() {
        let config = EngineConfig::default();
        assert_eq!(
            Billable::new("  ", Money::from_major(100), &config, start()),
            Err(BillingError::InvalidBillableId)
        );
    }

    #[test]
    fn test_age_truncates_partial_weeks() {
        let billable = default_billable();

        assert_eq!(billable.age_in_weeks(start()), 0);
        assert_eq!(billable.age_in_weeks(start() + Duration::days(6)), 0);
        assert_eq!(billable.age_in_weeks(start() + Duration::days(7)), 1);
        assert_eq!(billable.age_in_weeks(start() + Duration::days(20)), 2);
        assert_eq!(billable.age_in_weeks(start() + Duration::days(21)), 3);
        assert_eq!(
            billable.age_in_weeks(start() + Duration::days(13) + Duration::hours(23)),
            1
        );
        // clock behind creation
        assert_eq!(billable.age_in_weeks(start() - Duration::days(30)), 0);
    }

    #[test]
    fn test_expected_paid_grows_past_term() {
        let billable = default_billable();

        assert_eq!(
            billable.expected_paid_by(start() + Duration::days(21)),
            Money::from_major(330_000)
        );
        assert_eq!(billable.expected_paid_by(billable.due_at), billable.amount);
        assert_eq!(
            billable.expected_paid_by(start() + Duration::weeks(60)),
            Money::from_major(6_600_000)
        );
    }

    #[test]
    fn test_rejects_principal_that_overflows_with_interest() {
        let config = EngineConfig::default();
        let principal = Money::from_decimal(Decimal::MAX);

        assert_eq!(
            Billable::new("big", principal, &config, start()),
            Err(BillingError::InvalidPrincipal { principal })
        );

        // no interest, nothing to overflow
        let config = config.with_interest_rate(Rate::ZERO);
        let billable = Billable::new("big", principal, &config, start()).unwrap();
        assert_eq!(billable.amount, principal);
        assert_eq!(
            billable.expected_paid_by(start() + Duration::weeks(500)),
            Money::from_decimal(Decimal::MAX)
        );
    }

    #[test]
    fn test_rejects_term_past_date_range() {
        let config = EngineConfig::default().with_loan_duration_weeks(u32::MAX);
        assert!(matches!(
            Billable::new("long", Money::from_major(100), &config, start()),
            Err(BillingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_past_due() {
        let billable = default_billable();
        assert!(!billable.is_past_due(billable.due_at));
        assert!(billable.is_past_due(billable.due_at + Duration::seconds(1)));
    }

    #[test]
    fn test_installment_schedule() {
        let billable = default_billable();
        let schedule = billable.installment_schedule();

        assert_eq!(schedule.len(), 50);
        assert_eq!(schedule[0].due_date, start() + Duration::days(7));
        assert_eq!(schedule[0].amount, Money::from_major(110_000));

        let last = schedule.last().unwrap();
        assert_eq!(last.number, 50);
        assert_eq!(last.due_date, billable.due_at);
        assert_eq!(last.cumulative_amount, billable.amount);
    }
}

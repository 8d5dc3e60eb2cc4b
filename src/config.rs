use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{BillingError, Result};
use crate::types::{PaidStrategy, PaymentPolicy};

pub const DEFAULT_PRINCIPAL: i64 = 5_000_000;
pub const DEFAULT_LOAN_DURATION_WEEKS: u32 = 50;
pub const DEFAULT_INTEREST_RATE_PERCENTAGE: u32 = 10;
/// how many installments may be skipped before a billable counts as delinquent
pub const DEFAULT_DELINQUENCY_SKIP_THRESHOLD: u32 = 2;

/// engine configuration
///
/// Every field has a default, so a partial JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_principal: Money,
    pub loan_duration_weeks: u32,
    pub interest_rate: Rate,
    pub delinquency_skip_threshold: u32,
    pub payment_policy: PaymentPolicy,
    pub paid_strategy: PaidStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_principal: Money::from_major(DEFAULT_PRINCIPAL),
            loan_duration_weeks: DEFAULT_LOAN_DURATION_WEEKS,
            interest_rate: Rate::from_percentage(DEFAULT_INTEREST_RATE_PERCENTAGE),
            delinquency_skip_threshold: DEFAULT_DELINQUENCY_SKIP_THRESHOLD,
            payment_policy: PaymentPolicy::default(),
            paid_strategy: PaidStrategy::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_default_principal(mut self, principal: Money) -> Self {
        self.default_principal = principal;
        self
    }

    pub fn with_loan_duration_weeks(mut self, weeks: u32) -> Self {
        self.loan_duration_weeks = weeks;
        self
    }

    pub fn with_interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = rate;
        self
    }

    pub fn with_delinquency_skip_threshold(mut self, installments: u32) -> Self {
        self.delinquency_skip_threshold = installments;
        self
    }

    pub fn with_payment_policy(mut self, policy: PaymentPolicy) -> Self {
        self.payment_policy = policy;
        self
    }

    pub fn with_paid_strategy(mut self, strategy: PaidStrategy) -> Self {
        self.paid_strategy = strategy;
        self
    }

    /// parse a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json).map_err(|e| {
            BillingError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.loan_duration_weeks == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "loan duration must be at least one week".to_string(),
            });
        }

        if self.delinquency_skip_threshold == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "delinquency skip threshold must be at least one installment".to_string(),
            });
        }

        if !self.default_principal.is_positive() {
            return Err(BillingError::InvalidConfiguration {
                message: format!("default principal {} must be positive", self.default_principal),
            });
        }

        if self.interest_rate.is_negative() {
            return Err(BillingError::InvalidConfiguration {
                message: format!("interest rate {} must not be negative", self.interest_rate),
            });
        }

        if self.default_principal.with_flat_interest(self.interest_rate).is_none() {
            return Err(BillingError::InvalidConfiguration {
                message: format!(
                    "default principal {} overflows at interest rate {}",
                    self.default_principal, self.interest_rate
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_principal, Money::from_major(5_000_000));
        assert_eq!(config.loan_duration_weeks, 50);
        assert_eq!(config.interest_rate, Rate::from_percentage(10));
        assert_eq!(config.delinquency_skip_threshold, 2);
        assert_eq!(config.payment_policy, PaymentPolicy::ExactInstallment);
        assert_eq!(config.paid_strategy, PaidStrategy::RunningTotal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::default()
            .with_loan_duration_weeks(10)
            .with_interest_rate(Rate::from_percentage(5))
            .with_paid_strategy(PaidStrategy::FullScan);

        assert_eq!(config.loan_duration_weeks, 10);
        assert_eq!(config.interest_rate.as_decimal(), dec!(0.05));
        assert_eq!(config.paid_strategy, PaidStrategy::FullScan);
    }

    #[test]
    fn test_validation_rejects_zero_duration() {
        let config = EngineConfig::default().with_loan_duration_weeks(0);
        assert!(matches!(
            config.validate(),
            Err(BillingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let config = EngineConfig::default().with_delinquency_skip_threshold(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_rate() {
        let config = EngineConfig::default().with_interest_rate(Rate::from_decimal(dec!(-0.01)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_overflowing_default_principal() {
        let config = EngineConfig::default()
            .with_default_principal(Money::from_decimal(rust_decimal::Decimal::MAX));
        assert!(matches!(
            config.validate(),
            Err(BillingError::InvalidConfiguration { .. })
        ));
        assert!(config.with_interest_rate(Rate::ZERO).validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(
            r#"{ "loan_duration_weeks": 25, "paid_strategy": "FullScan" }"#,
        )
        .unwrap();

        assert_eq!(config.loan_duration_weeks, 25);
        assert_eq!(config.paid_strategy, PaidStrategy::FullScan);
        assert_eq!(config.default_principal, Money::from_major(5_000_000));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(BillingError::InvalidConfiguration { .. })
        ));
        assert!(EngineConfig::from_json(r#"{ "loan_duration_weeks": 0 }"#).is_err());
    }
}

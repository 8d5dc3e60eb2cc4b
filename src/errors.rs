use thiserror::Error;

use crate::decimal::Money;
use crate::types::BillableId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("duplicate billable id: {id}")]
    DuplicateBillable {
        id: BillableId,
    },

    #[error("billable not found: id {id}")]
    BillableNotFound {
        id: BillableId,
    },

    #[error("invalid payment amount: {amount}{}", expected_suffix(.expected))]
    InvalidPaymentAmount {
        amount: Money,
        expected: Option<Money>,
    },

    #[error("invalid principal: {principal} must be positive and fit a decimal once interest is added")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid billable id: must not be blank")]
    InvalidBillableId,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

fn expected_suffix(expected: &Option<Money>) -> String {
    match expected {
        Some(installment) => format!(", expected {}", installment),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;

use super::extended_data::{ExtendedData, keys};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    CreditCard,
    PurchaseOrder,
    Cash,
    Other,
}

/// The host lifecycle operations a gateway method may be asked to perform.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOperation {
    Authorize,
    Capture,
    AuthorizeCapture,
    Refund,
    Void,
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleOperation::Authorize => "authorize",
            LifecycleOperation::Capture => "capture",
            LifecycleOperation::AuthorizeCapture => "authorize and capture",
            LifecycleOperation::Refund => "refund",
            LifecycleOperation::Void => "void",
        };
        f.write_str(name)
    }
}

/// Describes a configured payment method of a gateway provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub key: Uuid,
    pub provider_key: Uuid,
    pub name: String,
    pub payment_code: String,
}

impl PaymentMethod {
    pub fn new(provider_key: Uuid, name: impl Into<String>, payment_code: impl Into<String>) -> Self {
        Self {
            key: Uuid::new_v4(),
            provider_key,
            name: name.into(),
            payment_code: payment_code.into(),
        }
    }
}

/// Where a payment sits in its lifecycle, derived from its flags.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PaymentState {
    New,
    Authorized,
    PartiallyCollected,
    Collected,
}

/// One attempt to collect funds against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub key: Uuid,
    pub payment_method_key: Uuid,
    pub method_type: PaymentMethodType,
    pub amount: Decimal,
    pub customer_key: Option<Uuid>,
    pub authorized: bool,
    pub collected: bool,
    pub payment_method_name: String,
    pub extended_data: ExtendedData,
}

impl Payment {
    pub fn new(method_type: PaymentMethodType, amount: Decimal, payment_method_key: Uuid) -> Self {
        Self {
            key: Uuid::new_v4(),
            payment_method_key,
            method_type,
            amount,
            customer_key: None,
            authorized: false,
            collected: false,
            payment_method_name: String::new(),
            extended_data: ExtendedData::new(),
        }
    }

    /// Total captured so far, or `None` while the capture sentinel is in place.
    pub fn captured_amount(&self) -> Option<Decimal> {
        self.extended_data
            .get_value(keys::CAPTURE_AMOUNT)
            .and_then(|raw| raw.parse::<Decimal>().ok())
            .filter(|amount| *amount >= Decimal::ZERO)
    }

    /// Adds `amount` to the captured total, replacing the sentinel on first use.
    pub fn record_capture(&mut self, amount: Decimal) {
        let captured = self.captured_amount().unwrap_or(Decimal::ZERO) + amount;
        self.extended_data
            .set_value(keys::CAPTURE_AMOUNT, captured.to_string());
    }

    pub fn state(&self) -> PaymentState {
        match (self.authorized, self.collected, self.captured_amount()) {
            (false, _, _) => PaymentState::New,
            (true, true, _) => PaymentState::Collected,
            (true, false, Some(captured)) if captured > Decimal::ZERO => {
                PaymentState::PartiallyCollected
            }
            (true, false, _) => PaymentState::Authorized,
        }
    }
}

/// Why the gateway rejected or could not process a request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProcessorFailure {
    pub message: String,
}

impl ProcessorFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The outcome of a single processor call.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    pub payment: Payment,
    pub invoice_key: Uuid,
    pub failure: Option<ProcessorFailure>,
    /// Whether the host may go on to create an order for the invoice.
    pub approve_order_creation: bool,
}

impl PaymentResult {
    pub fn success(payment: Payment, invoice_key: Uuid, approve_order_creation: bool) -> Self {
        Self {
            payment,
            invoice_key,
            failure: None,
            approve_order_creation,
        }
    }

    pub fn failed(payment: Payment, invoice_key: Uuid, failure: ProcessorFailure) -> Self {
        Self {
            payment,
            invoice_key,
            failure: Some(failure),
            approve_order_creation: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

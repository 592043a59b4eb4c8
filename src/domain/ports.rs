use super::extended_data::ProcessorArgs;
use super::invoice::Invoice;
use super::ledger::{AppliedPayment, AppliedPaymentType};
use super::money::Money;
use super::payment::{Payment, PaymentMethod, PaymentMethodType, PaymentResult};
use crate::config::ProcessorSettings;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for payments and the invoice ledger, owned by the host.
#[async_trait]
pub trait GatewayProviderService: Send + Sync {
    async fn create_payment(
        &self,
        method_type: PaymentMethodType,
        amount: Decimal,
        payment_method_key: Uuid,
    ) -> Result<Payment>;
    async fn save(&self, payment: &Payment) -> Result<()>;
    async fn get_payment(&self, payment_key: Uuid) -> Result<Option<Payment>>;
    /// Appends a ledger entry. Existing entries are never touched.
    async fn apply_payment_to_invoice(
        &self,
        payment_key: Uuid,
        invoice_key: Uuid,
        applied_type: AppliedPaymentType,
        note: &str,
        amount: Money,
    ) -> Result<AppliedPayment>;
    /// Ledger entries for the invoice, in append order.
    async fn applied_payments(&self, invoice_key: Uuid) -> Result<Vec<AppliedPayment>>;
}

/// The gateway client that performs the actual network calls.
///
/// Failures are reported inside the returned `PaymentResult`, never as errors.
#[async_trait]
pub trait GatewayProcessor: Send + Sync {
    async fn initialize_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        args: &ProcessorArgs,
    ) -> PaymentResult;
    async fn capture_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        amount: Decimal,
        is_partial: bool,
    ) -> PaymentResult;
}

/// The lifecycle capability every gateway method variant implements.
#[async_trait]
pub trait PaymentGatewayMethod: Send + Sync {
    fn payment_method(&self) -> &PaymentMethod;

    async fn authorize_payment(&self, invoice: &Invoice, args: &ProcessorArgs)
    -> Result<PaymentResult>;

    async fn capture_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        amount: Decimal,
        args: &ProcessorArgs,
    ) -> Result<PaymentResult>;

    async fn authorize_capture_payment(
        &self,
        invoice: &Invoice,
        amount: Decimal,
        args: &ProcessorArgs,
    ) -> Result<PaymentResult>;

    async fn refund_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        amount: Decimal,
        args: &ProcessorArgs,
    ) -> Result<PaymentResult>;

    async fn void_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        args: &ProcessorArgs,
    ) -> Result<PaymentResult>;
}

pub type GatewayProviderServiceRef = Arc<dyn GatewayProviderService>;
pub type GatewayProcessorBox = Box<dyn GatewayProcessor>;
pub type PaymentGatewayMethodBox = Box<dyn PaymentGatewayMethod>;
pub type ProcessorFactory = Box<dyn Fn(ProcessorSettings) -> GatewayProcessorBox + Send + Sync>;

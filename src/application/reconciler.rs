use crate::domain::invoice::Invoice;
use crate::domain::ledger::{AppliedPayment, AppliedPaymentType};
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentResult, ProcessorFailure};
use crate::domain::ports::GatewayProviderServiceRef;
use crate::error::Result;

/// Records processor outcomes in the invoice ledger.
///
/// Shared by gateway method variants. Every call appends exactly one entry:
/// a `Debit` on success, a `Denied` with zero amount on failure.
#[derive(Clone)]
pub struct LedgerReconciler {
    service: GatewayProviderServiceRef,
    label: &'static str,
}

impl LedgerReconciler {
    /// `label` prefixes every ledger note, e.g. `"SagePay"`.
    pub fn new(service: GatewayProviderServiceRef, label: &'static str) -> Self {
        Self { service, label }
    }

    /// Ledger entries recorded against `invoice`, in append order.
    pub async fn ledger_for(&self, invoice: &Invoice) -> Result<Vec<AppliedPayment>> {
        self.service.applied_payments(invoice.key).await
    }

    /// Persists the payment when the processor succeeded, then appends the
    /// matching ledger entry.
    ///
    /// `success_note` and `success_amount` describe the debit; `failure_context`
    /// is prepended to the processor's failure cause.
    pub async fn reconcile(
        &self,
        invoice: &Invoice,
        payment: &Payment,
        result: &PaymentResult,
        success_note: &str,
        success_amount: Money,
        failure_context: &str,
    ) -> Result<AppliedPayment> {
        match &result.failure {
            Some(failure) => self.deny(invoice, payment, failure_context, failure).await,
            None => {
                self.service.save(payment).await?;
                self.service
                    .apply_payment_to_invoice(
                        payment.key,
                        invoice.key,
                        AppliedPaymentType::Debit,
                        &format!("{}: {}", self.label, success_note),
                        success_amount,
                    )
                    .await
            }
        }
    }

    async fn deny(
        &self,
        invoice: &Invoice,
        payment: &Payment,
        context: &str,
        failure: &ProcessorFailure,
    ) -> Result<AppliedPayment> {
        self.service
            .apply_payment_to_invoice(
                payment.key,
                invoice.key,
                AppliedPaymentType::Denied,
                &format!("{}: {}: {}", self.label, context, failure),
                Money::ZERO,
            )
            .await
    }
}

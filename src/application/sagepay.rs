use super::reconciler::LedgerReconciler;
use crate::domain::extended_data::{ExtendedData, ProcessorArgs, keys};
use crate::domain::invoice::Invoice;
use crate::domain::ledger::{has_authorization, net_applied};
use crate::domain::money::{Amount, Money};
use crate::domain::payment::{
    LifecycleOperation, Payment, PaymentMethod, PaymentMethodType, PaymentResult,
};
use crate::domain::ports::{
    GatewayProcessorBox, GatewayProviderServiceRef, PaymentGatewayMethod, ProcessorFactory,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Name recorded on payments and used as the ledger note prefix.
pub const METHOD_NAME: &str = "SagePay";
/// Editor alias the host uses to pick the iframe UI for this method.
pub const UI_ALIAS: &str = "SagePayIFrame";

/// Gateway method for the SagePay iframe flow.
///
/// Authorization happens out of band through the iframe redirect, so the only
/// supported path is authorize followed by one or more captures. Authorize and
/// capture in one step, refunds and voids are rejected with
/// [`PaymentError::Unsupported`].
pub struct SagePayPaymentGatewayMethod {
    service: GatewayProviderServiceRef,
    payment_method: PaymentMethod,
    processor: GatewayProcessorBox,
    reconciler: LedgerReconciler,
}

impl SagePayPaymentGatewayMethod {
    pub fn new(
        service: GatewayProviderServiceRef,
        payment_method: PaymentMethod,
        processor: GatewayProcessorBox,
    ) -> Self {
        let reconciler = LedgerReconciler::new(service.clone(), METHOD_NAME);
        Self {
            service,
            payment_method,
            processor,
            reconciler,
        }
    }

    /// Builds the method from the provider's extended data, handing the
    /// extracted processor settings to `factory`.
    pub fn from_extended_data(
        service: GatewayProviderServiceRef,
        payment_method: PaymentMethod,
        extended_data: &ExtendedData,
        factory: &ProcessorFactory,
    ) -> Result<Self> {
        let settings = extended_data.processor_settings()?;
        Ok(Self::new(service, payment_method, factory(settings)))
    }

    pub fn ui_alias(&self) -> &'static str {
        UI_ALIAS
    }

    async fn initialize_payment(
        &self,
        invoice: &Invoice,
        args: &ProcessorArgs,
        capture_amount: Decimal,
    ) -> Result<PaymentResult> {
        let mut payment = self
            .service
            .create_payment(
                PaymentMethodType::CreditCard,
                invoice.total.value(),
                self.payment_method.key,
            )
            .await?;
        payment.customer_key = invoice.customer_key;
        payment.authorized = false;
        payment.collected = false;
        payment.payment_method_name = METHOD_NAME.to_string();
        payment
            .extended_data
            .set_value(keys::CAPTURE_AMOUNT, capture_amount.to_string());
        self.service.save(&payment).await?;

        let mut result = self
            .processor
            .initialize_payment(invoice, &mut payment, args)
            .await;

        if result.is_success() {
            payment.authorized = true;
        }

        let entry = self
            .reconciler
            .reconcile(
                invoice,
                &payment,
                &result,
                "initialized",
                Money::ZERO,
                "request initialization error",
            )
            .await?;

        match &result.failure {
            None => tracing::info!(
                invoice_key = %invoice.key,
                payment_key = %payment.key,
                sequence = entry.sequence,
                "Payment initialized"
            ),
            Some(failure) => tracing::warn!(
                invoice_key = %invoice.key,
                payment_key = %payment.key,
                cause = %failure,
                "Payment initialization denied"
            ),
        }

        result.payment = payment;
        Ok(result)
    }

    fn unsupported(&self, invoice: &Invoice, operation: LifecycleOperation) -> Result<PaymentResult> {
        tracing::warn!(
            invoice_key = %invoice.key,
            method = METHOD_NAME,
            %operation,
            "Lifecycle operation not supported"
        );
        Err(PaymentError::Unsupported {
            method: METHOD_NAME,
            operation,
        })
    }
}

#[async_trait]
impl PaymentGatewayMethod for SagePayPaymentGatewayMethod {
    fn payment_method(&self) -> &PaymentMethod {
        &self.payment_method
    }

    async fn authorize_payment(
        &self,
        invoice: &Invoice,
        args: &ProcessorArgs,
    ) -> Result<PaymentResult> {
        self.initialize_payment(invoice, args, Decimal::NEGATIVE_ONE)
            .await
    }

    async fn capture_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        amount: Decimal,
        _args: &ProcessorArgs,
    ) -> Result<PaymentResult> {
        let amount = Amount::new(amount)?;
        if !payment.authorized {
            return Err(PaymentError::Precondition(format!(
                "payment {} has not been authorized",
                payment.key
            )));
        }
        if payment.collected {
            return Err(PaymentError::Precondition(format!(
                "payment {} is already collected",
                payment.key
            )));
        }

        let ledger = self.reconciler.ledger_for(invoice).await?;
        if !has_authorization(&ledger, payment.key) {
            return Err(PaymentError::Precondition(format!(
                "payment {} was not authorized against invoice {}",
                payment.key, invoice.number
            )));
        }
        let paid = net_applied(&ledger);
        let remaining = Money::from(invoice.total) - paid;
        if Money::from(amount) > remaining {
            return Err(PaymentError::Precondition(format!(
                "capture of {amount} exceeds remaining balance {remaining}"
            )));
        }

        let is_partial = amount.value() + paid.value() < invoice.total.value();
        tracing::debug!(
            invoice_key = %invoice.key,
            payment_key = %payment.key,
            %amount,
            already_paid = %paid,
            is_partial,
            "Capturing payment"
        );

        // The processor works on a copy so a failed capture leaves the caller's payment as it was.
        let mut working = payment.clone();
        let mut result = self
            .processor
            .capture_payment(invoice, &mut working, amount.value(), is_partial)
            .await;

        if result.is_success() {
            working.record_capture(amount.value());
            working.collected = !is_partial;
        }

        let entry = self
            .reconciler
            .reconcile(
                invoice,
                &working,
                &result,
                "captured",
                amount.into(),
                "request capture error",
            )
            .await?;

        match &result.failure {
            None => {
                tracing::info!(
                    invoice_key = %invoice.key,
                    payment_key = %working.key,
                    %amount,
                    is_partial,
                    sequence = entry.sequence,
                    "Payment captured"
                );
                *payment = working;
                result.payment = payment.clone();
            }
            Some(failure) => {
                tracing::warn!(
                    invoice_key = %invoice.key,
                    payment_key = %payment.key,
                    %amount,
                    cause = %failure,
                    "Payment capture denied"
                );
                result.payment = payment.clone();
            }
        }

        Ok(result)
    }

    async fn authorize_capture_payment(
        &self,
        invoice: &Invoice,
        _amount: Decimal,
        _args: &ProcessorArgs,
    ) -> Result<PaymentResult> {
        self.unsupported(invoice, LifecycleOperation::AuthorizeCapture)
    }

    async fn refund_payment(
        &self,
        invoice: &Invoice,
        _payment: &mut Payment,
        _amount: Decimal,
        _args: &ProcessorArgs,
    ) -> Result<PaymentResult> {
        self.unsupported(invoice, LifecycleOperation::Refund)
    }

    async fn void_payment(
        &self,
        invoice: &Invoice,
        _payment: &mut Payment,
        _args: &ProcessorArgs,
    ) -> Result<PaymentResult> {
        self.unsupported(invoice, LifecycleOperation::Void)
    }
}

use crate::config::ProcessorSettings;
use crate::domain::extended_data::{ProcessorArgs, keys};
use crate::domain::invoice::Invoice;
use crate::domain::payment::{Payment, PaymentResult, ProcessorFailure};
use crate::domain::ports::GatewayProcessor;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Processor argument that makes the simulator decline the call with its value as cause.
pub const DECLINE_ARG: &str = "decline";

/// A capture request as seen by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureCall {
    pub amount: Decimal,
    pub is_partial: bool,
}

#[derive(Default)]
struct SimulatorState {
    declines: VecDeque<String>,
    captures: Vec<CaptureCall>,
}

/// A sandbox processor that answers without touching the network.
///
/// Initialization assigns a gateway transaction id and a redirect URL built
/// from the settings. Declines are scripted with [`decline_next`] or requested
/// per call through the `decline` processor argument. Clones share state, so a
/// test can keep a handle after boxing one into a gateway method.
///
/// [`decline_next`]: SimulatedProcessor::decline_next
#[derive(Clone)]
pub struct SimulatedProcessor {
    settings: Arc<ProcessorSettings>,
    state: Arc<Mutex<SimulatorState>>,
}

impl SimulatedProcessor {
    pub fn new(settings: ProcessorSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            state: Arc::default(),
        }
    }

    /// Makes the next processor call fail with `cause`.
    pub async fn decline_next(&self, cause: impl Into<String>) {
        self.state.lock().await.declines.push_back(cause.into());
    }

    /// Drops declines that were scripted but never consumed.
    pub async fn clear_declines(&self) {
        self.state.lock().await.declines.clear();
    }

    /// Every capture request received so far.
    pub async fn captures(&self) -> Vec<CaptureCall> {
        self.state.lock().await.captures.clone()
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    async fn scripted_decline(&self) -> Option<ProcessorFailure> {
        self.state
            .lock()
            .await
            .declines
            .pop_front()
            .map(ProcessorFailure::new)
    }
}

#[async_trait]
impl GatewayProcessor for SimulatedProcessor {
    async fn initialize_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        args: &ProcessorArgs,
    ) -> PaymentResult {
        let decline = match args.get_value(DECLINE_ARG) {
            Some(cause) => Some(ProcessorFailure::new(cause)),
            None => self.scripted_decline().await,
        };
        if let Some(failure) = decline {
            return PaymentResult::failed(payment.clone(), invoice.key, failure);
        }

        let transaction_id = format!(
            "{}-{}",
            self.settings.transaction_prefix,
            payment.key.simple()
        );
        let return_url = args
            .get_value("returnUrl")
            .unwrap_or(self.settings.return_url.as_str());
        let redirect = format!(
            "{}?vendor={}&txn={}&success={}",
            self.settings.gateway_url(),
            self.settings.vendor_name,
            transaction_id,
            return_url
        );
        payment
            .extended_data
            .set_value(keys::GATEWAY_TRANSACTION_ID, transaction_id);
        payment.extended_data.set_value(keys::REDIRECT_URL, redirect);

        PaymentResult::success(payment.clone(), invoice.key, true)
    }

    async fn capture_payment(
        &self,
        invoice: &Invoice,
        payment: &mut Payment,
        amount: Decimal,
        is_partial: bool,
    ) -> PaymentResult {
        let mut state = self.state.lock().await;
        state.captures.push(CaptureCall { amount, is_partial });
        if let Some(cause) = state.declines.pop_front() {
            return PaymentResult::failed(payment.clone(), invoice.key, ProcessorFailure::new(cause));
        }
        PaymentResult::success(payment.clone(), invoice.key, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentMethodType;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment() -> Payment {
        Payment::new(PaymentMethodType::CreditCard, dec!(10.00), Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_initialize_assigns_transaction_id() {
        let processor = SimulatedProcessor::new(ProcessorSettings::sandbox());
        let invoice = Invoice::new(1, None, dec!(10.00)).unwrap();
        let mut p = payment();

        let result = processor
            .initialize_payment(&invoice, &mut p, &ProcessorArgs::new())
            .await;

        assert!(result.is_success());
        let txn = p.extended_data.get_value(keys::GATEWAY_TRANSACTION_ID).unwrap();
        assert!(txn.starts_with("SP-"));
        let redirect = p.extended_data.get_value(keys::REDIRECT_URL).unwrap();
        assert!(redirect.starts_with("https://test.sagepay.com"));
        assert!(redirect.contains("vendor=sandbox"));
    }

    #[tokio::test]
    async fn test_decline_argument() {
        let processor = SimulatedProcessor::new(ProcessorSettings::sandbox());
        let invoice = Invoice::new(1, None, dec!(10.00)).unwrap();
        let mut p = payment();
        let args: ProcessorArgs = [(DECLINE_ARG, "card declined")].into_iter().collect();

        let result = processor.initialize_payment(&invoice, &mut p, &args).await;

        assert_eq!(result.failure, Some(ProcessorFailure::new("card declined")));
        assert!(p.extended_data.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_declines_are_consumed_in_order() {
        let processor = SimulatedProcessor::new(ProcessorSettings::sandbox());
        let invoice = Invoice::new(1, None, dec!(10.00)).unwrap();
        let mut p = payment();
        processor.decline_next("first").await;

        let declined = processor.capture_payment(&invoice, &mut p, dec!(5.00), true).await;
        let accepted = processor.capture_payment(&invoice, &mut p, dec!(5.00), false).await;

        assert_eq!(declined.failure.unwrap().message, "first");
        assert!(accepted.is_success());
        assert_eq!(
            processor.captures().await,
            vec![
                CaptureCall { amount: dec!(5.00), is_partial: true },
                CaptureCall { amount: dec!(5.00), is_partial: false },
            ]
        );
    }
}

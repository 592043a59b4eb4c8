use crate::domain::ledger::{AppliedPayment, AppliedPaymentType};
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentMethodType};
use crate::domain::ports::GatewayProviderService;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory gateway provider service.
///
/// Payments are kept in `Arc<RwLock<HashMap<Uuid, Payment>>>`; the ledger is an
/// append-only vector. Clones share the same state. Used by the replay CLI and
/// tests where host persistence is not available.
#[derive(Default, Clone)]
pub struct InMemoryGatewayProviderService {
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
    ledger: Arc<RwLock<Vec<AppliedPayment>>>,
}

impl InMemoryGatewayProviderService {
    /// Creates a new, empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ledger entry across all invoices, in append order.
    pub async fn ledger(&self) -> Vec<AppliedPayment> {
        self.ledger.read().await.clone()
    }
}

#[async_trait]
impl GatewayProviderService for InMemoryGatewayProviderService {
    async fn create_payment(
        &self,
        method_type: PaymentMethodType,
        amount: Decimal,
        payment_method_key: Uuid,
    ) -> Result<Payment> {
        Ok(Payment::new(method_type, amount, payment_method_key))
    }

    async fn save(&self, payment: &Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.key, payment.clone());
        Ok(())
    }

    async fn get_payment(&self, payment_key: Uuid) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&payment_key).cloned())
    }

    async fn apply_payment_to_invoice(
        &self,
        payment_key: Uuid,
        invoice_key: Uuid,
        applied_type: AppliedPaymentType,
        note: &str,
        amount: Money,
    ) -> Result<AppliedPayment> {
        if !self.payments.read().await.contains_key(&payment_key) {
            return Err(PaymentError::Storage(format!(
                "payment {payment_key} has not been saved"
            )));
        }

        let mut ledger = self.ledger.write().await;
        let entry = AppliedPayment {
            sequence: ledger.len() as u64 + 1,
            payment_key,
            invoice_key,
            applied_type,
            note: note.to_string(),
            amount,
        };
        ledger.push(entry.clone());
        Ok(entry)
    }

    async fn applied_payments(&self, invoice_key: Uuid) -> Result<Vec<AppliedPayment>> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .iter()
            .filter(|entry| entry.invoice_key == invoice_key)
            .cloned()
            .collect())
    }
}

use super::sagepay::{METHOD_NAME, SagePayPaymentGatewayMethod};
use crate::config::ProcessorSettings;
use crate::domain::extended_data::ProcessorArgs;
use crate::domain::invoice::Invoice;
use crate::domain::ledger::AppliedPaymentType;
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentMethod, PaymentResult};
use crate::domain::ports::{PaymentGatewayMethod, PaymentGatewayMethodBox};
use crate::error::{PaymentError, Result};
use crate::infrastructure::in_memory::InMemoryGatewayProviderService;
use crate::infrastructure::simulated::{DECLINE_ARG, SimulatedProcessor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Authorize,
    Capture,
    AuthorizeCapture,
    Refund,
    Void,
}

/// One row of a replay file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub command: CommandKind,
    pub invoice: u32,
    pub total: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub decline: Option<String>,
}

/// A ledger entry as written to the replay output.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct LedgerRow {
    pub invoice: u32,
    #[serde(rename = "type")]
    pub applied_type: AppliedPaymentType,
    pub amount: Money,
    pub note: String,
}

/// Drives the SagePay gateway method from a stream of commands.
///
/// Invoices are issued on their first `authorize`; later commands for the same
/// invoice number act on the most recent payment created for it. Everything is
/// kept in memory and the processor is simulated.
pub struct Replay {
    method: PaymentGatewayMethodBox,
    service: InMemoryGatewayProviderService,
    processor: SimulatedProcessor,
    invoices: HashMap<u32, Invoice>,
    payments: HashMap<u32, Payment>,
}

impl Replay {
    pub fn new(settings: ProcessorSettings) -> Self {
        let service = InMemoryGatewayProviderService::new();
        let processor = SimulatedProcessor::new(settings);
        let method = SagePayPaymentGatewayMethod::new(
            Arc::new(service.clone()),
            PaymentMethod::new(Uuid::new_v4(), METHOD_NAME, "CreditCard"),
            Box::new(processor.clone()),
        );
        Self {
            method: Box::new(method),
            service,
            processor,
            invoices: HashMap::new(),
            payments: HashMap::new(),
        }
    }

    /// Runs one command against the gateway method.
    ///
    /// Processor declines come back as an unsuccessful `PaymentResult`;
    /// unsupported operations and precondition violations as errors.
    pub async fn process_command(&mut self, command: Command) -> Result<PaymentResult> {
        let args: ProcessorArgs = match &command.decline {
            Some(cause) => [(DECLINE_ARG, cause.as_str())].into_iter().collect(),
            None => ProcessorArgs::new(),
        };

        match command.command {
            CommandKind::Authorize => {
                let invoice = self.issue_invoice(&command)?;
                let result = self.method.authorize_payment(&invoice, &args).await?;
                self.payments.insert(command.invoice, result.payment.clone());
                Ok(result)
            }
            CommandKind::Capture => {
                let amount = required_amount(&command)?;
                let invoice = self.invoice(command.invoice)?;
                let mut payment = self.payment(command.invoice)?;
                if let Some(cause) = &command.decline {
                    self.processor.decline_next(cause.clone()).await;
                }
                let outcome = self
                    .method
                    .capture_payment(&invoice, &mut payment, amount, &args)
                    .await;
                if outcome.is_err() {
                    // The capture never reached the processor.
                    self.processor.clear_declines().await;
                }
                self.payments.insert(command.invoice, payment);
                outcome
            }
            CommandKind::AuthorizeCapture => {
                let amount = required_amount(&command)?;
                let invoice = self.issue_invoice(&command)?;
                self.method
                    .authorize_capture_payment(&invoice, amount, &args)
                    .await
            }
            CommandKind::Refund => {
                let amount = required_amount(&command)?;
                let invoice = self.invoice(command.invoice)?;
                let mut payment = self.payment(command.invoice)?;
                self.method
                    .refund_payment(&invoice, &mut payment, amount, &args)
                    .await
            }
            CommandKind::Void => {
                let invoice = self.invoice(command.invoice)?;
                let mut payment = self.payment(command.invoice)?;
                self.method.void_payment(&invoice, &mut payment, &args).await
            }
        }
    }

    /// The ledger across all invoices, in append order.
    pub async fn ledger_rows(&self) -> Vec<LedgerRow> {
        let numbers: HashMap<Uuid, u32> = self
            .invoices
            .values()
            .map(|invoice| (invoice.key, invoice.number))
            .collect();
        self.service
            .ledger()
            .await
            .into_iter()
            .filter_map(|entry| {
                numbers.get(&entry.invoice_key).map(|number| LedgerRow {
                    invoice: *number,
                    applied_type: entry.applied_type,
                    amount: entry.amount,
                    note: entry.note,
                })
            })
            .collect()
    }

    fn issue_invoice(&mut self, command: &Command) -> Result<Invoice> {
        if let Some(invoice) = self.invoices.get(&command.invoice) {
            return Ok(invoice.clone());
        }
        let total = command.total.ok_or_else(|| {
            PaymentError::Precondition(format!(
                "invoice {} needs a total when first authorized",
                command.invoice
            ))
        })?;
        let invoice = Invoice::new(command.invoice, None, total)?;
        self.invoices.insert(command.invoice, invoice.clone());
        Ok(invoice)
    }

    fn invoice(&self, number: u32) -> Result<Invoice> {
        self.invoices
            .get(&number)
            .cloned()
            .ok_or_else(|| PaymentError::Precondition(format!("unknown invoice {number}")))
    }

    fn payment(&self, number: u32) -> Result<Payment> {
        self.payments.get(&number).cloned().ok_or_else(|| {
            PaymentError::Precondition(format!("no payment exists for invoice {number}"))
        })
    }
}

fn required_amount(command: &Command) -> Result<Decimal> {
    command.amount.ok_or_else(|| {
        PaymentError::Precondition(format!(
            "{:?} on invoice {} requires an amount",
            command.command, command.invoice
        ))
    })
}

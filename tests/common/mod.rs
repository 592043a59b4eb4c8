#![allow(dead_code)]

use sagepay_adapter::application::sagepay::{METHOD_NAME, SagePayPaymentGatewayMethod};
use sagepay_adapter::config::ProcessorSettings;
use sagepay_adapter::domain::payment::PaymentMethod;
use sagepay_adapter::infrastructure::in_memory::InMemoryGatewayProviderService;
use sagepay_adapter::infrastructure::simulated::SimulatedProcessor;
use std::io::{Error, Write};
use std::sync::Arc;
use tempfile::NamedTempFile;
use uuid::Uuid;

pub struct Gateway {
    pub service: Arc<InMemoryGatewayProviderService>,
    pub processor: SimulatedProcessor,
    pub method: SagePayPaymentGatewayMethod,
}

pub fn gateway() -> Gateway {
    let service = Arc::new(InMemoryGatewayProviderService::new());
    let processor = SimulatedProcessor::new(ProcessorSettings::sandbox());
    let method = SagePayPaymentGatewayMethod::new(
        service.clone(),
        PaymentMethod::new(Uuid::new_v4(), METHOD_NAME, "CreditCard"),
        Box::new(processor.clone()),
    );
    Gateway {
        service,
        processor,
        method,
    }
}

/// Writes a commands CSV with the standard header followed by `rows`.
pub fn commands_file(rows: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "command, invoice, total, amount, decline")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    file.flush()?;
    Ok(file)
}

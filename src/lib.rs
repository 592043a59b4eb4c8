//! SagePay iframe gateway method for a commerce platform's payment lifecycle.
//!
//! The gateway method builds a payment from an invoice, hands the network call
//! to a [`GatewayProcessor`](domain::ports::GatewayProcessor) and records every
//! outcome in the append-only invoice ledger through the host's
//! [`GatewayProviderService`](domain::ports::GatewayProviderService).

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

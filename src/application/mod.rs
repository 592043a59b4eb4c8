//! Application layer: the gateway method variants and the ledger reconciliation
//! they share.
//!
//! `SagePayPaymentGatewayMethod` implements the lifecycle capability; `Replay`
//! drives it from a command file with in-memory collaborators.

pub mod reconciler;
pub mod replay;
pub mod sagepay;

//! Domain types and the ports through which the gateway method talks to the host.

pub mod extended_data;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod payment;
pub mod ports;

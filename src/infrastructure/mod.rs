//! Collaborators that stand in for the host platform and the gateway.

pub mod in_memory;
pub mod simulated;

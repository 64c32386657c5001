//! Liveness probing of dataset entries.
//!
//! The mergers consume probing as a capability: one batched call per check
//! operation, results correlated back by identity key. The production
//! implementation is [`NetProber`]; tests use
//! [`crate::testing::MockProber`].

mod net;
mod types;

pub use net::NetProber;
pub use types::{ProbeError, ProbeOutcome, Prober};

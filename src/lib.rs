// #![deny(warnings)]

#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::disallowed_types)]
#![deny(clippy::manual_let_else)]
#![allow(clippy::unreachable)]

//! Classification of Kerberos and GSS-API handshake failures.
//!
//! An authenticator that catches a failure from its security provider hands
//! it to [`classify`] to learn which known Kerberos error caused it, and to
//! [`is_retriable_no_credential`] to learn whether the GSS-API layer simply
//! had no credentials yet. Both answer from the process-wide [`Classifier`],
//! which probes the installed provider types exactly once. Neither ever fails:
//! anything that cannot be determined is reported as unknown.

pub mod chain;
pub mod classifier;
pub mod config;
pub mod error;
pub mod probe;
pub mod provider;
pub mod taxonomy;

#[cfg(test)]
mod testkit;

pub use crate::classifier::Classifier;
pub use crate::config::ProbeConfig;
pub use crate::provider::{ProviderRuntime, ProviderType};
pub use crate::taxonomy::KerberosError;

use std::error::Error;

/// Identify the known Kerberos error underlying `failure`, if any.
pub fn classify(failure: &(dyn Error + 'static)) -> Option<KerberosError> {
    Classifier::global().classify(failure)
}

/// True when `failure` was caused by the GSS-API no-credential condition.
pub fn is_retriable_no_credential(failure: &(dyn Error + 'static)) -> bool {
    Classifier::global().is_retriable_no_credential(failure)
}

/// True when `failure` is worth retrying for either of the reasons above.
pub fn is_retriable(failure: &(dyn Error + 'static)) -> bool {
    Classifier::global().is_retriable(failure)
}

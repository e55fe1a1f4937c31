//! Application-level configuration.
//!
//! - [`CouncilConfig`] - roster, per-call timeout, consensus threshold
//! - [`CouncilRoster`] / [`ProviderChain`] - provider bindings per role

pub mod council_config;

pub use council_config::{CouncilConfig, CouncilRoster, DEFAULT_TIMEOUT, ProviderChain};

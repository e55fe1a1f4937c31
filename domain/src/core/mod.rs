//! Core domain concepts shared across all subdomains.
//!
//! - [`task::Task`] - a validated request posed to the council
//! - [`provider::ProviderId`] - opaque capability provider identifier
//! - [`error::DomainError`] - domain-level errors
//! - [`text`] - keyword extraction and similarity helpers

pub mod error;
pub mod provider;
pub mod task;
pub mod text;

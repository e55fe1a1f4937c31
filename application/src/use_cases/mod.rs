//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatcher;
pub mod run_council;

#[cfg(test)]
pub(crate) mod testing;

//! Progress notifiers for terminal use

pub mod reporter;

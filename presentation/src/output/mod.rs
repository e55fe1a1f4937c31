//! Output formatting for council outcomes

pub mod console;
pub mod formatter;

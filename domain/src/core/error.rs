//! Domain error types

use crate::council::entities::Phase;
use crate::council::role::Role;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Task cannot be empty")]
    EmptyTask,

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("No template for {mode} / {phase} / {role}")]
    MissingTemplate {
        mode: String,
        phase: Phase,
        role: Role,
    },

    /// A round was sealed while participants were still outstanding.
    ///
    /// This is a contract violation: later phases are only ever built from
    /// complete rounds.
    #[error("Round for {phase} is incomplete: {} participant(s) still pending", .pending.len())]
    RoundIncomplete { phase: Phase, pending: Vec<Role> },

    #[error("Leading draft missing for {0}")]
    LeadingDraftMissing(Role),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

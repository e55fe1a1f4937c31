//! Council roles
//!
//! Each mode has a fixed roster of three roles. Ordering of the enum is the
//! roster order and is what every role-keyed map iterates in.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named seat on the council
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    // Collaborative roster
    /// Pushes for ambitious, novel approaches
    Visionary,
    /// Optimizes for what ships and operates well
    Pragmatist,
    /// Hunts for risks, gaps and hidden costs
    Skeptic,
    // Adversarial roster
    /// Argues for the strongest direct answer
    Advocate,
    /// Deliberately explores the opposing position
    Contrarian,
    /// Weighs evidence and trade-offs neutrally
    Analyst,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visionary => "visionary",
            Role::Pragmatist => "pragmatist",
            Role::Skeptic => "skeptic",
            Role::Advocate => "advocate",
            Role::Contrarian => "contrarian",
            Role::Analyst => "analyst",
        }
    }

    /// Human-readable label used in payload headers and console output
    pub fn label(&self) -> &'static str {
        match self {
            Role::Visionary => "Visionary",
            Role::Pragmatist => "Pragmatist",
            Role::Skeptic => "Skeptic",
            Role::Advocate => "Advocate",
            Role::Contrarian => "Contrarian",
            Role::Analyst => "Analyst",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visionary" => Ok(Role::Visionary),
            "pragmatist" => Ok(Role::Pragmatist),
            "skeptic" => Ok(Role::Skeptic),
            "advocate" => Ok(Role::Advocate),
            "contrarian" => Ok(Role::Contrarian),
            "analyst" => Ok(Role::Analyst),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for role in [
            Role::Visionary,
            Role::Pragmatist,
            Role::Skeptic,
            Role::Advocate,
            Role::Contrarian,
            Role::Analyst,
        ] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "moderator".parse::<Role>(),
            Err(DomainError::InvalidRole("moderator".to_string()))
        );
    }

    #[test]
    fn test_ordering_follows_roster() {
        assert!(Role::Visionary < Role::Pragmatist);
        assert!(Role::Pragmatist < Role::Skeptic);
        assert!(Role::Advocate < Role::Contrarian);
        assert!(Role::Contrarian < Role::Analyst);
    }
}

//! Capability provider identifier

use serde::{Deserialize, Serialize};

/// Identifier of an external text-generation backend (Value Object)
///
/// The domain never interprets the id; the gateway resolves it against the
/// configured provider table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_display() {
        let id = ProviderId::new("codex-cli");
        assert_eq!(id.to_string(), "codex-cli");
        assert_eq!(id.as_str(), "codex-cli");
    }

    #[test]
    fn test_provider_id_serializes_as_string() {
        let id: ProviderId = "gemini".into();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"gemini\"");
        let back: ProviderId = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(back, id);
    }
}

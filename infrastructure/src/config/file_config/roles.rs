//! Seat bindings from TOML (`[roles.<role>]` and `[synthesizer]` sections)

use council_application::ProviderChain;
use serde::{Deserialize, Serialize};

/// Provider binding for one seat: a primary plus ordered fallbacks
///
/// ```toml
/// [roles.skeptic]
/// provider = "gpt"
/// fallbacks = ["claude", "local"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChainConfig {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<String>,
}

impl FileChainConfig {
    /// Every provider id the binding names, primary first
    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.provider.as_str()).chain(self.fallbacks.iter().map(String::as_str))
    }

    pub fn to_chain(&self) -> ProviderChain {
        ProviderChain::new(self.provider.as_str()).with_fallbacks(self.fallbacks.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_is_primary_then_fallbacks() {
        let binding: FileChainConfig = toml::from_str(
            r#"
provider = "gpt"
fallbacks = ["claude", "local"]
"#,
        )
        .unwrap();

        let chain = binding.to_chain();
        let ids: Vec<&str> = chain.providers().iter().map(|p| p.as_str()).collect();
        assert_eq!(ids, vec!["gpt", "claude", "local"]);
        assert_eq!(binding.provider_ids().count(), 3);
    }

    #[test]
    fn test_fallbacks_are_optional() {
        let binding: FileChainConfig = toml::from_str(r#"provider = "claude""#).unwrap();
        assert!(binding.fallbacks.is_empty());
        assert_eq!(binding.to_chain().len(), 1);
    }
}
